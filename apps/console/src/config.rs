//! # Console Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (--db)                     (highest priority)         │
//! │  2. Environment variables                                              │
//! │     WAREHUB_DB_PATH=/srv/warehub.db                                    │
//! │     WAREHUB_SKU_PREFIX=BIN                                             │
//! │  3. TOML config file                                                   │
//! │     ~/.config/warehub/console.toml (Linux)                             │
//! │  4. Default values                          (lowest priority)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/srv/warehub/warehub.db"
//! max_connections = 5
//!
//! [inventory]
//! sku_prefix = "WHW"
//! list_limit = 50
//!
//! [scan]
//! repeat = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use warehub_core::validation::validate_sku_prefix;
use warehub_core::DEFAULT_SKU_PREFIX;

use crate::error::{ConfigError, ConfigResult};

const DB_FILE_NAME: &str = "warehub.db";

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Prefix of generated SKUs (`WHW` gives `WHW-00001`).
    #[serde(default = "default_sku_prefix")]
    pub sku_prefix: String,

    /// Rows shown by `list` when `--limit` is not given.
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
}

fn default_sku_prefix() -> String {
    DEFAULT_SKU_PREFIX.to_string()
}

fn default_list_limit() -> u32 {
    50
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            sku_prefix: default_sku_prefix(),
            list_limit: default_list_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Keep scanning after each item until a scan is cancelled.
    #[serde(default)]
    pub repeat: bool,
}

// =============================================================================
// Console Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub inventory: InventorySettings,

    #[serde(default)]
    pub scan: ScanSettings,
}

impl ConsoleConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (console.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    fn load_with(
        config_path: Option<PathBuf>,
        var: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading console config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(var);
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_sku_prefix(&self.inventory.sku_prefix)
            .map_err(|e| ConfigError::Invalid(format!("inventory.sku_prefix: {}", e)))?;

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.inventory.list_limit == 0 {
            return Err(ConfigError::Invalid(
                "inventory.list_limit must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `WAREHUB_*` overrides read through `var`.
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("WAREHUB_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(max) = var("WAREHUB_DB_MAX_CONNECTIONS") {
            match max.parse() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring invalid WAREHUB_DB_MAX_CONNECTIONS"),
            }
        }

        if let Some(prefix) = var("WAREHUB_SKU_PREFIX") {
            self.inventory.sku_prefix = prefix.trim().to_uppercase();
        }

        if let Some(limit) = var("WAREHUB_LIST_LIMIT") {
            match limit.parse() {
                Ok(n) => self.inventory.list_limit = n,
                Err(_) => warn!(value = %limit, "Ignoring invalid WAREHUB_LIST_LIMIT"),
            }
        }

        if let Some(repeat) = var("WAREHUB_SCAN_REPEAT") {
            self.scan.repeat = matches!(repeat.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    /// Returns the database file, creating the platform data directory when
    /// no path is configured.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(ref path) = self.database.path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or_else(|| {
            ConfigError::Invalid("Could not determine app data directory".into())
        })?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DB_FILE_NAME))
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("console.toml"))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "warehub", "warehub")
}
