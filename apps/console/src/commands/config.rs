//! # Config Command

use crate::config::ConsoleConfig;
use crate::error::ApiError;

/// Returns the effective configuration as TOML.
pub fn show_config(config: &ConsoleConfig) -> Result<String, ApiError> {
    config
        .to_toml()
        .map_err(|e| ApiError::internal(e.to_string()))
}
