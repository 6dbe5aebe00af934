//! # API Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command Function  ──►  Result<T, ApiError>                             │
//! │                                                                         │
//! │  DbError ──────────┐                                                    │
//! │  CoreError ────────┤                                                    │
//! │  LookupError ──────┼──► ApiError { code, message } ──► stderr / JSON    │
//! │  AdjustError ──────┤                                                    │
//! │  ScanError ────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With `--json` the operator (or a frontend) receives:
//! ```json
//! { "code": "NOT_FOUND", "message": "Inventory item not found: ZZZ-999" }
//! ```

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use warehub_core::{CoreError, ValidationError};
use warehub_db::DbError;
use warehub_scan::{AdjustError, LookupError, ScanError, StoreError, WorkflowError};

/// Error returned from console commands.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No inventory record carries the identifier
    NotFound,

    /// Several records carry the identifier
    Ambiguous,

    /// Input validation failed
    ValidationError,

    /// A scan or adjustment is already running
    Busy,

    /// Store read or write failed
    DatabaseError,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::CheckViolation(message) => {
                tracing::error!("Check constraint violated: {}", message);
                ApiError::validation("Value rejected by the database")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            other => {
                tracing::error!("Database operation failed: {}", other);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            CoreError::QuantityOverflow { .. } => ApiError::validation(err.to_string()),
            CoreError::SkuSequence { .. } => ApiError::internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => ApiError::not_found("Inventory item", &id),
            StoreError::Rejected(_) => ApiError::validation(err.to_string()),
            StoreError::Malformed(_) | StoreError::Unavailable(_) => {
                ApiError::new(ErrorCode::DatabaseError, err.to_string())
            }
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Ambiguous { .. } => ApiError::new(ErrorCode::Ambiguous, err.to_string()),
            LookupError::Store(e) => e.into(),
        }
    }
}

impl From<AdjustError> for ApiError {
    fn from(err: AdjustError) -> Self {
        match err {
            AdjustError::Rule(e) => e.into(),
            AdjustError::InFlight { .. } => ApiError::new(ErrorCode::Busy, err.to_string()),
            AdjustError::Persistence(e) => e.into(),
        }
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        ApiError::new(ErrorCode::Busy, err.to_string())
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Scan(e) => e.into(),
            WorkflowError::Lookup(e) => e.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Config Error
// =============================================================================

/// Failures while loading `console.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_not_found_maps_to_not_found() {
        let err: ApiError = DbError::not_found("InventoryItem", "r1").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains("r1"));
    }

    #[test]
    fn test_ambiguous_lookup_keeps_message() {
        let err: ApiError = LookupError::Ambiguous {
            payload: "WHW-00001".to_string(),
            count: 2,
        }
        .into();
        assert_eq!(err.code, ErrorCode::Ambiguous);
        assert!(err.message.contains("WHW-00001"));
    }

    #[test]
    fn test_persistence_failure_is_database_error() {
        let err: ApiError =
            AdjustError::Persistence(StoreError::Unavailable("disk full".to_string())).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("disk full"));
    }

    #[test]
    fn test_serializes_screaming_code() {
        let err = ApiError::not_found("Inventory item", "ZZZ-999");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(
            json,
            r#"{"code":"NOT_FOUND","message":"Inventory item not found: ZZZ-999"}"#
        );
    }
}
