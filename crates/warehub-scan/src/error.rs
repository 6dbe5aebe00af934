//! # Scan Workflow Errors
//!
//! ## Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Failure                     Type                      Reaches caller?  │
//! │  ───────────────────────     ──────────────────────    ──────────────   │
//! │  Permission denied           CameraError::Permission   No  → None       │
//! │  No camera / busy /          CameraError::*            No  → None       │
//! │  unsupported constraints                                                │
//! │  Second session started      ScanError::SessionActive  Yes              │
//! │  Nothing matched             Ok(None)                  Yes (absence)    │
//! │  Several records matched     LookupError::Ambiguous    Yes              │
//! │  Store read failed           LookupError::Store        Yes              │
//! │  Store write failed          AdjustError::Persistence  Yes              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Camera failures end the session quietly and are announced through
//! `ScanNotice`; everything else is an explicit error value. None of them
//! is retried.

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use warehub_core::CoreError;
use warehub_db::DbError;

use crate::session::ScanState;

// =============================================================================
// Camera Error
// =============================================================================

/// Classified camera / decoder failure.
///
/// Messages are written for the operator, not for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CameraError {
    #[error("Camera permission was denied")]
    PermissionDenied,

    #[error("No camera was found on this device")]
    NotFound,

    #[error("The camera is already in use by another application")]
    InUse,

    #[error("The camera does not support the requested settings")]
    UnsupportedConstraints,

    #[error("Camera access is not supported on this device")]
    NotSupported,

    #[error("Camera error: {0}")]
    Other(String),
}

/// Coarse grouping used for notices and error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    PermissionDenied,
    DeviceUnavailable,
}

impl CameraError {
    /// Classifies a failure reported by a camera stack by its error name.
    ///
    /// Names follow the media-capture error names browsers raise; native
    /// providers map their own failures onto the same names.
    ///
    /// ```rust
    /// use warehub_scan::CameraError;
    ///
    /// assert_eq!(CameraError::classify("NotAllowedError", ""), CameraError::PermissionDenied);
    /// assert_eq!(CameraError::classify("NotReadableError", ""), CameraError::InUse);
    /// ```
    pub fn classify(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" | "SecurityError" => {
                CameraError::PermissionDenied
            }
            "NotFoundError" | "DevicesNotFoundError" => CameraError::NotFound,
            "NotReadableError" | "TrackStartError" | "AbortError" => CameraError::InUse,
            "OverconstrainedError" | "ConstraintNotSatisfiedError" => {
                CameraError::UnsupportedConstraints
            }
            "NotSupportedError" | "TypeError" => CameraError::NotSupported,
            _ if message.is_empty() => CameraError::Other(name.to_string()),
            _ => CameraError::Other(format!("{}: {}", name, message)),
        }
    }

    /// Returns the coarse category of this failure.
    pub fn category(&self) -> FailureCategory {
        match self {
            CameraError::PermissionDenied => FailureCategory::PermissionDenied,
            _ => FailureCategory::DeviceUnavailable,
        }
    }
}

// =============================================================================
// Scan Error
// =============================================================================

/// Errors raised by the scan controller itself.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Only one session may run at a time.
    #[error("A scan is already in progress ({state})")]
    SessionActive { state: ScanState },
}

// =============================================================================
// Store Error
// =============================================================================

/// Failure reported by an [`InventoryStore`](crate::store::InventoryStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Inventory record not found: {id}")]
    NotFound { id: String },

    /// The store answered with something that is not a valid record.
    #[error("Malformed inventory record: {0}")]
    Malformed(String),

    /// The store refused the write (constraint, conflict).
    #[error("Write rejected: {0}")]
    Rejected(String),

    /// The store could not be reached or failed internally.
    #[error("Inventory store unavailable: {0}")]
    Unavailable(String),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { id, .. } => StoreError::NotFound { id },
            DbError::Decode { .. } => StoreError::Malformed(err.to_string()),
            DbError::UniqueViolation { .. } | DbError::CheckViolation(_) => {
                StoreError::Rejected(err.to_string())
            }
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Lookup / Adjust Errors
// =============================================================================

/// Lookup failures. "Not found" is `Ok(None)`, not an error.
#[derive(Debug, Error)]
pub enum LookupError {
    /// More than one record carries the scanned identifier.
    #[error("'{payload}' matches {count} inventory records")]
    Ambiguous { payload: String, count: usize },

    #[error("Lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// Adjustment failures.
#[derive(Debug, Error)]
pub enum AdjustError {
    /// The new quantity could not be computed.
    #[error(transparent)]
    Rule(#[from] CoreError),

    /// Another adjustment of the same record has not finished yet.
    #[error("An adjustment of {sku} is already in progress")]
    InFlight { sku: String },

    /// The store rejected or failed the write.
    #[error("Could not save quantity: {0}")]
    Persistence(#[from] StoreError),
}

/// Errors from the combined scan-and-resolve step.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

pub type ScanResult<T> = Result<T, ScanError>;
pub type LookupResult<T> = Result<T, LookupError>;
pub type AdjustResult<T> = Result<T, AdjustError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_browser_error_names() {
        let cases = [
            ("NotAllowedError", CameraError::PermissionDenied),
            ("PermissionDeniedError", CameraError::PermissionDenied),
            ("NotFoundError", CameraError::NotFound),
            ("DevicesNotFoundError", CameraError::NotFound),
            ("NotReadableError", CameraError::InUse),
            ("TrackStartError", CameraError::InUse),
            ("OverconstrainedError", CameraError::UnsupportedConstraints),
            ("NotSupportedError", CameraError::NotSupported),
        ];
        for (name, expected) in cases {
            assert_eq!(CameraError::classify(name, "ignored"), expected, "{}", name);
        }
    }

    #[test]
    fn test_classify_unknown_keeps_message() {
        assert_eq!(
            CameraError::classify("WeirdError", "lens cap on"),
            CameraError::Other("WeirdError: lens cap on".to_string())
        );
        assert_eq!(
            CameraError::classify("WeirdError", ""),
            CameraError::Other("WeirdError".to_string())
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            CameraError::PermissionDenied.category(),
            FailureCategory::PermissionDenied
        );
        assert_eq!(CameraError::InUse.category(), FailureCategory::DeviceUnavailable);
    }

    #[test]
    fn test_db_error_mapping() {
        let err: StoreError = DbError::not_found("InventoryItem", "abc").into();
        assert!(matches!(err, StoreError::NotFound { ref id } if id == "abc"));

        let err: StoreError = DbError::decode("InventoryItem", "bad").into();
        assert!(matches!(err, StoreError::Malformed(_)));

        let err: StoreError = DbError::PoolExhausted.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
