//! # Error Types
//!
//! Domain-specific error types for warehub-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  warehub-core errors (this file)                                       │
//! │  ├── CoreError        - Inventory rule violations                      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  warehub-db errors                                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  warehub-scan errors                                                   │
//! │  ├── CameraError      - Camera / decoder failures (classified)         │
//! │  ├── LookupError      - Resolver failures                              │
//! │  └── AdjustError      - Adjuster failures                              │
//! │                                                                         │
//! │  Console errors                                                        │
//! │  └── ApiError         - What the operator sees (serialized)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Inventory rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Adding stock would exceed what a quantity can hold.
    ///
    /// ## When This Occurs
    /// `AdjustOperation::Add` on a record already close to `u32::MAX`.
    /// Subtraction never fails, it clamps at zero.
    #[error("Quantity overflow: {current} + {amount} exceeds the maximum stock level")]
    QuantityOverflow { current: u32, amount: u32 },

    /// A generated SKU could not be derived from the last SKU in the store.
    #[error("Cannot derive next SKU from '{last}': {reason}")]
    SkuSequence { last: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
