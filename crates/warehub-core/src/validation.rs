//! # Validation Module
//!
//! Input validation for inventory data.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Console command (argument parsing)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: business rule validation                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite (NOT NULL, UNIQUE(sku), CHECK(quantity >= 0))         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::NewInventoryItem;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_SKU_LEN: usize = 50;
const MAX_PREFIX_LEN: usize = 10;
const MAX_BARCODE_LEN: usize = 128;
const MAX_NAME_LEN: usize = 200;

/// Validates a SKU.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ```rust
/// use warehub_core::validation::validate_sku;
///
/// assert!(validate_sku("WHW-00001").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("WHW 1").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a SKU prefix used for generation: 1-10 ASCII uppercase
/// letters or digits.
pub fn validate_sku_prefix(prefix: &str) -> ValidationResult<()> {
    if prefix.is_empty() {
        return Err(ValidationError::Required {
            field: "sku_prefix".to_string(),
        });
    }

    if prefix.len() > MAX_PREFIX_LEN {
        return Err(ValidationError::TooLong {
            field: "sku_prefix".to_string(),
            max: MAX_PREFIX_LEN,
        });
    }

    if !prefix
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku_prefix".to_string(),
            reason: "must contain only uppercase letters and digits".to_string(),
        });
    }

    Ok(())
}

/// Validates alternate barcode text.
///
/// Barcode text comes from arbitrary vendor labels, so only emptiness,
/// length and control characters are checked.
pub fn validate_barcode_text(text: &str) -> ValidationResult<()> {
    if text.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "barcode_text".to_string(),
        });
    }

    if text.len() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode_text".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }

    if text.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode_text".to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(())
}

/// Validates an item name.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a complete new item before insert.
pub fn validate_new_item(item: &NewInventoryItem) -> ValidationResult<()> {
    validate_sku(&item.sku)?;
    validate_item_name(&item.name)?;
    if let Some(ref text) = item.barcode_text {
        validate_barcode_text(text)?;
    }
    Ok(())
}
