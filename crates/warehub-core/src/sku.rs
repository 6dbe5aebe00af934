//! # SKU Generation
//!
//! Warehub prints its own labels for items that arrive without a usable
//! barcode. Those labels carry a generated SKU:
//!
//! ```text
//!   WHW-00001, WHW-00002, ... WHW-99999, WHW-100000, ...
//!   └┬┘ └─┬─┘
//!  prefix  zero-padded sequence (at least 5 digits)
//! ```

use crate::error::{CoreError, CoreResult};
use crate::validation::validate_sku_prefix;
use crate::SKU_DIGITS;

/// Formats a SKU from a prefix and sequence number.
///
/// ```rust
/// use warehub_core::sku::format_sku;
///
/// assert_eq!(format_sku("WHW", 1), "WHW-00001");
/// assert_eq!(format_sku("WHW", 123456), "WHW-123456");
/// ```
pub fn format_sku(prefix: &str, sequence: u64) -> String {
    format!("{}-{:0width$}", prefix, sequence, width = SKU_DIGITS)
}

/// Extracts the sequence number from a generated SKU.
///
/// Returns `None` when the SKU does not belong to `prefix` or its suffix
/// is not numeric (hand-entered SKUs share the table with generated ones).
pub fn parse_sequence(prefix: &str, sku: &str) -> Option<u64> {
    let suffix = sku.strip_prefix(prefix)?.strip_prefix('-')?;
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Returns the SKU that follows `last` for the given prefix.
///
/// ## Arguments
/// * `prefix` - e.g. "WHW"
/// * `last` - highest generated SKU currently stored, if any
///
/// ## Errors
/// * `CoreError::Validation` - invalid prefix
/// * `CoreError::SkuSequence` - `last` is not a generated SKU for `prefix`,
///   or the sequence is exhausted
pub fn next_sku(prefix: &str, last: Option<&str>) -> CoreResult<String> {
    validate_sku_prefix(prefix)?;

    let next = match last {
        None => 1,
        Some(last) => {
            let seq = parse_sequence(prefix, last).ok_or_else(|| CoreError::SkuSequence {
                last: last.to_string(),
                reason: format!("not a {}-NNNNN sku", prefix),
            })?;
            seq.checked_add(1).ok_or_else(|| CoreError::SkuSequence {
                last: last.to_string(),
                reason: "sequence exhausted".to_string(),
            })?
        }
    };

    Ok(format_sku(prefix, next))
}
