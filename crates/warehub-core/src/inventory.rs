//! # Quantity Adjustment
//!
//! The arithmetic behind every stock change.
//!
//! ## Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Adjustment Arithmetic                                │
//! │                                                                         │
//! │  Add:       new = current + amount        (overflow is an error)       │
//! │  Subtract:  new = max(0, current - amount)                             │
//! │                                                                         │
//! │  Example: on hand 3, subtract 5                                        │
//! │     3 - 5 = -2  ──►  clamped  ──►  0                                   │
//! │                                                                         │
//! │  The amount is always positive; direction comes from the operation.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::MAX_ADJUST_AMOUNT;

// =============================================================================
// Adjust Amount
// =============================================================================

/// A strictly positive number of units to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AdjustAmount(NonZeroU32);

impl AdjustAmount {
    /// Creates an amount, rejecting zero and anything above
    /// [`MAX_ADJUST_AMOUNT`].
    pub fn new(amount: u32) -> Result<Self, ValidationError> {
        if amount > MAX_ADJUST_AMOUNT {
            return Err(ValidationError::OutOfRange {
                field: "amount".to_string(),
                min: 1,
                max: MAX_ADJUST_AMOUNT as i64,
            });
        }

        NonZeroU32::new(amount)
            .map(AdjustAmount)
            .ok_or_else(|| ValidationError::MustBePositive {
                field: "amount".to_string(),
            })
    }

    /// Returns the amount as a plain integer.
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for AdjustAmount {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        AdjustAmount::new(value)
    }
}

impl From<AdjustAmount> for u32 {
    fn from(amount: AdjustAmount) -> Self {
        amount.get()
    }
}

// =============================================================================
// Adjust Operation
// =============================================================================

/// Direction of a stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AdjustOperation {
    /// Receive stock.
    Add,
    /// Remove stock (clamps at zero).
    Subtract,
}

impl AdjustOperation {
    /// Computes the quantity after applying this operation.
    ///
    /// ## Returns
    /// * `Ok(new_quantity)` - always >= 0
    /// * `Err(CoreError::QuantityOverflow)` - `Add` past `u32::MAX`
    pub fn apply(self, current: u32, amount: AdjustAmount) -> CoreResult<u32> {
        match self {
            AdjustOperation::Add => {
                current
                    .checked_add(amount.get())
                    .ok_or(CoreError::QuantityOverflow {
                        current,
                        amount: amount.get(),
                    })
            }
            AdjustOperation::Subtract => Ok(current.saturating_sub(amount.get())),
        }
    }
}

impl std::fmt::Display for AdjustOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjustOperation::Add => write!(f, "add"),
            AdjustOperation::Subtract => write!(f, "subtract"),
        }
    }
}

impl std::str::FromStr for AdjustOperation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" | "+" | "in" => Ok(AdjustOperation::Add),
            "subtract" | "sub" | "-" | "out" => Ok(AdjustOperation::Subtract),
            other => Err(ValidationError::InvalidFormat {
                field: "operation".to_string(),
                reason: format!("unknown operation '{}', expected add or subtract", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(n: u32) -> AdjustAmount {
        AdjustAmount::new(n).unwrap()
    }

    #[test]
    fn test_subtract_clamps_for_all_small_values() {
        for q in 0..=40u32 {
            for a in 1..=40u32 {
                let got = AdjustOperation::Subtract.apply(q, amount(a)).unwrap();
                assert_eq!(got as i64, (q as i64 - a as i64).max(0), "q={} a={}", q, a);
            }
        }
    }

    #[test]
    fn test_add_for_all_small_values() {
        for q in 0..=40u32 {
            for a in 1..=40u32 {
                assert_eq!(AdjustOperation::Add.apply(q, amount(a)).unwrap(), q + a);
            }
        }
    }

    #[test]
    fn test_subtract_below_zero_yields_zero() {
        assert_eq!(AdjustOperation::Subtract.apply(3, amount(5)).unwrap(), 0);
    }

    #[test]
    fn test_add_overflow_is_error() {
        let err = AdjustOperation::Add.apply(u32::MAX, amount(1)).unwrap_err();
        assert!(matches!(err, CoreError::QuantityOverflow { .. }));
    }

    #[test]
    fn test_amount_rejects_zero_and_huge() {
        assert!(matches!(
            AdjustAmount::new(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            AdjustAmount::new(MAX_ADJUST_AMOUNT + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert_eq!(AdjustAmount::new(MAX_ADJUST_AMOUNT).unwrap().get(), MAX_ADJUST_AMOUNT);
    }

    #[test]
    fn test_amount_deserialize_validates() {
        let ok: AdjustAmount = serde_json::from_str("7").unwrap();
        assert_eq!(ok.get(), 7);
        assert!(serde_json::from_str::<AdjustAmount>("0").is_err());
    }

    #[test]
    fn test_operation_parsing() {
        assert_eq!("add".parse::<AdjustOperation>().unwrap(), AdjustOperation::Add);
        assert_eq!("SUB".parse::<AdjustOperation>().unwrap(), AdjustOperation::Subtract);
        assert_eq!("-".parse::<AdjustOperation>().unwrap(), AdjustOperation::Subtract);
        assert!("double".parse::<AdjustOperation>().is_err());
    }
}
