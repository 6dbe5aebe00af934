//! # warehub-core: Pure Inventory Logic for Warehub
//!
//! The rules every other crate relies on, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Warehub Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Operator Console (apps/console)                 │   │
//! │  │        scan ──► lookup ──► adjust ──► list / create             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            warehub-scan (session, resolver, adjuster)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ warehub-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌──────────┐   │   │
//! │  │   │   types   │  │ inventory  │  │    sku    │  │validation│   │   │
//! │  │   │  Record   │  │ AdjustOp   │  │ next_sku  │  │  rules   │   │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └──────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CAMERA • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   warehub-db (Database Layer)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (InventoryRecord, NewInventoryItem)
//! - [`inventory`] - Quantity adjustment arithmetic
//! - [`sku`] - SKU generation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use warehub_core::inventory::{AdjustAmount, AdjustOperation};
//!
//! let amount = AdjustAmount::new(5).unwrap();
//!
//! // Subtraction clamps at zero instead of going negative
//! assert_eq!(AdjustOperation::Subtract.apply(3, amount).unwrap(), 0);
//! assert_eq!(AdjustOperation::Add.apply(3, amount).unwrap(), 8);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod sku;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use inventory::{AdjustAmount, AdjustOperation};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// SKU prefix used when no prefix is configured ("WareHouse Ware").
pub const DEFAULT_SKU_PREFIX: &str = "WHW";

/// Number of digits in the numeric part of a generated SKU.
pub const SKU_DIGITS: usize = 5;

/// Largest amount a single adjustment may move.
///
/// ## Business Reason
/// A scanner operator typing 10000 instead of 100 should be stopped
/// before the write, not after.
pub const MAX_ADJUST_AMOUNT: u32 = 9_999;
