//! # Commands
//!
//! One function per console command. Each takes the state it needs and
//! returns a serializable DTO or an [`ApiError`](crate::error::ApiError).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  inventory.rs   lookup, adjust, create, list                           │
//! │  scan.rs        scan (scan ──► resolve ──► optional adjust)            │
//! │  config.rs      show_config                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod inventory;
pub mod scan;

use serde::Serialize;
use ts_rs::TS;

use warehub_core::{AdjustOperation, InventoryRecord};

/// Inventory record as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: String,
    pub sku: String,
    pub barcode_text: Option<String>,
    pub name: String,
    pub quantity: u32,
    /// RFC 3339
    pub updated_at: String,
}

impl From<InventoryRecord> for ItemDto {
    fn from(r: InventoryRecord) -> Self {
        ItemDto {
            id: r.id,
            sku: r.sku,
            barcode_text: r.barcode_text,
            name: r.name,
            quantity: r.quantity,
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}

impl std::fmt::Display for ItemDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<12} {:>7}  {}", self.sku, self.quantity, self.name)?;
        if let Some(ref text) = self.barcode_text {
            write!(f, "  [{}]", text)?;
        }
        Ok(())
    }
}

/// Result of a quantity adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentDto {
    pub item: ItemDto,
    pub operation: AdjustOperation,
    pub amount: u32,
    pub previous_quantity: u32,
}

impl std::fmt::Display for AdjustmentDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = match self.operation {
            AdjustOperation::Add => '+',
            AdjustOperation::Subtract => '-',
        };
        write!(
            f,
            "{}: {} {}{} -> {}",
            self.item.sku, self.previous_quantity, sign, self.amount, self.item.quantity
        )
    }
}

/// A list of items, one per line in text mode.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ItemList(pub Vec<ItemDto>);

impl std::fmt::Display for ItemList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No inventory items");
        }
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}
