//! # Domain Types
//!
//! Core domain types used throughout Warehub.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────────┐                     │
//! │  │  InventoryRecord    │   │  NewInventoryItem   │                     │
//! │  │  ─────────────────  │   │  ─────────────────  │                     │
//! │  │  id (UUID)          │   │  sku                │                     │
//! │  │  sku (business)     │   │  barcode_text       │                     │
//! │  │  barcode_text       │   │  name               │                     │
//! │  │  name               │   │  quantity           │                     │
//! │  │  quantity (u32)     │   └─────────────────────┘                     │
//! │  │  updated_at         │                                               │
//! │  └─────────────────────┘   ┌─────────────────────┐                     │
//! │                            │   ScanPlatform      │                     │
//! │                            │  Native | Browser   │                     │
//! │                            └─────────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Scannable Identity
//! A record can be found by either of two identifiers:
//! - `sku`: always present, printed on labels generated by Warehub
//! - `barcode_text`: the manufacturer's code, when the item already had one

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Inventory Record
// =============================================================================

/// A stocked item as held by the inventory store.
///
/// The store owns these rows; the workflow only reads them and writes
/// new quantities back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Alternate scannable text (EAN-13, UPC-A, vendor code, ...).
    pub barcode_text: Option<String>,

    /// Display name.
    pub name: String,

    /// Units on hand. Never negative.
    pub quantity: u32,

    /// When the record was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the record was last written.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    /// Returns true if `payload` equals either scannable identifier.
    pub fn matches_identifier(&self, payload: &str) -> bool {
        self.sku == payload || self.barcode_text.as_deref() == Some(payload)
    }
}

// =============================================================================
// New Inventory Item
// =============================================================================

/// Input for creating an inventory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInventoryItem {
    pub sku: String,
    pub barcode_text: Option<String>,
    pub name: String,
    pub quantity: u32,
}

// =============================================================================
// Scan Platform
// =============================================================================

/// Which scanning mechanism a session uses.
///
/// Chosen once per session and never switched mid-scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ScanPlatform {
    /// Device scanner that owns its own camera UI.
    Native,
    /// Camera stream decoded inside an overlay.
    Browser,
}

impl std::fmt::Display for ScanPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanPlatform::Native => write!(f, "native"),
            ScanPlatform::Browser => write!(f, "browser"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> InventoryRecord {
        let now = Utc::now();
        InventoryRecord {
            id: "rec-1".to_string(),
            sku: "WHW-00001".to_string(),
            barcode_text: Some("ALT-1".to_string()),
            name: "Pallet wrap".to_string(),
            quantity: 50,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_matches_either_identifier() {
        let rec = record();
        assert!(rec.matches_identifier("WHW-00001"));
        assert!(rec.matches_identifier("ALT-1"));
        assert!(!rec.matches_identifier("ZZZ-999"));
    }

    #[test]
    fn test_matches_without_barcode_text() {
        let mut rec = record();
        rec.barcode_text = None;
        assert!(rec.matches_identifier("WHW-00001"));
        assert!(!rec.matches_identifier("ALT-1"));
    }

    #[test]
    fn test_platform_serializes_snake_case() {
        let json = serde_json::to_string(&ScanPlatform::Browser).unwrap();
        assert_eq!(json, "\"browser\"");
        assert_eq!(ScanPlatform::Native.to_string(), "native");
    }
}
