//! # Inventory Commands
//!
//! Lookup and adjustment by typed identifier, item creation with a
//! generated SKU, and listing.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};
use ts_rs::TS;

use warehub_core::sku::next_sku;
use warehub_core::validation::validate_new_item;
use warehub_core::{AdjustAmount, AdjustOperation, NewInventoryItem};

use super::{AdjustmentDto, ItemDto, ItemList};
use crate::config::InventorySettings;
use crate::error::ApiError;
use crate::state::{DbState, WorkflowState};

/// Lookup result; `item` is absent when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LookupDto {
    pub payload: String,
    pub item: Option<ItemDto>,
}

impl std::fmt::Display for LookupDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.item {
            Some(ref item) => write!(f, "{}", item),
            None => write!(f, "No inventory item matches '{}'", self.payload),
        }
    }
}

/// Input for `create`.
#[derive(Debug, Clone, Default)]
pub struct CreateItemInput {
    pub name: String,
    pub barcode_text: Option<String>,
    /// Generated from the configured prefix when absent.
    pub sku: Option<String>,
    pub quantity: u32,
}

/// Resolves an identifier the way a scan would.
pub async fn lookup(state: &WorkflowState, payload: &str) -> Result<LookupDto, ApiError> {
    debug!(payload = %payload, "lookup command");
    let item = state.workflow().resolver().resolve(payload).await?;

    Ok(LookupDto {
        payload: payload.trim().to_string(),
        item: item.map(ItemDto::from),
    })
}

/// Resolves `payload` then adjusts the matched record.
pub async fn adjust(
    state: &WorkflowState,
    payload: &str,
    operation: AdjustOperation,
    amount: u32,
) -> Result<AdjustmentDto, ApiError> {
    debug!(payload = %payload, %operation, amount, "adjust command");
    let amount = AdjustAmount::new(amount)?;

    let workflow = state.workflow();
    let record = workflow
        .resolver()
        .resolve(payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Inventory item", payload.trim()))?;

    let previous_quantity = record.quantity;
    let updated = workflow.adjust(&record, operation, amount).await?;

    Ok(AdjustmentDto {
        item: updated.into(),
        operation,
        amount: amount.get(),
        previous_quantity,
    })
}

/// Creates an item, generating its SKU when none is given.
pub async fn create(
    db: &DbState,
    settings: &InventorySettings,
    input: CreateItemInput,
) -> Result<ItemDto, ApiError> {
    let repo = db.inner().inventory();

    let sku = match input.sku {
        Some(sku) => sku.trim().to_string(),
        None => {
            let last = repo.last_generated_sku(&settings.sku_prefix).await?;
            next_sku(&settings.sku_prefix, last.as_deref())?
        }
    };

    let item = NewInventoryItem {
        sku,
        barcode_text: input
            .barcode_text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        name: input.name,
        quantity: input.quantity,
    };
    validate_new_item(&item)?;

    let record = repo.insert(&item).await?;
    info!(sku = %record.sku, id = %record.id, "Inventory item created");

    Ok(record.into())
}

/// Lists items, optionally filtered by name, SKU or barcode text.
pub async fn list(db: &DbState, query: Option<&str>, limit: u32) -> Result<ItemList, ApiError> {
    let start = Instant::now();
    let items = db.inner().inventory().list(query, limit).await?;

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = items.len(),
        "list complete"
    );

    Ok(ItemList(items.into_iter().map(ItemDto::from).collect()))
}
