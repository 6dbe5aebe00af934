//! # Quantity Adjuster
//!
//! Computes a record's new quantity, writes it, and tells observers the
//! inventory changed.
//!
//! ```text
//!   record, op, amount
//!        │
//!        ▼
//!   claim record id ──busy──► AdjustError::InFlight
//!        │
//!        ▼
//!   op.apply(quantity, amount) ──overflow──► AdjustError::Rule
//!        │
//!        ▼
//!   store.update_quantity ──err──► AdjustError::Persistence
//!        │
//!        ▼
//!   broadcast InventoryChanged ──► Ok(updated record)
//! ```
//!
//! A write that has started is never cancelled: it runs on its own task so
//! dropping the caller's future does not abort it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};
use ts_rs::TS;

use warehub_core::{AdjustAmount, AdjustOperation, InventoryRecord};

use crate::error::{AdjustError, AdjustResult, StoreError};
use crate::store::InventoryStore;

const CHANGE_CAPACITY: usize = 64;

/// "Data changed" signal emitted after every successful write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct InventoryChanged {
    pub id: String,
    pub sku: String,
    pub operation: AdjustOperation,
    pub amount: u32,
    pub previous_quantity: u32,
    pub quantity: u32,
}

#[derive(Clone)]
pub struct QuantityAdjuster {
    store: Arc<dyn InventoryStore>,
    changes: broadcast::Sender<InventoryChanged>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl QuantityAdjuster {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        QuantityAdjuster {
            store,
            changes,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<InventoryChanged> {
        self.changes.subscribe()
    }

    /// Applies `operation` to `record` and persists the result.
    ///
    /// Subtraction clamps at zero. The returned record is the one the store
    /// wrote, with its new `updated_at`.
    pub async fn adjust(
        &self,
        record: &InventoryRecord,
        operation: AdjustOperation,
        amount: AdjustAmount,
    ) -> AdjustResult<InventoryRecord> {
        let claim = InFlightClaim::acquire(self.in_flight.clone(), record)?;
        let quantity = operation.apply(record.quantity, amount)?;

        let store = self.store.clone();
        let id = record.id.clone();
        let write = tokio::spawn(async move {
            let result = store.update_quantity(&id, quantity).await;
            drop(claim);
            result
        });

        let updated = match write.await {
            Ok(Ok(updated)) => updated,
            Ok(Err(err)) => {
                warn!(sku = %record.sku, error = %err, "Quantity write failed");
                return Err(AdjustError::Persistence(err));
            }
            Err(join) => {
                return Err(AdjustError::Persistence(StoreError::Unavailable(
                    join.to_string(),
                )))
            }
        };

        info!(
            sku = %updated.sku,
            %operation,
            amount = amount.get(),
            from = record.quantity,
            to = updated.quantity,
            "Quantity adjusted"
        );

        // No subscribers is fine.
        let _ = self.changes.send(InventoryChanged {
            id: updated.id.clone(),
            sku: updated.sku.clone(),
            operation,
            amount: amount.get(),
            previous_quantity: record.quantity,
            quantity: updated.quantity,
        });

        Ok(updated)
    }
}

/// Marks a record as being adjusted until dropped.
struct InFlightClaim {
    ids: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl InFlightClaim {
    fn acquire(ids: Arc<Mutex<HashSet<String>>>, record: &InventoryRecord) -> AdjustResult<Self> {
        if !lock(&ids).insert(record.id.clone()) {
            return Err(AdjustError::InFlight {
                sku: record.sku.clone(),
            });
        }
        Ok(InFlightClaim {
            ids,
            id: record.id.clone(),
        })
    }
}

impl Drop for InFlightClaim {
    fn drop(&mut self) {
        lock(&self.ids).remove(&self.id);
    }
}

fn lock(ids: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
