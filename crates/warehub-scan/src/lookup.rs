//! # Lookup Resolver
//!
//! Maps a decoded payload to at most one inventory record.
//!
//! ```text
//!   payload ──trim──► empty? ──yes──► Ok(None)            (no query)
//!                        │
//!                        no ──► store: sku = p OR barcode_text = p
//!                                  │
//!                    0 ──► Ok(None) │ 1 ──► Ok(Some)  │ n ──► Ambiguous
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use warehub_core::InventoryRecord;

use crate::error::{LookupError, LookupResult};
use crate::store::InventoryStore;

#[derive(Clone)]
pub struct LookupResolver {
    store: Arc<dyn InventoryStore>,
}

impl LookupResolver {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        LookupResolver { store }
    }

    /// Resolves a scanned payload.
    ///
    /// ## Returns
    /// * `Ok(Some(record))` - exactly one record matched
    /// * `Ok(None)` - nothing matched
    /// * `Err(LookupError::Ambiguous)` - several records matched
    /// * `Err(LookupError::Store)` - the store could not answer
    pub async fn resolve(&self, payload: &str) -> LookupResult<Option<InventoryRecord>> {
        let payload = payload.trim();
        if payload.is_empty() {
            debug!("Empty payload, skipping lookup");
            return Ok(None);
        }

        let mut matches = self.store.find_by_identifier(payload).await?;
        match matches.len() {
            0 => {
                debug!(payload = %payload, "No inventory record matched");
                Ok(None)
            }
            1 => Ok(matches.pop()),
            count => {
                warn!(payload = %payload, count, "Scanned identifier is ambiguous");
                Err(LookupError::Ambiguous {
                    payload: payload.to_string(),
                    count,
                })
            }
        }
    }
}
