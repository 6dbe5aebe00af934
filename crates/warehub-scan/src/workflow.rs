//! # Scan Workflow
//!
//! Scan, then resolve, then (if the operator asks) adjust. Adjustment only
//! accepts a record that came out of a resolve, so the sequence cannot be
//! reordered.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use warehub_core::{AdjustAmount, AdjustOperation, InventoryRecord};

use crate::adjust::QuantityAdjuster;
use crate::error::{AdjustResult, WorkflowError};
use crate::lookup::LookupResolver;
use crate::provider::ScanBackend;
use crate::session::ScanController;
use crate::store::InventoryStore;

/// What one scan turned into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanResolution {
    /// The session ended without a payload.
    Cancelled,
    /// A payload was read but no record carries it.
    NotFound { payload: String },
    Found { record: InventoryRecord },
}

/// A scan controller wired to a store.
#[derive(Clone)]
pub struct ScanWorkflow {
    controller: ScanController,
    resolver: LookupResolver,
    adjuster: QuantityAdjuster,
}

impl ScanWorkflow {
    pub fn new(backend: ScanBackend, store: Arc<dyn InventoryStore>) -> Self {
        ScanWorkflow {
            controller: ScanController::new(backend),
            resolver: LookupResolver::new(store.clone()),
            adjuster: QuantityAdjuster::new(store),
        }
    }

    pub fn controller(&self) -> &ScanController {
        &self.controller
    }

    pub fn resolver(&self) -> &LookupResolver {
        &self.resolver
    }

    pub fn adjuster(&self) -> &QuantityAdjuster {
        &self.adjuster
    }

    /// Runs one scan and resolves its payload.
    pub async fn scan_and_resolve(&self) -> Result<ScanResolution, WorkflowError> {
        let Some(payload) = self.controller.start_scan().await? else {
            return Ok(ScanResolution::Cancelled);
        };

        debug!(content = %payload.content, "Resolving scanned payload");
        match self.resolver.resolve(&payload.content).await? {
            Some(record) => Ok(ScanResolution::Found { record }),
            None => Ok(ScanResolution::NotFound {
                payload: payload.content,
            }),
        }
    }

    /// Adjusts a record returned by [`scan_and_resolve`](Self::scan_and_resolve)
    /// or a direct lookup.
    pub async fn adjust(
        &self,
        record: &InventoryRecord,
        operation: AdjustOperation,
        amount: AdjustAmount,
    ) -> AdjustResult<InventoryRecord> {
        self.adjuster.adjust(record, operation, amount).await
    }
}
