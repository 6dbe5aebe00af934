//! # Workflow State
//!
//! The scan workflow shared by `scan`, `lookup` and `adjust`, so an
//! adjustment started from any of them is seen by the others.

use std::sync::Arc;

use tracing::info;

use warehub_scan::{DeviceScanProvider, InventoryStore, ScanBackend, ScanWorkflow};

use crate::wedge::KeyboardWedgeProvider;

#[derive(Clone)]
pub struct WorkflowState {
    workflow: ScanWorkflow,
}

impl WorkflowState {
    pub fn new(backend: ScanBackend, store: Arc<dyn InventoryStore>) -> Self {
        info!(platform = %backend.platform(), "Scan workflow ready");
        WorkflowState {
            workflow: ScanWorkflow::new(backend, store),
        }
    }

    /// Workflow driven by a keyboard-wedge scanner on stdin.
    pub fn with_stdin_scanner(store: Arc<dyn InventoryStore>) -> Self {
        let provider: Arc<dyn DeviceScanProvider> = Arc::new(KeyboardWedgeProvider::stdin());
        Self::new(ScanBackend::Native(provider), store)
    }

    pub fn workflow(&self) -> &ScanWorkflow {
        &self.workflow
    }
}
