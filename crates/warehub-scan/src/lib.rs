//! # warehub-scan: Scan-to-Inventory Workflow
//!
//! Camera permission, a single scan session, payload lookup and quantity
//! adjustment.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────┐ │
//! │  │  Permission  │──►│ Scan Session │──►│   Lookup     │──►│ Quantity │ │
//! │  │   Checker    │   │ (controller) │   │   Resolver   │   │ Adjuster │ │
//! │  └──────┬───────┘   └──────┬───────┘   └──────┬───────┘   └────┬─────┘ │
//! │         │                  │                  │                │       │
//! │         ▼                  ▼                  ▼                ▼       │
//! │   DeviceScanProvider / CameraAccess      InventoryStore (trait)       │
//! │   OverlayHost / FrameDecoder (traits)    SQLite via warehub-db        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`provider`] - Device seams and release guards
//! - [`permission`] - Camera permission checks
//! - [`session`] - Scan controller and its state machine
//! - [`store`] - Inventory store seam
//! - [`lookup`] - Payload to record resolution
//! - [`adjust`] - Quantity adjustment and change notices
//! - [`workflow`] - The four wired together
//! - [`error`] - Error taxonomy

pub mod adjust;
pub mod error;
pub mod lookup;
pub mod permission;
pub mod provider;
pub mod session;
pub mod store;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use adjust::{InventoryChanged, QuantityAdjuster};
pub use error::{
    AdjustError, CameraError, FailureCategory, LookupError, ScanError, StoreError, WorkflowError,
};
pub use lookup::LookupResolver;
pub use permission::PermissionChecker;
pub use provider::{
    BrowserDevices, CameraAccess, DecodeEvent, DecodeStream, DeviceScanProvider, FrameDecoder,
    NativeScan, OverlayHandle, OverlayHost, OverlayId, PermissionState, ScanBackend,
};
pub use session::{ScanController, ScanNotice, ScanOutcome, ScanPayload, ScanState};
pub use store::InventoryStore;
pub use workflow::{ScanResolution, ScanWorkflow};
