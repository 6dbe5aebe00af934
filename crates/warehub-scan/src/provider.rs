//! # Device Seams
//!
//! Traits for everything a scan session touches outside the process.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         ScanBackend                                     │
//! │                                                                         │
//! │  Native                              Browser                            │
//! │  ──────                              ───────                            │
//! │  DeviceScanProvider                  CameraAccess   (permission probe)  │
//! │   • check_permission                 OverlayHost    (scan surface)      │
//! │   • request_permission               FrameDecoder   (decode stream)     │
//! │   • scan  → payloads | cancelled                                        │
//! │   • stop_scan                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `stop_scan`, `unmount` and `FrameDecoder::stop` are synchronous so the
//! session can call them from `Drop`.

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_stream::Stream;

use warehub_core::ScanPlatform;

use crate::error::CameraError;

// =============================================================================
// Native
// =============================================================================

/// Camera authorization as reported by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    Granted,
    /// Granted with restrictions; enough to scan.
    Limited,
    Denied,
    /// Not asked yet.
    Prompt,
}

impl PermissionState {
    /// Returns true if scanning may proceed.
    pub fn allows_scanning(self) -> bool {
        matches!(self, PermissionState::Granted | PermissionState::Limited)
    }
}

/// Result of one native scan call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeScan {
    /// Decoded payloads, in the order the device reported them.
    Payloads(Vec<String>),
    /// The operator closed the device's scanner UI.
    Cancelled,
}

/// A platform scanner that owns its own camera UI.
#[async_trait]
pub trait DeviceScanProvider: Send + Sync {
    /// Current camera authorization, without prompting.
    async fn check_permission(&self) -> Result<PermissionState, CameraError>;

    /// Prompts for camera authorization.
    async fn request_permission(&self) -> Result<PermissionState, CameraError>;

    /// Suspends until the device decodes something or is cancelled.
    async fn scan(&self) -> Result<NativeScan, CameraError>;

    /// Tears down any platform scanning UI. Must be idempotent.
    fn stop_scan(&self);
}

// =============================================================================
// Browser
// =============================================================================

/// Identifier of a mounted scan overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

/// One step of the continuous decode loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// A frame was read but nothing decodable was in it.
    Miss,
    /// A barcode was decoded.
    Decoded(String),
}

/// Decode events for one overlay; ends only if the decoder dies.
pub type DecodeStream = Pin<Box<dyn Stream<Item = DecodeEvent> + Send>>;

/// Opens and immediately releases a camera stream.
#[async_trait]
pub trait CameraAccess: Send + Sync {
    async fn probe(&self) -> Result<(), CameraError>;
}

/// The UI tree the scan overlay is attached to.
///
/// The overlay's close affordance should call
/// [`ScanController::stop_scan`](crate::session::ScanController::stop_scan).
pub trait OverlayHost: Send + Sync {
    /// Removes overlays left behind by a session that never released them.
    fn remove_stale(&self);

    /// Attaches a fresh overlay (video surface plus close button).
    fn mount(&self) -> Result<OverlayId, CameraError>;

    /// Detaches an overlay. Unknown ids are ignored.
    fn unmount(&self, id: OverlayId);
}

/// Continuous frame decoder bound to an overlay's video surface.
#[async_trait]
pub trait FrameDecoder: Send + Sync {
    async fn start(&self, overlay: OverlayId) -> Result<DecodeStream, CameraError>;

    /// Stops reading frames. Must be idempotent.
    fn stop(&self);
}

/// The browser-side collaborators of a session.
#[derive(Clone)]
pub struct BrowserDevices {
    pub camera: Arc<dyn CameraAccess>,
    pub overlays: Arc<dyn OverlayHost>,
    pub decoder: Arc<dyn FrameDecoder>,
}

// =============================================================================
// Backend
// =============================================================================

/// Scanning mechanism a controller is built with.
#[derive(Clone)]
pub enum ScanBackend {
    Native(Arc<dyn DeviceScanProvider>),
    Browser(BrowserDevices),
}

impl ScanBackend {
    /// Returns the platform this backend scans on.
    pub fn platform(&self) -> ScanPlatform {
        match self {
            ScanBackend::Native(_) => ScanPlatform::Native,
            ScanBackend::Browser(_) => ScanPlatform::Browser,
        }
    }
}

impl std::fmt::Debug for ScanBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ScanBackend").field(&self.platform()).finish()
    }
}

// =============================================================================
// Release Guards
// =============================================================================

/// Owned overlay; unmounted when dropped.
pub struct OverlayHandle {
    id: OverlayId,
    host: Arc<dyn OverlayHost>,
}

impl OverlayHandle {
    /// Mounts a new overlay on `host`.
    pub fn mount(host: Arc<dyn OverlayHost>) -> Result<Self, CameraError> {
        let id = host.mount()?;
        Ok(OverlayHandle { id, host })
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }
}

impl Drop for OverlayHandle {
    fn drop(&mut self) {
        self.host.unmount(self.id);
    }
}

/// Stops the decoder when dropped.
pub(crate) struct DecoderGuard(pub(crate) Arc<dyn FrameDecoder>);

impl Drop for DecoderGuard {
    fn drop(&mut self) {
        self.0.stop();
    }
}

/// Stops the native scanner UI when dropped.
pub(crate) struct NativeScanGuard(pub(crate) Arc<dyn DeviceScanProvider>);

impl Drop for NativeScanGuard {
    fn drop(&mut self) {
        self.0.stop_scan();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeOverlayHost;

    #[test]
    fn test_overlay_handle_unmounts_on_drop() {
        let host = Arc::new(FakeOverlayHost::default());
        let handle = OverlayHandle::mount(host.clone()).unwrap();
        assert_eq!(host.mounted_count(), 1);

        drop(handle);
        assert_eq!(host.mounted_count(), 0);
    }

    #[test]
    fn test_permission_state_allows_scanning() {
        assert!(PermissionState::Granted.allows_scanning());
        assert!(PermissionState::Limited.allows_scanning());
        assert!(!PermissionState::Denied.allows_scanning());
        assert!(!PermissionState::Prompt.allows_scanning());
    }
}
