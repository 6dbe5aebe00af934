//! # Scan Session
//!
//! Runs one scan at a time and guarantees every resource it acquired is
//! released, whichever way the scan ends.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Idle ──start_scan──► AwaitingPermission ──granted──► Scanning         │
//! │                               │                          │    │         │
//! │                            denied                  decoded  stop_scan   │
//! │                               │                          │    │         │
//! │                               ▼                          ▼    ▼         │
//! │                           Cancelled               Completed  Cancelled  │
//! │                                                                         │
//! │  Completed / Cancelled are kept until the next start_scan, which       │
//! │  treats them like Idle.                                                │
//! │                                                                         │
//! │  start_scan while a session runs ──► ScanError::SessionActive          │
//! │  stop_scan with no session running ──► no-op                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Resource Release
//! Overlay, decoder and native scanner UI are held by drop guards inside
//! the running future, and the session slot itself is released by a guard
//! too. Success, cancel, failure, or the caller dropping the future all
//! take the same release path.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::{broadcast, oneshot};
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};
use ts_rs::TS;

use warehub_core::ScanPlatform;

use crate::error::{CameraError, FailureCategory, ScanError, ScanResult};
use crate::permission::PermissionChecker;
use crate::provider::{
    BrowserDevices, DecodeEvent, DecoderGuard, DeviceScanProvider, NativeScan, NativeScanGuard,
    OverlayHandle, ScanBackend,
};

const NOTICE_CAPACITY: usize = 32;

// =============================================================================
// Public Types
// =============================================================================

/// Decoded content of a barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ScanPayload {
    pub content: String,
}

/// Where the controller is in its state machine.
///
/// Failures end as `Cancelled`; [`ScanController::last_outcome`] has the
/// reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScanState {
    Idle,
    AwaitingPermission,
    Scanning,
    Completed { payload: ScanPayload },
    Cancelled,
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanState::Idle => write!(f, "idle"),
            ScanState::AwaitingPermission => write!(f, "awaiting permission"),
            ScanState::Scanning => write!(f, "scanning"),
            ScanState::Completed { .. } => write!(f, "completed"),
            ScanState::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl ScanState {
    /// Returns true while a session owns the controller.
    pub fn is_active(&self) -> bool {
        matches!(self, ScanState::AwaitingPermission | ScanState::Scanning)
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Completed(ScanPayload),
    /// Operator cancelled, or the device reported nothing.
    Cancelled,
    /// Permission or device failure.
    Failed(CameraError),
}

impl ScanOutcome {
    pub fn into_payload(self) -> Option<ScanPayload> {
        match self {
            ScanOutcome::Completed(payload) => Some(payload),
            ScanOutcome::Cancelled | ScanOutcome::Failed(_) => None,
        }
    }

    /// Terminal state this outcome is reported as.
    fn terminal_state(&self) -> ScanState {
        match self {
            ScanOutcome::Completed(payload) => ScanState::Completed {
                payload: payload.clone(),
            },
            ScanOutcome::Cancelled | ScanOutcome::Failed(_) => ScanState::Cancelled,
        }
    }
}

/// Transient notification for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScanNotice {
    Started { platform: ScanPlatform },
    Failed { category: FailureCategory, message: String },
    Cancelled,
    Completed { content: String },
}

// =============================================================================
// Controller
// =============================================================================

struct Slot {
    state: ScanState,
    cancel: Option<oneshot::Sender<()>>,
    last_outcome: Option<ScanOutcome>,
}

struct Inner {
    backend: ScanBackend,
    permission: PermissionChecker,
    slot: Mutex<Slot>,
    notices: broadcast::Sender<ScanNotice>,
}

/// Owns the single scan session of a console.
///
/// Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct ScanController {
    inner: Arc<Inner>,
}

impl ScanController {
    pub fn new(backend: ScanBackend) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        ScanController {
            inner: Arc::new(Inner {
                permission: PermissionChecker::new(backend.clone()),
                backend,
                slot: Mutex::new(Slot {
                    state: ScanState::Idle,
                    cancel: None,
                    last_outcome: None,
                }),
                notices,
            }),
        }
    }

    /// Platform this controller scans on (fixed at construction).
    pub fn platform(&self) -> ScanPlatform {
        self.inner.backend.platform()
    }

    /// Current state.
    pub fn state(&self) -> ScanState {
        self.slot().state.clone()
    }

    /// How the most recent session ended.
    pub fn last_outcome(&self) -> Option<ScanOutcome> {
        self.slot().last_outcome.clone()
    }

    /// Subscribes to operator notices.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanNotice> {
        self.inner.notices.subscribe()
    }

    /// Runs one scan.
    ///
    /// ## Returns
    /// * `Ok(Some(payload))` - first decoded value
    /// * `Ok(None)` - cancelled, permission denied or device failure
    /// * `Err(ScanError::SessionActive)` - another scan is running
    pub async fn start_scan(&self) -> ScanResult<Option<ScanPayload>> {
        Ok(self.run_session().await?.into_payload())
    }

    /// Like [`start_scan`](Self::start_scan) but reports why nothing was
    /// returned.
    pub async fn run_session(&self) -> ScanResult<ScanOutcome> {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let mut active = self.claim(cancel_tx)?;

        self.notify(ScanNotice::Started {
            platform: self.platform(),
        });

        let outcome = self.drive(cancel_rx).await;

        match &outcome {
            ScanOutcome::Completed(payload) => {
                info!(platform = %self.platform(), content = %payload.content, "Scan completed");
                self.notify(ScanNotice::Completed {
                    content: payload.content.clone(),
                });
            }
            ScanOutcome::Cancelled => {
                info!(platform = %self.platform(), "Scan cancelled");
                self.notify(ScanNotice::Cancelled);
            }
            ScanOutcome::Failed(err) => {
                warn!(platform = %self.platform(), error = %err, "Scan failed");
                self.notify(ScanNotice::Failed {
                    category: err.category(),
                    message: err.to_string(),
                });
            }
        }

        active.finish(outcome.clone());
        Ok(outcome)
    }

    /// Cancels the running scan. No-op when idle.
    pub fn stop_scan(&self) {
        let cancel = self.slot().cancel.take();
        match cancel {
            Some(tx) => {
                debug!("Cancelling active scan");
                let _ = tx.send(());
            }
            None => debug!("stop_scan with no active scan"),
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn slot(&self) -> MutexGuard<'_, Slot> {
        // A poisoned slot only means a panic elsewhere; the data is still
        // a valid state.
        self.inner
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn claim(&self, cancel: oneshot::Sender<()>) -> ScanResult<ActiveSession<'_>> {
        let mut slot = self.slot();
        if slot.state.is_active() {
            return Err(ScanError::SessionActive {
                state: slot.state.clone(),
            });
        }
        slot.state = ScanState::AwaitingPermission;
        slot.cancel = Some(cancel);
        Ok(ActiveSession {
            controller: self,
            finished: false,
        })
    }

    fn set_state(&self, state: ScanState) {
        self.slot().state = state;
    }

    fn notify(&self, notice: ScanNotice) {
        // No subscribers is fine.
        let _ = self.inner.notices.send(notice);
    }

    async fn drive(&self, mut cancel_rx: oneshot::Receiver<()>) -> ScanOutcome {
        tokio::select! {
            biased;
            _ = &mut cancel_rx => return ScanOutcome::Cancelled,
            checked = self.inner.permission.check() => {
                if let Err(err) = checked {
                    return ScanOutcome::Failed(err);
                }
            }
        }

        match &self.inner.backend {
            ScanBackend::Native(provider) => self.scan_native(provider.clone(), cancel_rx).await,
            ScanBackend::Browser(devices) => self.scan_browser(devices, cancel_rx).await,
        }
    }

    async fn scan_native(
        &self,
        provider: Arc<dyn DeviceScanProvider>,
        mut cancel_rx: oneshot::Receiver<()>,
    ) -> ScanOutcome {
        let _stop = NativeScanGuard(provider.clone());
        self.set_state(ScanState::Scanning);

        tokio::select! {
            biased;
            _ = &mut cancel_rx => ScanOutcome::Cancelled,
            result = provider.scan() => match result {
                Ok(NativeScan::Payloads(payloads)) => {
                    match payloads.into_iter().find(|p| !p.is_empty()) {
                        Some(content) => ScanOutcome::Completed(ScanPayload { content }),
                        None => ScanOutcome::Cancelled,
                    }
                }
                Ok(NativeScan::Cancelled) => ScanOutcome::Cancelled,
                Err(err) => ScanOutcome::Failed(err),
            },
        }
    }

    async fn scan_browser(
        &self,
        devices: &BrowserDevices,
        mut cancel_rx: oneshot::Receiver<()>,
    ) -> ScanOutcome {
        devices.overlays.remove_stale();

        let overlay = match OverlayHandle::mount(devices.overlays.clone()) {
            Ok(overlay) => overlay,
            Err(err) => return ScanOutcome::Failed(err),
        };

        let _stop = DecoderGuard(devices.decoder.clone());
        let mut frames = tokio::select! {
            biased;
            _ = &mut cancel_rx => return ScanOutcome::Cancelled,
            started = devices.decoder.start(overlay.id()) => match started {
                Ok(frames) => frames,
                Err(err) => return ScanOutcome::Failed(err),
            },
        };

        self.set_state(ScanState::Scanning);
        debug!(overlay = overlay.id().0, "Decode loop running");

        let mut misses: u64 = 0;
        let outcome = loop {
            tokio::select! {
                biased;
                _ = &mut cancel_rx => break ScanOutcome::Cancelled,
                event = frames.next() => match event {
                    Some(DecodeEvent::Decoded(content)) if !content.is_empty() => {
                        break ScanOutcome::Completed(ScanPayload { content });
                    }
                    Some(_) => misses += 1,
                    None => {
                        break ScanOutcome::Failed(CameraError::Other(
                            "decoder stopped unexpectedly".to_string(),
                        ));
                    }
                },
            }
        };

        debug!(misses, "Decode loop finished");
        outcome
    }
}

impl std::fmt::Debug for ScanController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanController")
            .field("platform", &self.platform())
            .field("state", &self.state())
            .finish()
    }
}

/// Marks the controller busy for the life of one session.
///
/// Dropping it without `finish` (the caller abandoned the future) records
/// a cancellation; either way the slot leaves the active states.
struct ActiveSession<'a> {
    controller: &'a ScanController,
    finished: bool,
}

impl ActiveSession<'_> {
    fn finish(&mut self, outcome: ScanOutcome) {
        self.release(outcome);
        self.finished = true;
    }

    fn release(&self, outcome: ScanOutcome) {
        let mut slot = self.controller.slot();
        slot.state = outcome.terminal_state();
        slot.cancel = None;
        slot.last_outcome = Some(outcome);
        debug!(state = %slot.state, "Session released");
    }
}

impl Drop for ActiveSession<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.release(ScanOutcome::Cancelled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::PermissionState;
    use crate::testing::{browser_backend, FakeCamera, FakeNativeProvider};
    use std::sync::atomic::Ordering;

    async fn wait_for_scanning(controller: &ScanController) {
        while controller.state() != ScanState::Scanning {
            tokio::task::yield_now().await;
        }
    }

    fn payload(content: &str) -> Option<ScanPayload> {
        Some(ScanPayload {
            content: content.to_string(),
        })
    }

    // -------------------------------------------------------------------------
    // Native
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_native_first_payload_wins() {
        let provider = Arc::new(
            FakeNativeProvider::new(PermissionState::Granted)
                .with_scan(Ok(NativeScan::Payloads(vec!["WHW-00001".into(), "X".into()]))),
        );
        let controller = ScanController::new(ScanBackend::Native(provider.clone()));

        assert_eq!(controller.start_scan().await.unwrap(), payload("WHW-00001"));
        assert_eq!(
            controller.state(),
            ScanState::Completed {
                payload: ScanPayload {
                    content: "WHW-00001".into()
                }
            }
        );
        assert_eq!(provider.stops.load(Ordering::SeqCst), 1);

        // A finished controller accepts the next session.
        assert_eq!(controller.start_scan().await.unwrap(), payload("WHW-00001"));
    }

    #[tokio::test]
    async fn test_native_empty_result_is_cancel() {
        let provider = Arc::new(
            FakeNativeProvider::new(PermissionState::Granted)
                .with_scan(Ok(NativeScan::Payloads(Vec::new()))),
        );
        let controller = ScanController::new(ScanBackend::Native(provider));

        assert_eq!(controller.start_scan().await.unwrap(), None);
        assert_eq!(controller.last_outcome(), Some(ScanOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_native_permission_denied_never_scans() {
        let provider = Arc::new(
            FakeNativeProvider::new(PermissionState::Denied)
                .with_request_result(PermissionState::Denied),
        );
        let controller = ScanController::new(ScanBackend::Native(provider.clone()));
        let mut notices = controller.subscribe();

        assert_eq!(controller.start_scan().await.unwrap(), None);
        assert_eq!(provider.scans.load(Ordering::SeqCst), 0);
        assert_eq!(
            controller.last_outcome(),
            Some(ScanOutcome::Failed(CameraError::PermissionDenied))
        );

        assert!(matches!(notices.recv().await.unwrap(), ScanNotice::Started { .. }));
        match notices.recv().await.unwrap() {
            ScanNotice::Failed { category, .. } => {
                assert_eq!(category, FailureCategory::PermissionDenied)
            }
            other => panic!("unexpected notice {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_native_cancel_stops_platform_scanner() {
        let provider = Arc::new(FakeNativeProvider::new(PermissionState::Granted).hanging());
        let controller = ScanController::new(ScanBackend::Native(provider.clone()));

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.start_scan().await })
        };
        wait_for_scanning(&controller).await;
        controller.stop_scan();

        assert_eq!(task.await.unwrap().unwrap(), None);
        assert_eq!(provider.stops.load(Ordering::SeqCst), 1);
        assert_eq!(controller.state(), ScanState::Cancelled);
    }

    #[tokio::test]
    async fn test_second_session_is_rejected() {
        let provider = Arc::new(FakeNativeProvider::new(PermissionState::Granted).hanging());
        let controller = ScanController::new(ScanBackend::Native(provider));

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.start_scan().await })
        };
        wait_for_scanning(&controller).await;

        let err = controller.start_scan().await.unwrap_err();
        assert!(matches!(err, ScanError::SessionActive { state: ScanState::Scanning }));

        controller.stop_scan();
        assert_eq!(task.await.unwrap().unwrap(), None);
    }

    #[tokio::test]
    async fn test_stop_scan_when_idle_is_noop() {
        let (backend, overlays, _) = browser_backend(FakeCamera::ok(), Vec::new());
        let controller = ScanController::new(backend);

        controller.stop_scan();
        controller.stop_scan();

        assert_eq!(controller.state(), ScanState::Idle);
        assert_eq!(overlays.mounted_count(), 0);
        assert_eq!(controller.last_outcome(), None);
    }

    #[tokio::test]
    async fn test_abandoned_future_releases_slot() {
        let provider = Arc::new(FakeNativeProvider::new(PermissionState::Granted).hanging());
        let controller = ScanController::new(ScanBackend::Native(provider.clone()));

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.start_scan().await })
        };
        wait_for_scanning(&controller).await;
        task.abort();
        let _ = task.await;

        assert_eq!(controller.state(), ScanState::Cancelled);
        assert_eq!(provider.stops.load(Ordering::SeqCst), 1);
        assert_eq!(controller.last_outcome(), Some(ScanOutcome::Cancelled));
    }

    // -------------------------------------------------------------------------
    // Browser
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_browser_first_decode_wins_and_cleans_up() {
        let (backend, overlays, decoder) = browser_backend(
            FakeCamera::ok(),
            vec![
                DecodeEvent::Miss,
                DecodeEvent::Miss,
                DecodeEvent::Decoded("ALT-1".into()),
                DecodeEvent::Decoded("LATE".into()),
            ],
        );
        let controller = ScanController::new(backend);

        assert_eq!(controller.start_scan().await.unwrap(), payload("ALT-1"));
        assert_eq!(
            controller.last_outcome(),
            Some(ScanOutcome::Completed(ScanPayload {
                content: "ALT-1".into()
            }))
        );
        assert_eq!(overlays.mounted_count(), 0);
        assert_eq!(overlays.mounts.load(Ordering::SeqCst), 1);
        assert_eq!(decoder.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_browser_permission_denied_creates_no_overlay() {
        let (backend, overlays, decoder) = browser_backend(
            FakeCamera::failing(CameraError::classify("NotAllowedError", "")),
            vec![DecodeEvent::Decoded("WHW-00001".into())],
        );
        let controller = ScanController::new(backend);

        assert_eq!(controller.start_scan().await.unwrap(), None);
        assert_eq!(overlays.mounts.load(Ordering::SeqCst), 0);
        assert_eq!(overlays.mounted_count(), 0);
        assert_eq!(decoder.starts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_browser_decoder_start_failure_releases_overlay() {
        let (backend, overlays, decoder) = browser_backend(FakeCamera::ok(), Vec::new());
        decoder.fail_start(CameraError::UnsupportedConstraints);
        let controller = ScanController::new(backend);

        assert_eq!(controller.start_scan().await.unwrap(), None);
        assert_eq!(
            controller.last_outcome(),
            Some(ScanOutcome::Failed(CameraError::UnsupportedConstraints))
        );
        assert_eq!(overlays.mounts.load(Ordering::SeqCst), 1);
        assert_eq!(overlays.mounted_count(), 0);
    }

    #[tokio::test]
    async fn test_browser_cancel_removes_overlay() {
        let (backend, overlays, decoder) =
            browser_backend(FakeCamera::ok(), vec![DecodeEvent::Miss]);
        decoder.keep_open();
        let controller = ScanController::new(backend);

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.start_scan().await })
        };
        wait_for_scanning(&controller).await;
        assert_eq!(overlays.mounted_count(), 1);

        controller.stop_scan();
        assert_eq!(task.await.unwrap().unwrap(), None);
        assert_eq!(overlays.mounted_count(), 0);
        assert_eq!(decoder.stops.load(Ordering::SeqCst), 1);

        // Second stop after the session ended changes nothing.
        controller.stop_scan();
        assert_eq!(controller.last_outcome(), Some(ScanOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_browser_sweeps_stale_overlay_first() {
        let (backend, overlays, _) = browser_backend(
            FakeCamera::ok(),
            vec![DecodeEvent::Decoded("WHW-00001".into())],
        );
        overlays.leak_stale_overlay();
        let controller = ScanController::new(backend);

        assert_eq!(controller.start_scan().await.unwrap(), payload("WHW-00001"));
        assert_eq!(overlays.sweeps.load(Ordering::SeqCst), 1);
        assert_eq!(overlays.mounted_count(), 0);
    }

    #[tokio::test]
    async fn test_browser_stream_end_is_failure() {
        let (backend, overlays, _) =
            browser_backend(FakeCamera::ok(), vec![DecodeEvent::Miss, DecodeEvent::Miss]);
        let controller = ScanController::new(backend);

        assert_eq!(controller.start_scan().await.unwrap(), None);
        assert!(matches!(
            controller.last_outcome(),
            Some(ScanOutcome::Failed(CameraError::Other(_)))
        ));
        assert_eq!(overlays.mounted_count(), 0);
    }
}
