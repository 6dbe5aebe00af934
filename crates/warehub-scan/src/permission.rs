//! # Permission Checker
//!
//! One attempt per call, no retries; the caller decides whether to ask
//! again.
//!
//! ```text
//!   Native:   check ──► granted? ──yes──► Ok
//!                          │
//!                          no ──► request ──► granted? ──► Ok / PermissionDenied
//!
//!   Browser:  open stream + close immediately ──► Ok / classified CameraError
//! ```

use tracing::{debug, info, warn};

use crate::error::CameraError;
use crate::provider::ScanBackend;

/// Verifies camera access for a scan backend.
#[derive(Debug, Clone)]
pub struct PermissionChecker {
    backend: ScanBackend,
}

impl PermissionChecker {
    pub fn new(backend: ScanBackend) -> Self {
        PermissionChecker { backend }
    }

    /// Returns true if scanning may proceed.
    pub async fn check_permission(&self) -> bool {
        self.check().await.is_ok()
    }

    /// Checks (and if needed requests) camera access.
    ///
    /// ## Returns
    /// * `Ok(())` - camera usable
    /// * `Err(CameraError)` - classified reason for display
    pub async fn check(&self) -> Result<(), CameraError> {
        match &self.backend {
            ScanBackend::Native(provider) => {
                let current = provider.check_permission().await?;
                debug!(?current, "Native camera permission");
                if current.allows_scanning() {
                    return Ok(());
                }

                info!("Requesting native camera permission");
                let requested = provider.request_permission().await?;
                if requested.allows_scanning() {
                    Ok(())
                } else {
                    warn!(?requested, "Native camera permission refused");
                    Err(CameraError::PermissionDenied)
                }
            }
            ScanBackend::Browser(devices) => {
                devices.camera.probe().await.map_err(|e| {
                    warn!(error = %e, "Camera probe failed");
                    e
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::PermissionState;
    use crate::testing::{browser_backend, FakeCamera, FakeNativeProvider};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_native_granted_does_not_request() {
        let provider = Arc::new(FakeNativeProvider::new(PermissionState::Granted));
        let checker = PermissionChecker::new(ScanBackend::Native(provider.clone()));

        assert!(checker.check_permission().await);
        assert_eq!(provider.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_native_prompt_requests_once() {
        let provider = Arc::new(
            FakeNativeProvider::new(PermissionState::Prompt)
                .with_request_result(PermissionState::Granted),
        );
        let checker = PermissionChecker::new(ScanBackend::Native(provider.clone()));

        assert!(checker.check_permission().await);
        assert_eq!(provider.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_native_request_refused() {
        let provider = Arc::new(
            FakeNativeProvider::new(PermissionState::Prompt)
                .with_request_result(PermissionState::Denied),
        );
        let checker = PermissionChecker::new(ScanBackend::Native(provider));

        assert_eq!(checker.check().await, Err(CameraError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_browser_probe_failure_is_classified() {
        let camera = FakeCamera::failing(CameraError::classify("NotReadableError", ""));
        let (backend, _, _) = browser_backend(camera, Vec::new());
        let checker = PermissionChecker::new(backend);

        assert_eq!(checker.check().await, Err(CameraError::InUse));
    }

    #[tokio::test]
    async fn test_browser_probe_success() {
        let (backend, _, _) = browser_backend(FakeCamera::ok(), Vec::new());
        assert!(PermissionChecker::new(backend).check_permission().await);
    }
}
