//! In-process fakes for the device and store seams.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio_stream::StreamExt;

use warehub_core::InventoryRecord;

use crate::error::{CameraError, StoreError, StoreResult};
use crate::provider::{
    BrowserDevices, CameraAccess, DecodeEvent, DecodeStream, DeviceScanProvider, FrameDecoder,
    NativeScan, OverlayHost, OverlayId, PermissionState, ScanBackend,
};
use crate::store::InventoryStore;

// =============================================================================
// Native
// =============================================================================

pub(crate) struct FakeNativeProvider {
    permission: PermissionState,
    request_result: PermissionState,
    /// `None` never resolves.
    scan_result: Option<Result<NativeScan, CameraError>>,
    pub requests: AtomicUsize,
    pub scans: AtomicUsize,
    pub stops: AtomicUsize,
}

impl FakeNativeProvider {
    pub fn new(permission: PermissionState) -> Self {
        FakeNativeProvider {
            permission,
            request_result: permission,
            scan_result: Some(Ok(NativeScan::Cancelled)),
            requests: AtomicUsize::new(0),
            scans: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    pub fn with_request_result(mut self, state: PermissionState) -> Self {
        self.request_result = state;
        self
    }

    pub fn with_scan(mut self, result: Result<NativeScan, CameraError>) -> Self {
        self.scan_result = Some(result);
        self
    }

    pub fn hanging(mut self) -> Self {
        self.scan_result = None;
        self
    }
}

#[async_trait]
impl DeviceScanProvider for FakeNativeProvider {
    async fn check_permission(&self) -> Result<PermissionState, CameraError> {
        Ok(self.permission)
    }

    async fn request_permission(&self) -> Result<PermissionState, CameraError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.request_result)
    }

    async fn scan(&self) -> Result<NativeScan, CameraError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        match &self.scan_result {
            Some(result) => result.clone(),
            None => std::future::pending().await,
        }
    }

    fn stop_scan(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Browser
// =============================================================================

pub(crate) struct FakeCamera {
    result: Result<(), CameraError>,
    pub probes: AtomicUsize,
}

impl FakeCamera {
    pub fn ok() -> Self {
        FakeCamera {
            result: Ok(()),
            probes: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: CameraError) -> Self {
        FakeCamera {
            result: Err(err),
            probes: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CameraAccess for FakeCamera {
    async fn probe(&self) -> Result<(), CameraError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

#[derive(Default)]
pub(crate) struct FakeOverlayHost {
    mounted: Mutex<HashSet<OverlayId>>,
    next_id: AtomicU64,
    pub mounts: AtomicUsize,
    pub sweeps: AtomicUsize,
}

impl FakeOverlayHost {
    pub fn mounted_count(&self) -> usize {
        self.mounted.lock().unwrap().len()
    }

    /// Leaves an overlay behind as a crashed session would.
    pub fn leak_stale_overlay(&self) {
        let id = OverlayId(u64::MAX - self.next_id.fetch_add(1, Ordering::SeqCst));
        self.mounted.lock().unwrap().insert(id);
    }
}

impl OverlayHost for FakeOverlayHost {
    fn remove_stale(&self) {
        let mut mounted = self.mounted.lock().unwrap();
        if !mounted.is_empty() {
            self.sweeps.fetch_add(1, Ordering::SeqCst);
            mounted.clear();
        }
    }

    fn mount(&self) -> Result<OverlayId, CameraError> {
        self.mounts.fetch_add(1, Ordering::SeqCst);
        let id = OverlayId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.mounted.lock().unwrap().insert(id);
        Ok(id)
    }

    fn unmount(&self, id: OverlayId) {
        self.mounted.lock().unwrap().remove(&id);
    }
}

pub(crate) struct FakeDecoder {
    events: Vec<DecodeEvent>,
    start_error: Mutex<Option<CameraError>>,
    keep_open: AtomicBool,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
}

impl FakeDecoder {
    pub fn new(events: Vec<DecodeEvent>) -> Self {
        FakeDecoder {
            events,
            start_error: Mutex::new(None),
            keep_open: AtomicBool::new(false),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    pub fn fail_start(&self, err: CameraError) {
        *self.start_error.lock().unwrap() = Some(err);
    }

    /// Keeps the stream pending after the scripted events instead of ending.
    pub fn keep_open(&self) {
        self.keep_open.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl FrameDecoder for FakeDecoder {
    async fn start(&self, _overlay: OverlayId) -> Result<DecodeStream, CameraError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.start_error.lock().unwrap().clone() {
            return Err(err);
        }

        let scripted = tokio_stream::iter(self.events.clone());
        if self.keep_open.load(Ordering::SeqCst) {
            Ok(Box::pin(scripted.chain(tokio_stream::pending())))
        } else {
            Ok(Box::pin(scripted))
        }
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) fn browser_backend(
    camera: FakeCamera,
    events: Vec<DecodeEvent>,
) -> (ScanBackend, Arc<FakeOverlayHost>, Arc<FakeDecoder>) {
    let overlays = Arc::new(FakeOverlayHost::default());
    let decoder = Arc::new(FakeDecoder::new(events));
    let backend = ScanBackend::Browser(BrowserDevices {
        camera: Arc::new(camera),
        overlays: overlays.clone(),
        decoder: decoder.clone(),
    });
    (backend, overlays, decoder)
}

// =============================================================================
// Store
// =============================================================================

#[derive(Default)]
pub(crate) struct MemoryStore {
    records: Mutex<Vec<InventoryRecord>>,
    failing: AtomicBool,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl MemoryStore {
    pub fn with_records(records: Vec<InventoryRecord>) -> Self {
        MemoryStore {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    /// Makes every later call fail as if the store were offline.
    pub fn go_offline(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn quantity_of(&self, id: &str) -> Option<u32> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.quantity)
    }

    /// Removes a record behind the workflow's back.
    pub fn remove(&self, id: &str) {
        self.records.lock().unwrap().retain(|r| r.id != id);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn find_by_identifier(&self, value: &str) -> StoreResult<Vec<InventoryRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.matches_identifier(value))
            .cloned()
            .collect())
    }

    async fn update_quantity(&self, id: &str, quantity: u32) -> StoreResult<InventoryRecord> {
        self.check_online()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        record.quantity = quantity;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

pub(crate) fn record(id: &str, sku: &str, barcode_text: Option<&str>, quantity: u32) -> InventoryRecord {
    let now = Utc::now();
    InventoryRecord {
        id: id.to_string(),
        sku: sku.to_string(),
        barcode_text: barcode_text.map(str::to_string),
        name: format!("Item {}", sku),
        quantity,
        created_at: now,
        updated_at: now,
    }
}
