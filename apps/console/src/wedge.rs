//! # Keyboard-Wedge Scanner
//!
//! Handheld scanners in keyboard mode "type" the barcode followed by Enter.
//! On a terminal that makes them a native scan provider over stdin: each
//! line is one scan, an empty line (or end of input) is a cancel.
//!
//! There is no camera to authorize, so permission is always granted, and
//! no scanner UI to tear down.
//!
//! ```text
//!   reader thread ──lines──► mpsc ──recv──► scan()
//!   (blocking read)                  (cancel safe)
//! ```
//!
//! The blocking read lives on its own OS thread, outside the runtime, so a
//! cancelled scan leaves nothing for the runtime to wait on at shutdown.

use std::io::BufRead;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use warehub_scan::{CameraError, DeviceScanProvider, NativeScan, PermissionState};

/// Lines read ahead of the current scan.
const LINE_BUFFER: usize = 16;

type Line = std::io::Result<String>;

pub struct KeyboardWedgeProvider {
    lines: Mutex<mpsc::Receiver<Line>>,
}

impl KeyboardWedgeProvider {
    /// Reads scans from the process's stdin.
    pub fn stdin() -> Self {
        Self::from_reader(std::io::BufReader::new(std::io::stdin()))
    }

    /// Reads scans from `reader` on a dedicated thread.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        let spawned = std::thread::Builder::new()
            .name("wedge-reader".to_string())
            .spawn(move || read_lines(reader, tx));
        if let Err(e) = spawned {
            // The sender went down with the closure: every scan cancels.
            warn!(error = %e, "Could not start scanner reader thread");
        }
        Self::from_channel(rx)
    }

    fn from_channel(lines: mpsc::Receiver<Line>) -> Self {
        KeyboardWedgeProvider {
            lines: Mutex::new(lines),
        }
    }
}

fn read_lines<R: BufRead>(reader: R, tx: mpsc::Sender<Line>) {
    for line in reader.lines() {
        let failed = line.is_err();
        if tx.blocking_send(line).is_err() || failed {
            break;
        }
    }
    debug!("Scanner reader stopped");
}

#[async_trait]
impl DeviceScanProvider for KeyboardWedgeProvider {
    async fn check_permission(&self) -> Result<PermissionState, CameraError> {
        Ok(PermissionState::Granted)
    }

    async fn request_permission(&self) -> Result<PermissionState, CameraError> {
        Ok(PermissionState::Granted)
    }

    async fn scan(&self) -> Result<NativeScan, CameraError> {
        // recv is cancel safe: a cancelled scan loses no input.
        let mut lines = self.lines.lock().await;
        match lines.recv().await {
            Some(Ok(line)) => {
                let content = line.trim();
                if content.is_empty() {
                    Ok(NativeScan::Cancelled)
                } else {
                    Ok(NativeScan::Payloads(vec![content.to_string()]))
                }
            }
            Some(Err(e)) => Err(CameraError::Other(e.to_string())),
            None => {
                debug!("Scanner input closed");
                Ok(NativeScan::Cancelled)
            }
        }
    }

    fn stop_scan(&self) {}
}

/// Reader whose `read` never returns, like a terminal nobody types into.
#[cfg(test)]
pub(crate) struct SilentTerminal;

#[cfg(test)]
impl std::io::Read for SilentTerminal {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        loop {
            std::thread::park();
        }
    }
}
