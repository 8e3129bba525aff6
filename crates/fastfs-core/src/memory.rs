//! In-memory volume scanner.
//!
//! `MemoryScanner` serves volumes and records defined up front instead of
//! reading devices. It keeps a ledger of the handles it has handed out, which
//! makes handle lifetimes observable, and can be told to fail listing,
//! opening or scanning to exercise the degraded paths.
//!
//! Clones share their volume definitions and ledger, so a caller can keep one
//! clone while the facade owns another.

use crate::backend::{RetrieveMode, VolumeHandle, VolumeInfo, VolumeScanner};
use crate::types::{NodeRecord, VolumeKey};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
struct MemoryVolume {
    info: VolumeInfo,
    records: Vec<NodeRecord>,
    open_failure: Option<String>,
    scan_failure: Option<String>,
}

#[derive(Debug, Default)]
struct HandleLedger {
    open: usize,
    opened: usize,
    released: usize,
}

#[derive(Debug, Default)]
struct ScannerState {
    volumes: Vec<MemoryVolume>,
    list_failure: Option<String>,
}

/// A scanner over volumes defined in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryScanner {
    state: Arc<Mutex<ScannerState>>,
    ledger: Arc<Mutex<HandleLedger>>,
}

impl MemoryScanner {
    /// Create a scanner with no volumes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a volume and the records a scan of it returns.
    pub fn with_volume(self, info: VolumeInfo, records: Vec<NodeRecord>) -> Self {
        self.state.lock().volumes.push(MemoryVolume {
            info,
            records,
            open_failure: None,
            scan_failure: None,
        });
        self
    }

    /// Make opening the volume with this key fail.
    pub fn with_open_failure(self, key: &str, reason: &str) -> Self {
        self.update(&VolumeKey::new(key), |v| v.open_failure = Some(reason.to_string()));
        self
    }

    /// Make enumerating the volume with this key fail after it opened.
    pub fn with_scan_failure(self, key: &str, reason: &str) -> Self {
        self.update(&VolumeKey::new(key), |v| v.scan_failure = Some(reason.to_string()));
        self
    }

    /// Make volume enumeration fail.
    pub fn with_list_failure(self, reason: &str) -> Self {
        self.state.lock().list_failure = Some(reason.to_string());
        self
    }

    /// Replace the records returned by future scans of a volume.
    pub fn replace_records(&self, key: &str, records: Vec<NodeRecord>) {
        self.update(&VolumeKey::new(key), |v| v.records = records);
    }

    /// Clear any injected open or scan failure on a volume.
    pub fn heal(&self, key: &str) {
        self.update(&VolumeKey::new(key), |v| {
            v.open_failure = None;
            v.scan_failure = None;
        });
    }

    fn update(&self, key: &VolumeKey, apply: impl FnOnce(&mut MemoryVolume)) {
        let mut state = self.state.lock();
        if let Some(volume) = state.volumes.iter_mut().find(|v| &v.info.key == key) {
            apply(volume);
        }
    }

    /// Handles currently open.
    pub fn open_handles(&self) -> usize {
        self.ledger.lock().open
    }

    /// Handles opened over the scanner's lifetime.
    pub fn total_opened(&self) -> usize {
        self.ledger.lock().opened
    }

    /// Handles released over the scanner's lifetime.
    pub fn total_released(&self) -> usize {
        self.ledger.lock().released
    }
}

impl VolumeScanner for MemoryScanner {
    fn list_volumes(&self) -> anyhow::Result<Vec<VolumeInfo>> {
        let state = self.state.lock();
        if let Some(reason) = &state.list_failure {
            anyhow::bail!("volume enumeration failed: {}", reason);
        }
        Ok(state.volumes.iter().map(|v| v.info.clone()).collect())
    }

    fn open(
        &self,
        volume: &VolumeInfo,
        mode: RetrieveMode,
    ) -> anyhow::Result<Box<dyn VolumeHandle>> {
        let found = self
            .state
            .lock()
            .volumes
            .iter()
            .find(|v| v.info.key == volume.key)
            .cloned();

        let Some(found) = found else {
            anyhow::bail!("volume {} not found", volume.mount_point);
        };
        if let Some(reason) = found.open_failure {
            anyhow::bail!("failed to open {}: {}", volume.mount_point, reason);
        }

        {
            let mut ledger = self.ledger.lock();
            ledger.open += 1;
            ledger.opened += 1;
        }

        Ok(Box::new(MemoryHandle {
            info: found.info,
            records: found.records,
            scan_failure: found.scan_failure,
            mode,
            ledger: Arc::clone(&self.ledger),
        }))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Handle returned by `MemoryScanner::open`.
struct MemoryHandle {
    info: VolumeInfo,
    records: Vec<NodeRecord>,
    scan_failure: Option<String>,
    mode: RetrieveMode,
    ledger: Arc<Mutex<HandleLedger>>,
}

impl VolumeHandle for MemoryHandle {
    fn volume(&self) -> &VolumeInfo {
        &self.info
    }

    fn nodes(&mut self, root: &str) -> anyhow::Result<Vec<NodeRecord>> {
        if let Some(reason) = &self.scan_failure {
            anyhow::bail!("failed to scan {}: {}", root, reason);
        }

        debug!(root = %root, records = self.records.len(), "Serving in-memory scan");

        let mut records = self.records.clone();
        if self.mode == RetrieveMode::Minimal {
            for record in &mut records {
                record.created = None;
            }
        }
        Ok(records)
    }
}

impl Drop for MemoryHandle {
    fn drop(&mut self) {
        let mut ledger = self.ledger.lock();
        ledger.open -= 1;
        ledger.released += 1;
    }
}
