use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::types::ScanReport;

/// Single-slot holder for the most recent scan report.
///
/// The scanner writes it and the cleaner reads it. Each scan replaces the
/// previous report; nothing is persisted. Overlapping scans are last writer
/// wins, so hosts that run scans concurrently must order scan and cleanup
/// themselves.
#[derive(Debug, Default)]
pub struct ScanStore {
    slot: Mutex<Option<Arc<ScanReport>>>,
}

impl ScanStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new report, replacing any previous one.
    pub fn replace(&self, report: ScanReport) -> Arc<ScanReport> {
        let report = Arc::new(report);
        *self.lock() = Some(Arc::clone(&report));
        report
    }

    /// The most recent report, if any scan has completed.
    pub fn latest(&self) -> Option<Arc<ScanReport>> {
        self.lock().clone()
    }

    /// Forget the stored report
    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// True if no scan has been stored
    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    // A panic while holding the lock cannot leave the slot half-written.
    fn lock(&self) -> MutexGuard<'_, Option<Arc<ScanReport>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
