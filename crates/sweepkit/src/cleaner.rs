//! Best-effort deletion of previously discovered files.
//!
//! The cleaner never scans. It works from the report held by the
//! [`ScanStore`] and deletes only the sampled files recorded there. Candidates
//! with more matches than the sample limit keep their unsampled files.

use rayon::prelude::*;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::store::ScanStore;
use crate::types::{CandidateReport, CleanupPlan, CleanupReport, SampleFile};

/// Deletes the files recorded by the latest scan.
pub struct Cleaner<'a> {
    store: &'a ScanStore,
}

impl<'a> Cleaner<'a> {
    /// Create a cleaner reading from `store`
    pub fn new(store: &'a ScanStore) -> Self {
        Self { store }
    }

    /// What [`cleanup`](Self::cleanup) would delete for the same ids.
    ///
    /// # Errors
    ///
    /// - `NoScan`: no scan report is stored
    pub fn plan(&self, ids: &[String]) -> Result<CleanupPlan> {
        let scan = self.store.latest().ok_or(Error::NoScan)?;

        let mut plan = CleanupPlan::default();
        for item in scan.select(ids) {
            plan.candidates.push(item.id.clone());
            plan.total_bytes += item.sampled_bytes();
            plan.files.extend(item.sample_files.iter().cloned());
        }
        Ok(plan)
    }

    /// Delete the sampled files of the selected candidates.
    ///
    /// An empty `ids` selects every candidate of the latest scan; unknown ids
    /// select nothing. A file that is missing, locked or protected is skipped
    /// and does not count toward the result. After a candidate's files are
    /// processed its root directory is removed if it is now empty.
    ///
    /// The stored report is left as is, so a repeated cleanup finds its files
    /// already gone and frees nothing.
    ///
    /// # Errors
    ///
    /// - `NoScan`: no scan report is stored; nothing is touched
    pub fn cleanup(&self, ids: &[String]) -> Result<CleanupReport> {
        let scan = self.store.latest().ok_or(Error::NoScan)?;

        let mut report = CleanupReport::default();
        for item in scan.select(ids) {
            for file in remove_files(item) {
                report.add_removed(file);
            }
            remove_dir_if_empty(&item.path);
        }

        log::info!(
            "Cleanup removed {} files, freed {} bytes",
            report.cleaned_paths.len(),
            report.freed_bytes
        );
        Ok(report)
    }
}

/// Delete a candidate's sampled files concurrently, returning the ones that
/// were removed in sample order.
fn remove_files(item: &CandidateReport) -> Vec<&SampleFile> {
    item.sample_files
        .par_iter()
        .filter(|file| match fs::remove_file(&file.path) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Could not remove {}: {e}", file.path.display());
                false
            }
        })
        .collect()
}

/// Remove `dir` only if it has no entries left. Failures are ignored.
fn remove_dir_if_empty(dir: &Path) {
    let is_empty = fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);

    if is_empty {
        match fs::remove_dir(dir) {
            Ok(()) => log::debug!("Removed empty directory {}", dir.display()),
            Err(e) => log::debug!("Could not remove {}: {e}", dir.display()),
        }
    }
}
