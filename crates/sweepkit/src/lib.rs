//! # sweepkit
//!
//! Discovery and best-effort cleanup of reclaimable files in well-known
//! temp, cache and log directories.
//!
//! The engine has two operations that share a single "last scan" slot:
//!
//! - **scan** walks every candidate directory, matches files against the
//!   reclaimable-file [`Policy`], and stores a [`ScanReport`] with per-candidate
//!   totals and a bounded sample of matched files.
//! - **cleanup** deletes the sampled files of the stored report, optionally
//!   restricted to some candidate ids, and reports what was freed. It never
//!   scans on its own: without a stored report it fails with
//!   [`Error::NoScan`].
//!
//! ## Failure model
//!
//! Per-file and per-directory I/O failures (permission denied, files that
//! vanish mid-walk, locked files) are logged and skipped. Only the missing
//! scan precondition and a candidate list that cannot be built at all
//! surface as errors.
//!
//! ## Sampling
//!
//! `fileCount` and `totalSizeBytes` count every match, but only the first
//! `sample_limit` files per candidate are recorded, and only recorded files
//! are ever deleted. A candidate with more matches than the limit keeps the
//! rest until a later scan samples them.
//!
//! ## Example
//!
//! ```no_run
//! use sweepkit::Engine;
//!
//! let engine = Engine::new();
//!
//! let report = engine.scan()?;
//! for candidate in &report.results {
//!     println!("{}: {} files, {} bytes", candidate.id, candidate.file_count, candidate.total_size_bytes);
//! }
//!
//! // Clean only the user temp directory
//! let freed = engine.cleanup(&["user_temp".to_string()])?;
//! println!("freed {} MB", freed.freed_megabytes);
//! # Ok::<(), sweepkit::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Candidate directory sources.
pub mod candidates;
/// Deletion of previously scanned files.
pub mod cleaner;
/// `key=value` configuration files.
pub mod config;
/// Host name and disk space helpers.
pub mod disk;
/// Error types for engine operations.
pub mod error;
/// The reclaimable-file pattern table.
pub mod policy;
/// Candidate directory walking.
pub mod scanner;
/// The single-slot "last scan" holder.
pub mod store;
/// External tool invocation.
pub mod tool;
/// Data types shared by scanner, cleaner and callers.
pub mod types;

pub use candidates::{CandidateSource, FixedCandidates, PlatformCandidates};
pub use cleaner::Cleaner;
pub use config::Config;
pub use error::{Error, Result};
pub use policy::Policy;
pub use scanner::{DEFAULT_SAMPLE_LIMIT, ScanOptions, Scanner};
pub use store::ScanStore;
pub use tool::{MalwareScanner, ToolOutput, ToolRunner};
pub use types::{
    Candidate, CandidateReport, CleanupPlan, CleanupReport, DiskInfo, DiskSpace,
    MalwareScanReport, SampleFile, ScanReport,
};

use std::sync::Arc;

/// Scan and cleanup behind a single object.
///
/// The engine owns its candidate source, policy and scan store, so a host
/// process keeps one engine alive for as long as scan results should be
/// available to cleanup.
pub struct Engine {
    source: Box<dyn CandidateSource>,
    policy: Policy,
    options: ScanOptions,
    store: ScanStore,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine over the platform's well-known locations and default policy.
    pub fn new() -> Self {
        Self::with_source(Box::new(PlatformCandidates))
    }

    /// Engine over a custom candidate source (useful for testing).
    pub fn with_source(source: Box<dyn CandidateSource>) -> Self {
        Self {
            source,
            policy: Policy::default(),
            options: ScanOptions::default(),
            store: ScanStore::new(),
        }
    }

    /// Replace the policy
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the scan options
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// The candidate list a scan would use right now.
    pub fn candidates(&self) -> Result<Vec<Candidate>> {
        self.source.candidates()
    }

    /// The policy in use
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Scan all candidates and keep the report for cleanup.
    pub fn scan(&self) -> Result<Arc<ScanReport>> {
        Scanner::new(self.source.as_ref(), &self.policy)
            .with_options(self.options)
            .scan(&self.store)
    }

    /// Delete the files recorded by the last scan.
    ///
    /// See [`Cleaner::cleanup`].
    pub fn cleanup(&self, ids: &[String]) -> Result<CleanupReport> {
        Cleaner::new(&self.store).cleanup(ids)
    }

    /// What a cleanup would delete.
    ///
    /// See [`Cleaner::plan`].
    pub fn plan(&self, ids: &[String]) -> Result<CleanupPlan> {
        Cleaner::new(&self.store).plan(ids)
    }

    /// The last scan report, if any
    pub fn last_scan(&self) -> Option<Arc<ScanReport>> {
        self.store.latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn engine_for(root: &Path) -> Engine {
        Engine::with_source(Box::new(FixedCandidates(vec![Candidate::new(
            "user_temp",
            "User Temp",
            Some(root.to_path_buf()),
        )])))
        .with_options(ScanOptions {
            disk_info: false,
            ..ScanOptions::default()
        })
    }

    #[test]
    fn test_cleanup_before_scan() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.tmp"), b"0123456789").unwrap();

        let engine = engine_for(dir.path());
        assert!(engine.last_scan().is_none());
        assert!(engine.cleanup(&[]).unwrap_err().is_no_scan());
        assert!(dir.path().join("a.tmp").exists());
    }

    #[test]
    fn test_scan_then_cleanup() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.tmp"), vec![0u8; 10]).unwrap();
        fs::write(dir.path().join("b.log"), vec![0u8; 20]).unwrap();
        fs::write(dir.path().join("c.txt"), vec![0u8; 5]).unwrap();

        let engine = engine_for(dir.path());
        let report = engine.scan().unwrap();
        assert_eq!(report.file_count(), 2);
        assert_eq!(report.total_size_bytes(), 30);
        assert!(Arc::ptr_eq(&report, &engine.last_scan().unwrap()));

        let plan = engine.plan(&[]).unwrap();
        assert_eq!(plan.total_bytes, 30);

        let cleaned = engine.cleanup(&[]).unwrap();
        assert_eq!(cleaned.freed_bytes, 30);
        assert_eq!(cleaned.freed_megabytes, 0);
        assert_eq!(
            cleaned.cleaned_paths,
            vec![dir.path().join("a.tmp"), dir.path().join("b.log")]
        );
        assert!(dir.path().join("c.txt").exists());

        let again = engine.cleanup(&[]).unwrap();
        assert_eq!(again.freed_bytes, 0);
        assert!(again.cleaned_paths.is_empty());
    }

    #[test]
    fn test_custom_policy() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.tmp"), b"x").unwrap();
        fs::write(dir.path().join("b.swp"), b"xy").unwrap();

        let engine = engine_for(dir.path()).with_policy(Policy::new([".swp"]));
        let report = engine.scan().unwrap();
        assert_eq!(report.file_count(), 1);
        assert_eq!(report.total_size_bytes(), 2);
    }

    #[test]
    fn test_candidates_passthrough() {
        let engine = engine_for(Path::new("/nowhere"));
        let candidates = engine.candidates().unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "user_temp");
    }
}
