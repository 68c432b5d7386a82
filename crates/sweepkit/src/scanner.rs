//! Reclaimable-file discovery.
//!
//! The scanner walks every candidate root that exists, matches regular files
//! against the [`Policy`], and aggregates size and count per candidate. The
//! finished report replaces whatever the [`ScanStore`] held before.
//!
//! Errors are contained at the node where they happen:
//! - directory level: an unreadable or vanished directory is skipped along
//!   with its subtree, and the walk continues with its siblings
//! - file level: a file whose metadata cannot be read is skipped
//!
//! Neither kind ever aborts the scan.

use chrono::Utc;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::candidates::CandidateSource;
use crate::disk;
use crate::error::Result;
use crate::policy::Policy;
use crate::store::ScanStore;
use crate::types::{Candidate, CandidateReport, SampleFile, ScanReport};

/// Default cap on individually tracked files per candidate.
pub const DEFAULT_SAMPLE_LIMIT: usize = 100;

/// Tunables for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Maximum number of files recorded in `sample_files` per candidate
    pub sample_limit: usize,
    /// Attach free-space information for the primary volume
    pub disk_info: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            disk_info: true,
        }
    }
}

/// Walks candidate directories and produces scan reports.
pub struct Scanner<'a> {
    source: &'a dyn CandidateSource,
    policy: &'a Policy,
    options: ScanOptions,
}

impl<'a> Scanner<'a> {
    /// Create a scanner with default options
    pub fn new(source: &'a dyn CandidateSource, policy: &'a Policy) -> Self {
        Self {
            source,
            policy,
            options: ScanOptions::default(),
        }
    }

    /// Override the scan options
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Run a full scan and store the report as the latest one.
    ///
    /// Only a failure to build the candidate list is returned as an error.
    /// Candidates that are unset, missing or not directories are left out
    /// of the report.
    pub fn scan(&self, store: &ScanStore) -> Result<Arc<ScanReport>> {
        let candidates = self.source.candidates()?;
        log::debug!("Scanning {} candidate directories", candidates.len());

        let results: Vec<CandidateReport> = candidates
            .par_iter()
            .filter_map(|candidate| self.scan_candidate(candidate))
            .collect();

        let disk_info = if self.options.disk_info {
            disk::primary_disk_info()
        } else {
            None
        };

        let report = ScanReport {
            timestamp: Utc::now(),
            hostname: disk::hostname(),
            results,
            disk_info,
        };

        log::info!(
            "Scan finished: {} files, {} bytes across {} candidates",
            report.file_count(),
            report.total_size_bytes(),
            report.results.len()
        );

        Ok(store.replace(report))
    }

    /// Scan a single candidate, `None` if it should not appear in a report.
    pub fn scan_candidate(&self, candidate: &Candidate) -> Option<CandidateReport> {
        let Some(root) = candidate.scan_root() else {
            log::debug!(
                "Skipping candidate {}: {}",
                candidate.id,
                candidate
                    .path
                    .as_ref()
                    .map_or_else(|| "path unresolved".to_string(), |p| {
                        format!("{} is not a directory", p.display())
                    })
            );
            return None;
        };

        let tally = collect_matches(root, self.policy, self.options.sample_limit);
        log::debug!(
            "Candidate {}: {} matching files, {} bytes",
            candidate.id,
            tally.count,
            tally.total
        );

        Some(CandidateReport {
            id: candidate.id.clone(),
            description: candidate.description.clone(),
            path: root.to_path_buf(),
            total_size_bytes: tally.total,
            file_count: tally.count,
            sample_files: tally.samples,
        })
    }
}

/// Running aggregate for one candidate root.
#[derive(Debug)]
struct Tally {
    total: u64,
    count: u64,
    samples: Vec<SampleFile>,
    limit: usize,
}

impl Tally {
    fn new(limit: usize) -> Self {
        Self {
            total: 0,
            count: 0,
            samples: Vec::new(),
            limit,
        }
    }

    /// Totals always move; the sample only grows while below the limit.
    fn record(&mut self, path: PathBuf, size: u64) {
        self.total += size;
        self.count += 1;
        if self.samples.len() < self.limit {
            self.samples.push(SampleFile { path, size });
        }
    }
}

/// Walk `root` and tally every regular file the policy matches.
///
/// Entries are visited in file-name order so the sample is stable between
/// runs over an unchanged tree. Symlinks are neither followed nor counted.
fn collect_matches(root: &Path, policy: &Policy, sample_limit: usize) -> Tally {
    let mut tally = Tally::new(sample_limit);

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::debug!(
                    "Skipping unreadable entry {}: {err}",
                    err.path().unwrap_or(root).display()
                );
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if !policy.matches(&entry.file_name().to_string_lossy()) {
            continue;
        }

        match entry.metadata() {
            Ok(meta) => tally.record(entry.into_path(), meta.len()),
            Err(err) => log::debug!("Skipping {}: {err}", entry.path().display()),
        }
    }

    tally
}
