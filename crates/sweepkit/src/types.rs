use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Bytes per megabyte, as used for `freedMegabytes`.
pub const MEGABYTE: u64 = 1024 * 1024;

/// A well-known directory that may hold reclaimable files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Stable key, used to filter cleanup (e.g. `user_temp`)
    pub id: String,
    /// Human label (e.g. "User Temp")
    pub description: String,
    /// Resolved location, `None` when the platform could not resolve it
    pub path: Option<PathBuf>,
}

impl Candidate {
    /// Create a candidate. An empty path is treated as unresolved.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        path: Option<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            path: path.filter(|p| !p.as_os_str().is_empty()),
        }
    }

    /// The path to walk, if this candidate should be scanned at all.
    ///
    /// Unresolved paths, missing paths and non-directories yield `None`.
    pub fn scan_root(&self) -> Option<&Path> {
        self.path.as_deref().filter(|p| p.is_dir())
    }
}

/// One matched file, as recorded during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleFile {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Size in bytes at scan time
    pub size: u64,
}

/// Scan result for a single candidate directory.
///
/// `file_count` and `total_size_bytes` cover every match found, while
/// `sample_files` is capped by the sample limit. Only sampled files are ever
/// deleted by a cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateReport {
    /// Candidate id
    pub id: String,
    /// Candidate label
    pub description: String,
    /// Candidate root that was walked
    pub path: PathBuf,
    /// Sum of sizes of all matched files
    pub total_size_bytes: u64,
    /// Number of matched files
    pub file_count: u64,
    /// First matches in walk order, bounded by the sample limit
    pub sample_files: Vec<SampleFile>,
}

impl CandidateReport {
    /// Bytes held by the sampled (deletable) files.
    pub fn sampled_bytes(&self) -> u64 {
        self.sample_files.iter().map(|f| f.size).sum()
    }

    /// True when more files matched than the sample could hold.
    pub fn is_truncated(&self) -> bool {
        self.file_count > self.sample_files.len() as u64
    }
}

/// Free-space information for a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskSpace {
    /// Total capacity in bytes
    pub total_bytes: u64,
    /// Bytes available to unprivileged users
    pub available_bytes: u64,
}

impl DiskSpace {
    /// Calculate used space
    pub fn used(&self) -> u64 {
        self.total_bytes.saturating_sub(self.available_bytes)
    }
}

/// Disk information attached to a scan report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskInfo {
    /// Volume the numbers were taken from
    pub mount_point: PathBuf,
    /// Capacity numbers
    #[serde(flatten)]
    pub space: DiskSpace,
}

/// The aggregated result of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// When the scan finished
    pub timestamp: DateTime<Utc>,
    /// Host the scan ran on
    pub hostname: String,
    /// Results for every candidate that existed, in candidate order
    #[serde(rename = "perCandidateResults")]
    pub results: Vec<CandidateReport>,
    /// Best-effort free space of the primary volume
    pub disk_info: Option<DiskInfo>,
}

impl ScanReport {
    /// Find a candidate result by id
    pub fn find(&self, id: &str) -> Option<&CandidateReport> {
        self.results.iter().find(|r| r.id == id)
    }

    /// Total matched bytes across all candidates
    pub fn total_size_bytes(&self) -> u64 {
        self.results.iter().map(|r| r.total_size_bytes).sum()
    }

    /// Total matched files across all candidates
    pub fn file_count(&self) -> u64 {
        self.results.iter().map(|r| r.file_count).sum()
    }

    /// Select candidate results by id; an empty filter selects everything.
    pub fn select<'a>(&'a self, ids: &'a [String]) -> impl Iterator<Item = &'a CandidateReport> {
        self.results
            .iter()
            .filter(move |r| ids.is_empty() || ids.iter().any(|id| *id == r.id))
    }
}

/// What a cleanup would delete, computed without touching the filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupPlan {
    /// Ids of the selected candidates
    pub candidates: Vec<String>,
    /// Files that would be deleted
    pub files: Vec<SampleFile>,
    /// Sum of recorded sizes of `files`
    pub total_bytes: u64,
}

/// Result of a cleanup run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    /// Sum of recorded sizes of the deleted files
    pub freed_bytes: u64,
    /// `freed_bytes` in whole megabytes, rounded
    pub freed_megabytes: u64,
    /// Files that were actually removed
    pub cleaned_paths: Vec<PathBuf>,
}

impl CleanupReport {
    /// Record a removed file
    pub fn add_removed(&mut self, file: &SampleFile) {
        self.freed_bytes += file.size;
        self.freed_megabytes = bytes_to_megabytes(self.freed_bytes);
        self.cleaned_paths.push(file.path.clone());
    }
}

/// Output of the external malware scanner passthrough.
///
/// The scanner's output is carried verbatim; nothing here interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MalwareScanReport {
    /// Whether a scanner executable was located
    pub found: bool,
    /// Location of the scanner that was run
    pub path: Option<PathBuf>,
    /// Exit code, `None` when killed or terminated by a signal
    pub exit_code: Option<i32>,
    /// Raw standard output
    pub stdout: String,
    /// Raw standard error
    pub stderr: String,
    /// True when the run hit the timeout and was killed
    pub timed_out: bool,
    /// Why the scanner could not be found or started
    pub error: Option<String>,
}

/// Convert bytes to whole megabytes, rounding half up.
pub fn bytes_to_megabytes(bytes: u64) -> u64 {
    (bytes as f64 / MEGABYTE as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, files: &[(&str, u64)], count: u64) -> CandidateReport {
        CandidateReport {
            id: id.to_string(),
            description: id.to_string(),
            path: PathBuf::from("/tmp").join(id),
            total_size_bytes: files.iter().map(|(_, s)| s).sum(),
            file_count: count,
            sample_files: files
                .iter()
                .map(|(p, s)| SampleFile {
                    path: PathBuf::from(p),
                    size: *s,
                })
                .collect(),
        }
    }

    #[test]
    fn test_bytes_to_megabytes() {
        assert_eq!(bytes_to_megabytes(0), 0);
        assert_eq!(bytes_to_megabytes(30), 0);
        assert_eq!(bytes_to_megabytes(MEGABYTE / 2), 1);
        assert_eq!(bytes_to_megabytes(MEGABYTE / 2 - 1), 0);
        assert_eq!(bytes_to_megabytes(MEGABYTE * 3), 3);
    }

    #[test]
    fn test_candidate_empty_path_is_unresolved() {
        let c = Candidate::new("recent", "Recent Files", Some(PathBuf::new()));
        assert!(c.path.is_none());
        assert!(c.scan_root().is_none());
    }

    #[test]
    fn test_candidate_scan_root_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir.tmp");
        std::fs::write(&file, b"x").unwrap();

        let c = Candidate::new("dir", "Dir", Some(dir.path().to_path_buf()));
        assert_eq!(c.scan_root(), Some(dir.path()));

        let c = Candidate::new("file", "File", Some(file));
        assert!(c.scan_root().is_none());

        let c = Candidate::new("gone", "Gone", Some(dir.path().join("missing")));
        assert!(c.scan_root().is_none());
    }

    #[test]
    fn test_select_filters_by_id() {
        let scan = ScanReport {
            timestamp: Utc::now(),
            hostname: "host".to_string(),
            results: vec![report("a", &[], 0), report("b", &[], 0)],
            disk_info: None,
        };

        let all: Vec<_> = scan.select(&[]).map(|r| r.id.as_str()).collect();
        assert_eq!(all, vec!["a", "b"]);

        let only = vec!["b".to_string(), "zzz".to_string()];
        let some: Vec<_> = scan.select(&only).map(|r| r.id.as_str()).collect();
        assert_eq!(some, vec!["b"]);
    }

    #[test]
    fn test_truncation_and_sampled_bytes() {
        let r = report("a", &[("/tmp/a/x.tmp", 5), ("/tmp/a/y.tmp", 7)], 10);
        assert!(r.is_truncated());
        assert_eq!(r.sampled_bytes(), 12);

        let r = report("a", &[("/tmp/a/x.tmp", 5)], 1);
        assert!(!r.is_truncated());
    }

    #[test]
    fn test_cleanup_report_accumulates() {
        let mut report = CleanupReport::default();
        report.add_removed(&SampleFile {
            path: PathBuf::from("/tmp/a.tmp"),
            size: MEGABYTE,
        });
        report.add_removed(&SampleFile {
            path: PathBuf::from("/tmp/b.tmp"),
            size: MEGABYTE,
        });
        assert_eq!(report.freed_bytes, 2 * MEGABYTE);
        assert_eq!(report.freed_megabytes, 2);
        assert_eq!(report.cleaned_paths.len(), 2);
    }

    #[test]
    fn test_json_field_names() {
        let scan = ScanReport {
            timestamp: Utc::now(),
            hostname: "host".to_string(),
            results: vec![report("user_temp", &[("/tmp/a.tmp", 10)], 1)],
            disk_info: Some(DiskInfo {
                mount_point: PathBuf::from("/"),
                space: DiskSpace {
                    total_bytes: 100,
                    available_bytes: 40,
                },
            }),
        };
        let value = serde_json::to_value(&scan).unwrap();
        let entry = &value["perCandidateResults"][0];
        assert_eq!(entry["totalSizeBytes"], 10);
        assert_eq!(entry["fileCount"], 1);
        assert_eq!(entry["sampleFiles"][0]["size"], 10);
        assert_eq!(value["diskInfo"]["availableBytes"], 40);
        assert_eq!(value["diskInfo"]["mountPoint"], "/");

        let cleanup = CleanupReport {
            freed_bytes: 30,
            freed_megabytes: 0,
            cleaned_paths: vec![PathBuf::from("/tmp/a.tmp")],
        };
        let value = serde_json::to_value(&cleanup).unwrap();
        assert_eq!(value["freedBytes"], 30);
        assert_eq!(value["freedMegabytes"], 0);
        assert_eq!(value["cleanedPaths"][0], "/tmp/a.tmp");
    }

    #[test]
    fn test_disk_space_used_underflow() {
        let ds = DiskSpace {
            total_bytes: 30,
            available_bytes: 100,
        };
        assert_eq!(ds.used(), 0);
    }
}
