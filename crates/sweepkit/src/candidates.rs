//! Candidate directory lists.
//!
//! The scanner asks a [`CandidateSource`] for the directories to walk. The
//! platform source resolves well-known temp/cache/log locations from the
//! environment at call time, so the list reflects the environment of each
//! scan. Tests and embedding hosts inject a [`FixedCandidates`] list instead.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::types::Candidate;

/// Supplies the candidate directories for a scan.
pub trait CandidateSource: Send + Sync {
    /// Build the candidate list.
    ///
    /// An error here is the only thing that aborts a scan as a whole.
    fn candidates(&self) -> Result<Vec<Candidate>>;
}

/// A caller-supplied, unchanging candidate list.
#[derive(Debug, Clone, Default)]
pub struct FixedCandidates(pub Vec<Candidate>);

impl CandidateSource for FixedCandidates {
    fn candidates(&self) -> Result<Vec<Candidate>> {
        Ok(self.0.clone())
    }
}

/// Well-known reclaimable locations of the running platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformCandidates;

impl CandidateSource for PlatformCandidates {
    fn candidates(&self) -> Result<Vec<Candidate>> {
        let candidates = dedupe(platform_candidates());
        if candidates.iter().all(|c| c.path.is_none()) {
            return Err(Error::NoCandidates(
                "no candidate location could be resolved on this platform".to_string(),
            ));
        }
        Ok(candidates)
    }
}

#[cfg(windows)]
fn platform_candidates() -> Vec<Candidate> {
    let env_path = |key: &str| std::env::var_os(key).map(PathBuf::from);
    let system_root = env_path("SystemRoot").unwrap_or_else(|| PathBuf::from(r"C:\Windows"));

    vec![
        Candidate::new("user_temp", "User Temp", Some(std::env::temp_dir())),
        Candidate::new("windows_temp", "Windows Temp", Some(system_root.join("Temp"))),
        Candidate::new("prefetch", "Prefetch", Some(system_root.join("Prefetch"))),
        Candidate::new(
            "recent",
            "Recent Files",
            env_path("USERPROFILE").map(|p| p.join("Recent")),
        ),
        Candidate::new(
            "thumb_cache",
            "Thumbnail Cache",
            env_path("LOCALAPPDATA").map(|p| p.join("Microsoft").join("Windows").join("Explorer")),
        ),
    ]
}

#[cfg(target_os = "macos")]
fn platform_candidates() -> Vec<Candidate> {
    let home = dirs::home_dir();

    vec![
        Candidate::new("user_temp", "User Temp", Some(std::env::temp_dir())),
        Candidate::new("system_temp", "System Temp", Some(PathBuf::from("/private/var/tmp"))),
        Candidate::new(
            "user_logs",
            "User Logs",
            home.as_ref().map(|h| h.join("Library").join("Logs")),
        ),
        Candidate::new(
            "thumb_cache",
            "Thumbnail Cache",
            home.as_ref().map(|h| {
                h.join("Library")
                    .join("Caches")
                    .join("com.apple.QuickLook.thumbnailcache")
            }),
        ),
    ]
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new("user_temp", "User Temp", Some(std::env::temp_dir())),
        Candidate::new("system_temp", "System Temp", Some(PathBuf::from("/var/tmp"))),
        Candidate::new(
            "thumb_cache",
            "Thumbnail Cache",
            dirs::cache_dir().map(|c| c.join("thumbnails")),
        ),
    ]
}

#[cfg(not(any(unix, windows)))]
fn platform_candidates() -> Vec<Candidate> {
    vec![Candidate::new(
        "user_temp",
        "User Temp",
        Some(std::env::temp_dir()),
    )]
}

/// Drop later candidates that resolve to a path already listed, so a
/// directory is never counted twice (e.g. `TMPDIR=/var/tmp`).
fn dedupe(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: Vec<PathBuf> = Vec::new();
    candidates
        .into_iter()
        .filter(|c| match &c.path {
            Some(path) if seen.contains(path) => {
                log::debug!("Dropping candidate {}: duplicate of {}", c.id, path.display());
                false
            }
            Some(path) => {
                seen.push(path.clone());
                true
            }
            None => true,
        })
        .collect()
}
