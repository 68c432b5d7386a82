use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use sweepkit::Candidate;

use crate::Context;
use crate::cli::JsonArgs;
use crate::ui;

/// A candidate and whether a scan would walk it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CandidateStatus {
    id: String,
    description: String,
    path: Option<PathBuf>,
    exists: bool,
}

impl From<Candidate> for CandidateStatus {
    fn from(candidate: Candidate) -> Self {
        let exists = candidate.scan_root().is_some();
        Self {
            id: candidate.id,
            description: candidate.description,
            path: candidate.path,
            exists,
        }
    }
}

pub fn run(ctx: &Context, args: &JsonArgs) -> Result<()> {
    let candidates: Vec<CandidateStatus> = super::platform_engine(ctx)
        .candidates()?
        .into_iter()
        .map(CandidateStatus::from)
        .collect();

    if args.json {
        return ui::json(&candidates);
    }

    ui::header("Candidate Directories");
    for candidate in &candidates {
        let (mark, path) = match (&candidate.path, candidate.exists) {
            (Some(path), true) => ("✓".green(), path.display().to_string()),
            (Some(path), false) => ("·".dimmed(), path.display().to_string().dimmed().to_string()),
            (None, _) => ("·".dimmed(), "unresolved".dimmed().to_string()),
        };
        println!(
            "  {} {:<14} {:<22} {}",
            mark,
            candidate.id.cyan(),
            candidate.description,
            path
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_exists() {
        let dir = tempfile::tempdir().unwrap();
        let status = CandidateStatus::from(Candidate::new(
            "user_temp",
            "User Temp",
            Some(dir.path().to_path_buf()),
        ));
        assert!(status.exists);

        let missing = CandidateStatus::from(Candidate::new(
            "prefetch",
            "Prefetch",
            Some(dir.path().join("absent")),
        ));
        assert!(!missing.exists);

        let unset = CandidateStatus::from(Candidate::new("recent", "Recent", None));
        assert!(!unset.exists);
        assert!(unset.path.is_none());
    }
}
