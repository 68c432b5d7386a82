use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use sweepkit::{CleanupPlan, CleanupReport, ScanReport};

use crate::Context;
use crate::cli::CleanArgs;
use crate::progress;
use crate::ui;

pub fn run(ctx: &Context, args: &CleanArgs) -> Result<()> {
    let engine = super::platform_engine(ctx);
    let report = super::scan::scan_with_spinner(ctx, &engine, args.json)?;

    for id in unknown_ids(&report, &args.only) {
        log::warn!("No scanned candidate with id '{id}'");
    }

    let plan = engine.plan(&args.only)?;

    if args.dry_run {
        if args.json {
            return ui::json(&plan);
        }
        show_plan(&report, &plan);
        println!();
        ui::info("Dry run, nothing was deleted");
        return Ok(());
    }

    if plan.files.is_empty() {
        if args.json {
            return ui::json(&CleanupReport::default());
        }
        ui::success("Nothing to clean");
        return Ok(());
    }

    if !args.json {
        show_plan(&report, &plan);
        println!();
    }

    if !args.yes && !confirm(&plan)? {
        ui::info("Cancelled");
        return Ok(());
    }

    let pb = progress::spinner("Deleting files...", !ctx.quiet && !args.json);
    let cleaned = engine.cleanup(&args.only)?;
    progress::finish_clear(&pb);

    if args.json {
        return ui::json(&cleaned);
    }

    show_result(&plan, &cleaned);
    Ok(())
}

/// Requested ids that do not name any scanned candidate.
fn unknown_ids<'a>(report: &ScanReport, ids: &'a [String]) -> Vec<&'a str> {
    ids.iter()
        .filter(|id| report.find(id).is_none())
        .map(String::as_str)
        .collect()
}

fn confirm(plan: &CleanupPlan) -> Result<bool> {
    if !console::user_attended() {
        bail!("Refusing to delete files without a terminal; pass --yes to confirm");
    }

    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Delete {} ({})?",
            ui::plural(plan.files.len() as u64, "file"),
            ui::format_size(plan.total_bytes)
        ))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

fn show_plan(report: &ScanReport, plan: &CleanupPlan) {
    ui::header("Cleanup Plan");

    if plan.candidates.is_empty() {
        ui::dim("No candidates selected");
        return;
    }

    for result in plan.candidates.iter().filter_map(|id| report.find(id)) {
        let eligible = result.sample_files.len() as u64;
        let files = if result.is_truncated() {
            format!("{eligible} of {} files eligible", result.file_count)
        } else {
            ui::plural(eligible, "file")
        };
        println!(
            "  {:<14} {:>10}  {}",
            result.id.cyan(),
            ui::format_size(result.sampled_bytes()),
            files.dimmed()
        );
    }

    println!();
    ui::kv(
        "Total",
        &format!(
            "{} in {}",
            ui::format_size(plan.total_bytes),
            ui::plural(plan.files.len() as u64, "file")
        ),
    );
}

fn show_result(plan: &CleanupPlan, cleaned: &CleanupReport) {
    let removed = cleaned.cleaned_paths.len();
    ui::success(&format!(
        "Freed {} ({} MB), removed {}",
        ui::format_size(cleaned.freed_bytes),
        cleaned.freed_megabytes,
        ui::plural(removed as u64, "file")
    ));

    let skipped = plan.files.len().saturating_sub(removed);
    if skipped > 0 {
        ui::warn(&format!(
            "{} could not be removed (in use, missing or protected)",
            ui::plural(skipped as u64, "file")
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::PathBuf;
    use sweepkit::CandidateReport;

    fn report() -> ScanReport {
        ScanReport {
            timestamp: Utc::now(),
            hostname: "host".to_string(),
            results: vec![CandidateReport {
                id: "user_temp".to_string(),
                description: "User Temp".to_string(),
                path: PathBuf::from("/tmp"),
                total_size_bytes: 0,
                file_count: 0,
                sample_files: Vec::new(),
            }],
            disk_info: None,
        }
    }

    #[test]
    fn test_unknown_ids() {
        let ids = vec!["user_temp".to_string(), "nope".to_string()];
        assert_eq!(unknown_ids(&report(), &ids), vec!["nope"]);
        assert!(unknown_ids(&report(), &[]).is_empty());
    }
}
