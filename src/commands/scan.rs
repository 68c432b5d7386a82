use anyhow::Result;
use colored::Colorize;
use sweepkit::{CandidateReport, Engine, ScanReport};

use crate::Context;
use crate::cli::ScanArgs;
use crate::progress;
use crate::ui;

pub fn run(ctx: &Context, args: &ScanArgs) -> Result<()> {
    let engine = super::platform_engine(ctx);
    let report = scan_with_spinner(ctx, &engine, args.json)?;

    if args.json {
        return ui::json(report.as_ref());
    }

    show_report(&report, args.files);
    Ok(())
}

/// Run a scan behind a spinner that is hidden for quiet or JSON output.
pub fn scan_with_spinner(
    ctx: &Context,
    engine: &Engine,
    json: bool,
) -> Result<std::sync::Arc<ScanReport>> {
    let pb = progress::spinner("Scanning candidate directories...", !ctx.quiet && !json);
    match engine.scan() {
        Ok(report) => {
            progress::finish_success(
                &pb,
                &format!(
                    "Found {} in {}",
                    ui::plural(report.file_count(), "file"),
                    ui::format_size(report.total_size_bytes())
                ),
            );
            Ok(report)
        }
        Err(e) => {
            progress::finish_clear(&pb);
            Err(e.into())
        }
    }
}

/// Print a scan report as a per-candidate summary.
pub fn show_report(report: &ScanReport, files: bool) {
    ui::header("Reclaimable Files");
    ui::kv("Host", &report.hostname);
    ui::kv(
        "Scanned",
        &report
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    );
    if let Some(disk) = &report.disk_info {
        ui::kv(
            "Disk",
            &format!(
                "{} free of {} on {}",
                ui::format_size(disk.space.available_bytes),
                ui::format_size(disk.space.total_bytes),
                disk.mount_point.display()
            ),
        );
    }

    if report.results.is_empty() {
        println!();
        ui::dim("No candidate directories exist on this system");
        return;
    }

    for result in &report.results {
        show_candidate(result, files);
    }

    println!();
    println!(
        "{} {} in {}",
        "Total:".bold(),
        ui::format_size(report.total_size_bytes()).green().bold(),
        ui::plural(report.file_count(), "file")
    );
}

fn show_candidate(result: &CandidateReport, files: bool) {
    ui::section(&format!("{} ({})", result.description, result.id));
    ui::kv("Path", &result.path.display().to_string());
    ui::kv(
        "Reclaimable",
        &format!(
            "{} in {}",
            ui::format_size(result.total_size_bytes),
            ui::plural(result.file_count, "file")
        ),
    );

    if result.is_truncated() {
        ui::kv(
            "Sampled",
            &format!(
                "{} of {} files ({})",
                result.sample_files.len(),
                result.file_count,
                ui::format_size(result.sampled_bytes())
            ),
        );
    }

    if files {
        for file in &result.sample_files {
            ui::dim(&format!(
                "{:>10}  {}",
                ui::format_size(file.size),
                ui::truncate_path(&file.path.display().to_string(), 70)
            ));
        }
    }
}
