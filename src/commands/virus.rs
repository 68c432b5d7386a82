use anyhow::Result;
use colored::Colorize;
use sweepkit::MalwareScanReport;

use crate::Context;
use crate::cli::JsonArgs;
use crate::progress;
use crate::ui;

pub fn run(ctx: &Context, args: &JsonArgs) -> Result<()> {
    let scanner = ctx.config.malware_scanner();

    let pb = progress::spinner("Running malware scanner...", !ctx.quiet && !args.json);
    let report = scanner.run();
    progress::finish_clear(&pb);

    if args.json {
        return ui::json(&report);
    }

    show_report(&report);
    Ok(())
}

fn show_report(report: &MalwareScanReport) {
    ui::header("Malware Scan");

    if !report.found {
        ui::warn(report.error.as_deref().unwrap_or("Malware scanner not found"));
        return;
    }

    if let Some(path) = &report.path {
        ui::kv("Scanner", &path.display().to_string());
    }

    if let Some(error) = &report.error {
        ui::error(error);
        return;
    }

    let exit = match report.exit_code {
        Some(0) => "0".green().to_string(),
        Some(code) => code.to_string().yellow().to_string(),
        None => "none".dimmed().to_string(),
    };
    ui::kv("Exit code", &exit);

    if report.timed_out {
        ui::warn("Scanner timed out and was stopped");
    }

    print_stream("Output", &report.stdout);
    print_stream("Errors", &report.stderr);
}

fn print_stream(title: &str, text: &str) {
    let text = text.trim_end();
    if text.is_empty() {
        return;
    }
    ui::section(title);
    for line in text.lines() {
        println!("  {line}");
    }
}
