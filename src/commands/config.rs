use anyhow::Result;

use crate::Context;
use crate::cli::ConfigCommand;
use crate::config::KNOWN_KEYS;
use crate::ui;

pub fn run(ctx: &Context, cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show(args) if args.json => ui::json(&ctx.config.raw),
        ConfigCommand::Show(_) => {
            show(ctx);
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", ctx.config.path.display());
            Ok(())
        }
    }
}

fn show(ctx: &Context) {
    let config = &ctx.config;
    ui::header("Configuration");

    let state = if config.path.is_file() { "" } else { " (not found, using defaults)" };
    ui::kv("File", &format!("{}{state}", config.path.display()));

    ui::section("Effective");
    ui::kv("sample_limit", &config.scan.sample_limit.to_string());
    ui::kv("disk_info", &config.scan.disk_info.to_string());
    ui::kv(
        "malware_scanner_timeout_secs",
        &config.scanner_timeout.as_secs().to_string(),
    );
    let scanner = config.malware_scanner();
    if scanner.locations().is_empty() {
        ui::kv("malware_scanner", "none");
    } else {
        for location in scanner.locations() {
            ui::kv("malware_scanner", &location.display().to_string());
        }
    }

    let extra: Vec<_> = config
        .raw
        .iter()
        .filter(|(key, _)| !KNOWN_KEYS.contains(key))
        .collect();
    if !extra.is_empty() {
        ui::section("Other keys");
        for (key, value) in extra {
            ui::kv(key, value);
        }
    }
}
