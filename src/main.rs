mod cli;
mod commands;
mod config;
mod paths;
mod progress;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

use config::AppConfig;

/// Global context for the application
pub struct Context {
    pub quiet: bool,
    pub config: AppConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "neoclean", &mut io::stdout());
        return Ok(());
    }

    let ctx = Context {
        quiet: cli.quiet,
        config: AppConfig::load(cli.config.as_deref())?,
    };

    match &cli.command {
        Command::Scan(args) => commands::scan::run(&ctx, args),
        Command::Clean(args) => commands::clean::run(&ctx, args),
        Command::Virus(args) => commands::virus::run(&ctx, args),
        Command::Candidates(args) => commands::candidates::run(&ctx, args),
        Command::Check { names } => commands::check::run(&ctx, names),
        Command::Config(cmd) => commands::config::run(&ctx, cmd),
        Command::Engine => commands::engine::run(&ctx),
        Command::Completions { .. } => Ok(()),
    }
}
