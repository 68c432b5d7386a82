use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "neoclean")]
#[command(author = "NeoOptimize Contributors")]
#[command(version)]
#[command(about = "Find and remove reclaimable temp, cache and log files", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (key=value lines)
    #[arg(long, global = true, env = "NEOCLEAN_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan candidate directories for reclaimable files
    Scan(ScanArgs),

    /// Scan, then delete the reclaimable files found
    Clean(CleanArgs),

    /// Run the external malware scanner, if one is installed
    Virus(JsonArgs),

    /// List candidate directories for this platform
    Candidates(JsonArgs),

    /// Show which reclaimable-file pattern matches each name
    Check {
        /// File names to test
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Serve JSON requests on stdin, one per line
    Engine,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct JsonArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct ScanArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// List sampled files under each candidate
    #[arg(short, long)]
    pub files: bool,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Only clean these candidates (repeatable)
    #[arg(short, long = "only", value_name = "ID")]
    pub only: Vec<String>,

    /// Dry run - show what would be deleted
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the loaded configuration
    Show(JsonArgs),

    /// Print the configuration file path
    Path,
}
