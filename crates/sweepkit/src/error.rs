use std::path::PathBuf;
use thiserror::Error;

/// Errors that can cross the engine boundary.
///
/// Failures local to a single file or directory (unreadable entries, failed
/// deletes) are never represented here. They are logged and skipped where
/// they happen.
#[derive(Debug, Error)]
pub enum Error {
    /// Cleanup was requested before any scan completed
    #[error("no scan available: run a scan before cleanup")]
    NoScan,

    /// The candidate directory list could not be constructed at all
    #[error("cannot determine candidate directories: {0}")]
    NoCandidates(String),

    /// A configuration value could not be interpreted
    #[error("invalid value {value:?} for config key '{key}': {reason}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Raw value as written in the file
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// An external program could not be started
    #[error("failed to start {}: {source}", .program.display())]
    Spawn {
        /// Program that was being launched
        program: PathBuf,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if this is the "cleanup without scan" precondition failure.
    pub fn is_no_scan(&self) -> bool {
        matches!(self, Error::NoScan)
    }

    /// Stable machine-readable code, used in JSON payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NoScan => "no-scan",
            Error::NoCandidates(_) => "no-candidates",
            Error::InvalidConfig { .. } => "invalid-config",
            Error::Spawn { .. } => "spawn-failed",
            Error::Io(_) => "io",
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;
