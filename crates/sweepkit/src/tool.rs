//! External tool invocation with a hard time bound.
//!
//! [`ToolRunner`] starts a program with its stdin closed, captures stdout and
//! stderr verbatim on reader threads, and kills the child once the timeout
//! elapses. [`MalwareScanner`] builds on it to locate and run an external
//! malware scanner. Neither interprets what the tool prints.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::types::MalwareScanReport;

/// Default bound for a malware scan (10 minutes).
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Argument passed to the malware scanner.
pub const SCANNER_ARGS: &[&str] = &["--scan"];

/// Well-known scanner locations, checked in order.
#[cfg(windows)]
pub const DEFAULT_SCANNER_LOCATIONS: &[&str] = &[
    r"D:\NeoOptimize\msert x64\msert.exe",
    r"D:\NeoOptimize\msert x32\msert.exe",
    r"D:\NeoOptimize\msert.exe",
];

/// Well-known scanner locations, checked in order.
#[cfg(not(windows))]
pub const DEFAULT_SCANNER_LOCATIONS: &[&str] = &[];

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long to wait for output pipes to drain once the child is gone. A
/// grandchild that inherited the pipes could otherwise keep them open.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Captured result of one tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when killed or terminated by a signal
    pub exit_code: Option<i32>,
    /// Raw standard output (lossy UTF-8)
    pub stdout: String,
    /// Raw standard error (lossy UTF-8)
    pub stderr: String,
    /// True if the timeout fired and the child was killed
    pub timed_out: bool,
}

/// Runs external programs with a fixed timeout.
#[derive(Debug, Clone, Copy)]
pub struct ToolRunner {
    timeout: Duration,
}

impl Default for ToolRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_TIMEOUT)
    }
}

impl ToolRunner {
    /// Create a runner with the given timeout
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The configured timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `program` with `args`, waiting at most the configured timeout.
    ///
    /// # Errors
    ///
    /// - `Spawn`: the program could not be started
    /// - `Io`: waiting on the child failed
    pub fn run(&self, program: &Path, args: &[&str]) -> Result<ToolOutput> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        hide_console_window(&mut command);

        let mut child = command.spawn().map_err(|source| Error::Spawn {
            program: program.to_path_buf(),
            source,
        })?;
        log::debug!("Started {} (pid {})", program.display(), child.id());

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let (exit_code, timed_out) = self.wait(&mut child)?;
        if timed_out {
            log::warn!(
                "{} did not finish within {}s and was killed",
                program.display(),
                self.timeout.as_secs()
            );
        }

        Ok(ToolOutput {
            exit_code,
            stdout: collect(&stdout),
            stderr: collect(&stderr),
            timed_out,
        })
    }

    /// Poll the child until it exits or the timeout elapses.
    ///
    /// A timeout too large to represent as a deadline never expires. If
    /// polling itself fails the child is killed before the error is returned.
    fn wait(&self, child: &mut Child) -> Result<(Option<i32>, bool)> {
        let deadline = Instant::now().checked_add(self.timeout);
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok((status.code(), false)),
                Ok(None) => {}
                Err(e) => {
                    stop(child);
                    return Err(e.into());
                }
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                stop(child);
                return Ok((None, true));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Kill and reap a child, ignoring failures.
fn stop(child: &mut Child) {
    // The child may exit between try_wait and kill
    if let Err(e) = child.kill() {
        log::debug!("kill failed: {e}");
    }
    if let Err(e) = child.wait() {
        log::debug!("reaping child failed: {e}");
    }
}

/// Read a pipe to the end on a background thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(e) = pipe.read_to_end(&mut buf) {
                log::debug!("Output pipe closed early: {e}");
            }
            let _ = tx.send(buf);
        });
    }
    rx
}

fn collect(rx: &mpsc::Receiver<Vec<u8>>) -> String {
    rx.recv_timeout(DRAIN_GRACE)
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}

#[cfg(windows)]
fn hide_console_window(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console_window(_command: &mut Command) {}

/// Locates and runs an external malware scanner.
#[derive(Debug, Clone)]
pub struct MalwareScanner {
    locations: Vec<PathBuf>,
    runner: ToolRunner,
}

impl Default for MalwareScanner {
    fn default() -> Self {
        Self::new(
            DEFAULT_SCANNER_LOCATIONS.iter().map(PathBuf::from).collect(),
            ToolRunner::default(),
        )
    }
}

impl MalwareScanner {
    /// Create a scanner that checks `locations` in order
    pub fn new(locations: Vec<PathBuf>, runner: ToolRunner) -> Self {
        Self { locations, runner }
    }

    /// Default locations, with `extra` checked first.
    pub fn with_extra_locations(extra: Vec<PathBuf>, runner: ToolRunner) -> Self {
        let mut locations = extra;
        locations.extend(DEFAULT_SCANNER_LOCATIONS.iter().map(PathBuf::from));
        Self::new(locations, runner)
    }

    /// Locations checked, in order
    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    /// First location holding a file, if any.
    pub fn locate(&self) -> Option<&Path> {
        self.locations
            .iter()
            .map(PathBuf::as_path)
            .find(|p| p.is_file())
    }

    /// Run the scanner and capture its output.
    ///
    /// A missing scanner is reported as `found: false`, and a scanner that
    /// cannot be started as `found: true` with `error` set. This never
    /// returns an error.
    pub fn run(&self) -> MalwareScanReport {
        let Some(path) = self.locate() else {
            let searched: Vec<String> = self
                .locations
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            let error = if searched.is_empty() {
                "no malware scanner location configured".to_string()
            } else {
                format!("malware scanner not found in: {}", searched.join(", "))
            };
            return MalwareScanReport {
                found: false,
                error: Some(error),
                ..MalwareScanReport::default()
            };
        };

        log::info!("Running malware scanner {}", path.display());
        match self.runner.run(path, SCANNER_ARGS) {
            Ok(output) => MalwareScanReport {
                found: true,
                path: Some(path.to_path_buf()),
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
                timed_out: output.timed_out,
                error: None,
            },
            Err(e) => MalwareScanReport {
                found: true,
                path: Some(path.to_path_buf()),
                error: Some(e.to_string()),
                ..MalwareScanReport::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn test_captures_output_and_exit_code() {
        let runner = ToolRunner::new(Duration::from_secs(10));
        let output = runner
            .run(
                Path::new("/bin/sh"),
                &["-c", "printf 'out line\\n'; printf 'err line' >&2; exit 3"],
            )
            .unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout, "out line\n");
        assert_eq!(output.stderr, "err line");
        assert!(!output.timed_out);
    }

    #[cfg(unix)]
    #[test]
    fn test_unbounded_timeout_runs_to_exit() {
        let runner = ToolRunner::new(Duration::from_secs(u64::MAX));
        let output = runner.run(Path::new("/bin/sh"), &["-c", "exit 0"]).unwrap();
        assert_eq!(output.exit_code, Some(0));
        assert!(!output.timed_out);
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let runner = ToolRunner::new(Duration::from_millis(200));
        let started = Instant::now();
        let output = runner
            .run(Path::new("/bin/sh"), &["-c", "exec sleep 30"])
            .unwrap();

        assert!(output.timed_out);
        assert_eq!(output.exit_code, None);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_spawn_failure_is_error() {
        let runner = ToolRunner::new(Duration::from_secs(1));
        let err = runner
            .run(Path::new("/definitely/not/a/program"), &[])
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
        assert_eq!(err.code(), "spawn-failed");
    }

    #[test]
    fn test_scanner_not_found() {
        let dir = TempDir::new().unwrap();
        let scanner = MalwareScanner::new(
            vec![dir.path().join("msert.exe")],
            ToolRunner::default(),
        );

        assert!(scanner.locate().is_none());
        let report = scanner.run();
        assert!(!report.found);
        assert!(report.path.is_none());
        assert!(report.error.unwrap().contains("msert.exe"));
    }

    #[test]
    fn test_scanner_without_locations() {
        let scanner = MalwareScanner::new(Vec::new(), ToolRunner::default());
        let report = scanner.run();
        assert!(!report.found);
        assert_eq!(
            report.error.as_deref(),
            Some("no malware scanner location configured")
        );
    }

    #[test]
    fn test_locate_picks_first_existing() {
        let dir = TempDir::new().unwrap();
        let second = dir.path().join("second.exe");
        std::fs::write(&second, b"").unwrap();

        let scanner = MalwareScanner::new(
            vec![dir.path().join("first.exe"), second.clone(), dir.path().to_path_buf()],
            ToolRunner::default(),
        );
        assert_eq!(scanner.locate(), Some(second.as_path()));
    }

    #[test]
    fn test_extra_locations_come_first() {
        let scanner = MalwareScanner::with_extra_locations(
            vec![PathBuf::from("/opt/scanner")],
            ToolRunner::default(),
        );
        assert_eq!(scanner.locations()[0], PathBuf::from("/opt/scanner"));
        assert_eq!(scanner.locations().len(), DEFAULT_SCANNER_LOCATIONS.len() + 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_found_scanner_output_is_verbatim() {
        // /bin/sh rejects --scan; whatever it prints is passed through as is
        let scanner = MalwareScanner::new(
            vec![PathBuf::from("/bin/sh")],
            ToolRunner::new(Duration::from_secs(10)),
        );
        let report = scanner.run();
        assert!(report.found);
        assert_eq!(report.path, Some(PathBuf::from("/bin/sh")));
        assert!(report.exit_code.is_some());
        assert!(!report.timed_out);
        assert!(report.error.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_unstartable_scanner_reports_error() {
        let dir = TempDir::new().unwrap();
        // A regular file without execute permission
        let fake = dir.path().join("msert");
        std::fs::write(&fake, b"not a program").unwrap();

        let scanner = MalwareScanner::new(vec![fake.clone()], ToolRunner::default());
        let report = scanner.run();
        assert!(report.found);
        assert_eq!(report.path, Some(fake));
        assert!(report.error.is_some());
    }
}
