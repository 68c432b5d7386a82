//! Spinners for long-running steps.
//!
//! Spinners draw on stderr and are hidden when output is quiet, JSON, or
//! not attached to a terminal.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a spinner with a message; hidden when `visible` is false.
pub fn spinner(msg: &str, visible: bool) -> ProgressBar {
    if !visible || !console::user_attended_stderr() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Replace the spinner with a success line
pub fn finish_success(pb: &ProgressBar, msg: &str) {
    pb.finish_with_message(format!("{} {}", "✓".green(), msg));
}

/// Remove the spinner without leaving a line
pub fn finish_clear(pb: &ProgressBar) {
    pb.finish_and_clear();
}
