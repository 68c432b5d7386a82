//! Subcommand implementations
//!
//! Each command takes the global [`Context`](crate::Context) and prints
//! either a human-readable view or JSON.

pub mod candidates;
pub mod check;
pub mod clean;
pub mod config;
pub mod engine;
pub mod scan;
pub mod virus;

use sweepkit::Engine;

use crate::Context;

/// Engine over the platform candidates, tuned by the loaded configuration.
pub fn platform_engine(ctx: &Context) -> Engine {
    Engine::new().with_options(ctx.config.scan)
}
