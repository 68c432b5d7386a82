use anyhow::Result;
use colored::Colorize;
use sweepkit::Policy;

use crate::Context;

pub fn run(ctx: &Context, names: &[String]) -> Result<()> {
    let policy = super::platform_engine(ctx).policy().clone();
    for (name, pattern) in classify(&policy, names) {
        match pattern {
            Some(pattern) => println!(
                "{} {name} {}",
                "✓".green(),
                format!("({pattern})").dimmed()
            ),
            None => println!("{} {name}", "·".dimmed()),
        }
    }
    Ok(())
}

/// Pair each name with the pattern that matches it, if any.
fn classify<'a>(policy: &'a Policy, names: &'a [String]) -> Vec<(&'a str, Option<&'a str>)> {
    names
        .iter()
        .map(|name| (name.as_str(), policy.matching_pattern(name)))
        .collect()
}
