//! Tier probe command handler.

use anyhow::Result;
use colored::Colorize;

use crate::core::config::Config;
use crate::core::privileged::{AccessTier, PrivilegedChannel};

/// Probe and print the currently resolvable access tier
pub fn execute() -> Result<()> {
    let config = Config::load()?;
    let channel = PrivilegedChannel::new(config.tier_preference);
    let tier = channel.resolve();

    let rendered = match tier {
        AccessTier::Elevated => "elevated".green().bold(),
        AccessTier::Superuser => "superuser".green().bold(),
        AccessTier::None => "none".red(),
    };
    println!(
        "preference: {}  resolved tier: {rendered}",
        config.tier_preference
    );

    Ok(())
}
