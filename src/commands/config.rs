//! Config command handler.

use anyhow::{anyhow, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::config::Config;
use crate::core::privileged::TierPreference;

/// Execute the config command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("get", _)) => get(),
        Some(("set", sub)) => set(sub),
        _ => unreachable!("subcommand required"),
    }
}

fn get() -> Result<()> {
    let config = Config::load()?;
    println!("tier preference:      {}", config.tier_preference);
    println!("sample interval:      {} ms", config.sample_interval_ms);
    println!("history capacity:     {}", config.history_capacity);
    println!("utilization exponent: {}", config.utilization_exponent);
    Ok(())
}

fn set(matches: &ArgMatches) -> Result<()> {
    let mut config = Config::load()?;

    match matches.subcommand() {
        Some(("tier", sub)) => {
            let value = sub
                .get_one::<String>("value")
                .ok_or_else(|| anyhow!("missing tier value"))?;
            let preference: TierPreference = value.parse()?;
            config.set_tier_preference(preference);
            config.save()?;
            println!("{} tier preference set to {preference}", "✓".green());
        }
        Some(("interval", sub)) => {
            let value = sub
                .get_one::<u64>("value")
                .copied()
                .ok_or_else(|| anyhow!("missing interval value"))?;
            if value < 100 {
                return Err(anyhow!("interval must be at least 100 ms"));
            }
            config.sample_interval_ms = value;
            config.save()?;
            println!("{} sample interval set to {value} ms", "✓".green());
        }
        _ => unreachable!("subcommand required"),
    }

    Ok(())
}
