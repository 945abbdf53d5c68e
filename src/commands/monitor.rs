//! Telemetry monitor command handler.
//!
//! Streams one snapshot per sampling tick to stdout until interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::Config;
use crate::core::telemetry::{Sampler, SamplerConfig, SamplerRuntime, SystemCounterSource};
use crate::ui::render_snapshot;

/// Execute the monitor command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = Config::load()?;

    let interval_ms = matches
        .get_one::<u64>("interval")
        .copied()
        .unwrap_or(config.sample_interval_ms)
        .max(100);
    let json_output = matches.get_flag("json");
    let max_samples = matches.get_one::<u64>("samples").copied();

    let sampler_config = SamplerConfig {
        interval: Duration::from_millis(interval_ms),
        history_capacity: config.history_capacity,
        utilization_exponent: config.utilization_exponent,
        ..Default::default()
    };

    let sampler = Sampler::new(SystemCounterSource::new(), &sampler_config);
    let runtime = SamplerRuntime::start(sampler, sampler_config.interval)
        .context("Failed to start telemetry runtime")?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("Failed to install Ctrl-C handler")?;
    }

    let mut snapshot_rx = runtime.subscribe();
    let mut printed = 0u64;

    while running.load(Ordering::SeqCst) {
        let Some(snapshot) =
            runtime.next_snapshot(&mut snapshot_rx, Duration::from_millis(250))
        else {
            continue;
        };

        if json_output {
            println!("{}", serde_json::to_string(&*snapshot)?);
        } else {
            println!("{}", render_snapshot(&snapshot));
        }

        printed += 1;
        if max_samples.is_some_and(|max| printed >= max) {
            break;
        }
    }

    runtime.shutdown();
    Ok(())
}
