//! Frame-rate command handler.

use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;

use crate::core::config::Config;
use crate::core::privileged::{AccessTier, FrameRateAnalyzer, PrivilegedChannel};

/// Execute the fps command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = Config::load()?;
    let channel = PrivilegedChannel::new(config.tier_preference);

    if channel.resolve() == AccessTier::None {
        eprintln!(
            "{}",
            "No privileged tier available (frame data needs elevated or superuser access)"
                .yellow()
        );
    }

    let analyzer = FrameRateAnalyzer::new(&channel);
    let fps = match matches.get_one::<String>("package") {
        Some(package) => analyzer.fps_for_package(package),
        None => analyzer.current_fps(),
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::json!({ "fps": fps }));
    } else if fps == 0 {
        println!("fps: {} (could not be determined)", "0".dimmed());
    } else {
        println!("fps: {}", fps.to_string().green().bold());
    }

    Ok(())
}
