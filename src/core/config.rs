use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::core::privileged::TierPreference;
use crate::core::telemetry::{estimator, DEFAULT_HISTORY_CAPACITY};

pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Pinned privileged tier, or AUTO to probe elevated-then-superuser.
    #[serde(default)]
    pub tier_preference: TierPreference,
    /// Sampling period for the telemetry loop, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub sample_interval_ms: u64,
    /// Points kept per history series.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Response-curve exponent of the utilization estimate.
    /// Calibration constant; change only with power-telemetry evidence.
    #[serde(default = "default_exponent")]
    pub utilization_exponent: f32,
}

fn default_interval_ms() -> u64 {
    DEFAULT_SAMPLE_INTERVAL_MS
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_exponent() -> f32 {
    estimator::DEFAULT_EXPONENT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tier_preference: TierPreference::default(),
            sample_interval_ms: default_interval_ms(),
            history_capacity: default_history_capacity(),
            utilization_exponent: default_exponent(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {config_path:?}"))?;

        // An empty or corrupted file falls back to defaults (this can
        // happen when the config format changes between versions)
        if data.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_json::from_str(&data).unwrap_or_default())
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {parent:?}"))?;
        }

        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, data)
            .with_context(|| format!("Failed to write config file: {config_path:?}"))?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("droidtop").join("config.json"))
    }

    pub fn set_tier_preference(&mut self, preference: TierPreference) {
        self.tier_preference = preference;
    }
}
