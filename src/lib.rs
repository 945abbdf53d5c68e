// droidtop Library - Public API

// Re-export error types
pub mod error;
pub use error::{DroidtopError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::telemetry::{Sampler, SamplerRuntime, Snapshot};

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
}
