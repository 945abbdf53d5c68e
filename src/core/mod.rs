// Core business logic module

pub mod config;
pub mod privileged;
pub mod telemetry;

// Re-export commonly used items
pub use config::Config;
pub use privileged::{AccessTier, FrameRateAnalyzer, PrivilegedChannel, TierPreference};
pub use telemetry::{Sampler, SamplerConfig, SamplerRuntime, Snapshot, SystemCounterSource};
