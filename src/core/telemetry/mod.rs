//! Telemetry sampling and aggregation engine.
//!
//! This module provides the business logic for periodically reading
//! volatile hardware counters, turning raw readings into rates and
//! bounded percentage estimates, and publishing complete snapshots.

pub mod estimator;
mod freq_cache;
mod history;
pub mod rate;
mod sampler;
pub mod source;
mod types;

pub use freq_cache::{FrequencyCache, DEFAULT_FREQ_CACHE_TTL};
pub use history::{HistoryBuffer, DEFAULT_HISTORY_CAPACITY};
pub use rate::CounterTracker;
pub use sampler::{Sampler, SamplerConfig, SamplerRuntime};
pub use source::{CounterSource, MemoryReading, SystemCounterSource};
pub use types::{BatteryReading, CoreFrequencyReading, CounterSample, HistoryPoint, Snapshot};
