use serde::{Deserialize, Serialize};

/// Complete telemetry snapshot for one sampling tick.
///
/// Built fresh every tick by the [`Sampler`](super::Sampler) and handed
/// to subscribers as an immutable value; nothing mutates it after
/// publication.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tick counter, strictly increasing for the life of one sampler.
    pub seq: u64,
    pub timestamp_ms: i64, // Unix millis
    /// Weighted utilization estimate in `[0.0, 1.0]`.
    pub cpu_utilization: f32,
    pub mem_used_bytes: u64,
    pub mem_total_bytes: u64,
    pub swap_used_bytes: u64,
    pub swap_total_bytes: u64,
    /// Instantaneous battery draw; negative while discharging.
    pub power_watts: f64,
    pub storage_free_bytes: u64,
    pub net_rx_bytes_per_sec: u64,
    pub net_tx_bytes_per_sec: u64,
    pub uptime_secs: u64,
    pub cpu_history: Vec<HistoryPoint<f32>>,
    pub mem_history: Vec<HistoryPoint<f32>>,
    pub power_history: Vec<HistoryPoint<f64>>,
}

impl Snapshot {
    pub fn mem_percent(&self) -> f32 {
        if self.mem_total_bytes > 0 {
            (self.mem_used_bytes as f32 / self.mem_total_bytes as f32) * 100.0
        } else {
            0.0
        }
    }

    pub fn swap_percent(&self) -> f32 {
        if self.swap_total_bytes > 0 {
            (self.swap_used_bytes as f32 / self.swap_total_bytes as f32) * 100.0
        } else {
            0.0
        }
    }
}

/// One charted value with its position on the x-axis.
///
/// `seq` survives buffer eviction: charts keep scrolling instead of
/// re-indexing when the oldest points drop off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint<V> {
    pub seq: u64,
    pub timestamp_ms: i64,
    pub value: V,
}

/// A cumulative counter reading paired with the monotonic time it was
/// taken, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSample {
    pub value: u64,
    pub at_ms: i64,
}

impl CounterSample {
    pub fn new(value: u64, at_ms: i64) -> Self {
        Self { value, at_ms }
    }
}

/// Current and maximum clock frequency of one core, in Hz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreFrequencyReading {
    pub core_id: usize,
    pub current_hz: u64,
    pub max_hz: u64,
}

impl CoreFrequencyReading {
    /// A reading without a usable maximum is excluded from the weighted
    /// utilization average.
    pub fn is_valid(&self) -> bool {
        self.max_hz > 0
    }

    /// Placeholder for a core whose frequency files were unreadable.
    pub fn unreadable(core_id: usize) -> Self {
        Self {
            core_id,
            current_hz: 0,
            max_hz: 0,
        }
    }
}

/// Instantaneous battery state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BatteryReading {
    pub voltage_v: f64,
    pub current_a: f64,
    pub discharging: bool,
}
