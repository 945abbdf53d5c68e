//! Rate computation for monotonically non-decreasing counters.

use super::types::{BatteryReading, CounterSample};

/// Per-second rate between two cumulative-counter samples.
///
/// Counter resets (the value decreasing, e.g. after a reboot) clamp to
/// zero, and a non-positive elapsed time yields zero. The result is
/// never negative.
pub fn rate(prev: &CounterSample, curr: &CounterSample) -> u64 {
    let delta_t = curr.at_ms - prev.at_ms;
    if delta_t <= 0 {
        return 0;
    }
    let delta_v = curr.value.saturating_sub(prev.value);
    ((delta_v as u128 * 1000) / delta_t as u128) as u64
}

/// Owns the previous sample for one monotonic counter.
#[derive(Debug, Default)]
pub struct CounterTracker {
    prev: Option<CounterSample>,
}

impl CounterTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `curr` and return the per-second rate against the
    /// previous sample. The first observation yields zero (no baseline).
    pub fn update(&mut self, curr: CounterSample) -> u64 {
        let per_sec = self.prev.as_ref().map(|prev| rate(prev, &curr)).unwrap_or(0);
        self.prev = Some(curr);
        per_sec
    }
}

/// Instantaneous battery draw in signed watts; negative while
/// discharging. A direct product of voltage and current, not a counter
/// delta.
pub fn power_watts(reading: &BatteryReading) -> f64 {
    let watts = (reading.voltage_v * reading.current_a).abs();
    if reading.discharging {
        -watts
    } else {
        watts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_samples_one_second_apart() {
        let prev = CounterSample::new(1000, 0);
        let curr = CounterSample::new(3000, 1000);
        assert_eq!(rate(&prev, &curr), 2000);
    }

    #[test]
    fn sub_second_interval_scales_up() {
        let prev = CounterSample::new(0, 0);
        let curr = CounterSample::new(500, 500);
        assert_eq!(rate(&prev, &curr), 1000);
    }

    #[test]
    fn counter_reset_clamps_to_zero() {
        let prev = CounterSample::new(5000, 0);
        let curr = CounterSample::new(100, 1000);
        assert_eq!(rate(&prev, &curr), 0);
    }

    #[test]
    fn zero_elapsed_yields_zero() {
        let sample = CounterSample::new(1000, 42);
        assert_eq!(rate(&sample, &sample), 0);
    }

    #[test]
    fn backwards_clock_yields_zero() {
        let prev = CounterSample::new(1000, 2000);
        let curr = CounterSample::new(4000, 1000);
        assert_eq!(rate(&prev, &curr), 0);
    }

    #[test]
    fn tracker_first_update_has_no_baseline() {
        let mut tracker = CounterTracker::new();
        assert_eq!(tracker.update(CounterSample::new(1000, 0)), 0);
        assert_eq!(tracker.update(CounterSample::new(3000, 1000)), 2000);
    }

    #[test]
    fn power_sign_follows_battery_status() {
        let discharging = BatteryReading {
            voltage_v: 4.0,
            current_a: 0.5,
            discharging: true,
        };
        let charging = BatteryReading {
            voltage_v: 4.0,
            current_a: -0.5, // some kernels report charge current negative
            discharging: false,
        };
        assert_eq!(power_watts(&discharging), -2.0);
        assert_eq!(power_watts(&charging), 2.0);
    }
}
