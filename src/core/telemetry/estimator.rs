//! Weighted CPU utilization estimate from per-core frequency pairs.

use super::types::CoreFrequencyReading;

/// Response-curve exponent applied to the frequency ratio.
///
/// A raw ratio under-reports load: DVFS power draw grows super-linearly
/// with frequency. The value is an empirical calibration constant, not
/// derived from live power telemetry.
pub const DEFAULT_EXPONENT: f32 = 2.5;

/// Estimate overall utilization in `[0.0, 1.0]` from a batch of per-core
/// readings, using the default calibration exponent.
pub fn estimate(readings: &[CoreFrequencyReading]) -> f32 {
    estimate_with_exponent(readings, DEFAULT_EXPONENT)
}

/// Estimate with an explicit response-curve exponent.
///
/// Each valid core contributes `clamp(current/max, 0, 1) ^ exponent`,
/// weighted by its maximum frequency so higher-performance cores count
/// more. Readings with `max_hz == 0` are excluded; if none remain the
/// estimate is `0.0`. Pure and deterministic given its inputs.
pub fn estimate_with_exponent(readings: &[CoreFrequencyReading], exponent: f32) -> f32 {
    let mut weighted_sum = 0.0f64;
    let mut weight_total = 0.0f64;

    for reading in readings.iter().filter(|r| r.is_valid()) {
        let ratio = (reading.current_hz as f64 / reading.max_hz as f64).clamp(0.0, 1.0);
        let per_core_percent = ratio.powf(exponent as f64) * 100.0;
        let weight = reading.max_hz as f64;
        weighted_sum += per_core_percent * weight;
        weight_total += weight;
    }

    if weight_total == 0.0 {
        return 0.0;
    }

    ((weighted_sum / weight_total) / 100.0).clamp(0.0, 1.0) as f32
}
