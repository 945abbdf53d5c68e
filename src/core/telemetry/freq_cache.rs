use std::time::{Duration, Instant};

use super::types::CoreFrequencyReading;

pub const DEFAULT_FREQ_CACHE_TTL: Duration = Duration::from_millis(200);

/// Short-TTL cache over the per-core frequency batch.
///
/// All cores share one "last refreshed at" instant: the underlying sysfs
/// reads are only cheap in aggregate, so the whole batch refreshes
/// together. A stale access re-reads every core; a fresh access returns
/// the cached batch verbatim. Unreadable cores pass through as zeroed
/// readings and are excluded downstream.
#[derive(Debug)]
pub struct FrequencyCache {
    ttl: Duration,
    batch: Vec<CoreFrequencyReading>,
    refreshed_at: Option<Instant>,
}

impl FrequencyCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_FREQ_CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            batch: Vec::new(),
            refreshed_at: None,
        }
    }

    /// Full batch, refreshed through `refresh` only when the TTL has
    /// expired.
    pub fn read_all_with<F>(&mut self, refresh: F) -> &[CoreFrequencyReading]
    where
        F: FnOnce() -> Vec<CoreFrequencyReading>,
    {
        let stale = self
            .refreshed_at
            .map_or(true, |at| at.elapsed() >= self.ttl);
        if stale {
            self.batch = refresh();
            self.refreshed_at = Some(Instant::now());
        }
        &self.batch
    }

    /// Single-core read out of the (possibly refreshed) batch.
    pub fn read_with<F>(&mut self, core_id: usize, refresh: F) -> CoreFrequencyReading
    where
        F: FnOnce() -> Vec<CoreFrequencyReading>,
    {
        self.read_all_with(refresh)
            .iter()
            .find(|r| r.core_id == core_id)
            .copied()
            .unwrap_or_else(|| CoreFrequencyReading::unreadable(core_id))
    }
}

impl Default for FrequencyCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(current_hz: u64) -> Vec<CoreFrequencyReading> {
        vec![CoreFrequencyReading {
            core_id: 0,
            current_hz,
            max_hz: 3_200_000,
        }]
    }

    #[test]
    fn fresh_access_returns_cached_batch() {
        let mut cache = FrequencyCache::with_ttl(Duration::from_secs(3600));
        let mut reads = 0;
        cache.read_all_with(|| {
            reads += 1;
            batch(100)
        });
        let cached = cache.read_all_with(|| {
            reads += 1;
            batch(200)
        });
        assert_eq!(reads, 1);
        assert_eq!(cached[0].current_hz, 100);
    }

    #[test]
    fn stale_access_refreshes_whole_batch() {
        let mut cache = FrequencyCache::with_ttl(Duration::from_millis(1));
        cache.read_all_with(|| batch(100));
        std::thread::sleep(Duration::from_millis(5));
        let refreshed = cache.read_all_with(|| batch(200));
        assert_eq!(refreshed[0].current_hz, 200);
    }

    #[test]
    fn single_core_read_hits_the_batch() {
        let mut cache = FrequencyCache::with_ttl(Duration::from_secs(3600));
        let reading = cache.read_with(0, || batch(100));
        assert_eq!(reading.current_hz, 100);
    }

    #[test]
    fn unknown_core_reads_as_unreadable() {
        let mut cache = FrequencyCache::with_ttl(Duration::from_secs(3600));
        let reading = cache.read_with(7, || batch(100));
        assert_eq!(reading, CoreFrequencyReading::unreadable(7));
        assert!(!reading.is_valid());
    }
}
