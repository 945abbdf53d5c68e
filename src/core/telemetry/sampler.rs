//! Periodic aggregation loop: one snapshot per tick, published on a
//! watch channel with last-value-wins delivery.

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use tokio::sync::{broadcast, watch};

use super::estimator;
use super::freq_cache::FrequencyCache;
use super::history::HistoryBuffer;
use super::rate::{self, CounterTracker};
use super::source::{CounterSource, MemoryReading};
use super::types::{CounterSample, HistoryPoint, Snapshot};

pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct SamplerConfig {
    pub interval: Duration,
    pub history_capacity: usize,
    pub utilization_exponent: f32,
    pub freq_cache_ttl: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SAMPLE_INTERVAL,
            history_capacity: super::history::DEFAULT_HISTORY_CAPACITY,
            utilization_exponent: estimator::DEFAULT_EXPONENT,
            freq_cache_ttl: super::freq_cache::DEFAULT_FREQ_CACHE_TTL,
        }
    }
}

/// Assembles one complete [`Snapshot`] per tick.
///
/// Owns every piece of mutable sampling state: the frequency cache, the
/// network counter trackers, the history buffers and the sequence
/// counter. Single writer; independent samplers own independent state.
pub struct Sampler<S: CounterSource> {
    source: S,
    freq_cache: FrequencyCache,
    rx_tracker: CounterTracker,
    tx_tracker: CounterTracker,
    cpu_history: HistoryBuffer<HistoryPoint<f32>>,
    mem_history: HistoryBuffer<HistoryPoint<f32>>,
    power_history: HistoryBuffer<HistoryPoint<f64>>,
    exponent: f32,
    seq: u64,
    // last-known values substituted when a sub-reading fails
    last_memory: MemoryReading,
    last_storage_free: u64,
    last_uptime: u64,
}

impl<S: CounterSource> Sampler<S> {
    pub fn new(source: S, config: &SamplerConfig) -> Self {
        Self {
            source,
            freq_cache: FrequencyCache::with_ttl(config.freq_cache_ttl),
            rx_tracker: CounterTracker::new(),
            tx_tracker: CounterTracker::new(),
            cpu_history: HistoryBuffer::with_capacity(config.history_capacity),
            mem_history: HistoryBuffer::with_capacity(config.history_capacity),
            power_history: HistoryBuffer::with_capacity(config.history_capacity),
            exponent: config.utilization_exponent,
            seq: 0,
            last_memory: MemoryReading::default(),
            last_storage_free: 0,
            last_uptime: 0,
        }
    }

    /// Collect one complete snapshot.
    ///
    /// A failed sub-reading substitutes its last-known or zero value and
    /// never aborts the tick.
    pub fn tick(&mut self) -> Snapshot {
        let seq = self.seq;
        self.seq += 1;

        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        let at_ms = self.source.monotonic_ms();

        let source = &mut self.source;
        let readings = self.freq_cache.read_all_with(|| source.core_frequencies());
        let cpu_utilization = estimator::estimate_with_exponent(readings, self.exponent);

        let memory = match self.source.memory() {
            Ok(reading) => {
                self.last_memory = reading;
                reading
            }
            Err(e) => {
                warn!("memory read failed, keeping last-known: {e}");
                self.last_memory
            }
        };

        let (net_rx_bytes_per_sec, net_tx_bytes_per_sec) = match self.source.network_totals() {
            Ok((rx, tx)) => (
                self.rx_tracker.update(CounterSample::new(rx, at_ms)),
                self.tx_tracker.update(CounterSample::new(tx, at_ms)),
            ),
            Err(e) => {
                // baseline untouched; rates resume on the next good read
                warn!("network counters unreadable: {e}");
                (0, 0)
            }
        };

        let power_watts = match self.source.battery() {
            Ok(reading) => rate::power_watts(&reading),
            Err(e) => {
                warn!("battery read failed: {e}");
                0.0
            }
        };

        let storage_free_bytes = match self.source.storage_free_bytes() {
            Ok(free) => {
                self.last_storage_free = free;
                free
            }
            Err(e) => {
                warn!("storage read failed, keeping last-known: {e}");
                self.last_storage_free
            }
        };

        let uptime_secs = match self.source.uptime_secs() {
            Ok(uptime) => {
                self.last_uptime = uptime;
                uptime
            }
            Err(_) => self.last_uptime,
        };

        let mem_percent = if memory.mem_total_bytes > 0 {
            (memory.mem_used_bytes as f32 / memory.mem_total_bytes as f32) * 100.0
        } else {
            0.0
        };

        self.cpu_history.push(HistoryPoint {
            seq,
            timestamp_ms,
            value: cpu_utilization * 100.0,
        });
        self.mem_history.push(HistoryPoint {
            seq,
            timestamp_ms,
            value: mem_percent,
        });
        self.power_history.push(HistoryPoint {
            seq,
            timestamp_ms,
            value: power_watts,
        });

        Snapshot {
            seq,
            timestamp_ms,
            cpu_utilization,
            mem_used_bytes: memory.mem_used_bytes,
            mem_total_bytes: memory.mem_total_bytes,
            swap_used_bytes: memory.swap_used_bytes,
            swap_total_bytes: memory.swap_total_bytes,
            power_watts,
            storage_free_bytes,
            net_rx_bytes_per_sec,
            net_tx_bytes_per_sec,
            uptime_secs,
            cpu_history: self.cpu_history.snapshot(),
            mem_history: self.mem_history.snapshot(),
            power_history: self.power_history.snapshot(),
        }
    }
}

/// Wrapper around the Tokio runtime driving one sampler.
///
/// Snapshots are published strictly in tick order on a watch channel: a
/// slow consumer simply sees the latest value, the producer never blocks
/// on backpressure.
pub struct SamplerRuntime {
    snapshot_rx: watch::Receiver<Arc<Snapshot>>,
    shutdown_tx: broadcast::Sender<()>,
    runtime: tokio::runtime::Runtime,
}

impl SamplerRuntime {
    /// Spawn the periodic sampling task on a dedicated runtime.
    pub fn start<S>(sampler: Sampler<S>, interval: Duration) -> anyhow::Result<Self>
    where
        S: CounterSource + 'static,
    {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("telemetry-worker")
            .build()?;

        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(Snapshot::default()));
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        let shutdown_rx = shutdown_tx.subscribe();
        runtime.spawn(sampling_task(sampler, interval, snapshot_tx, shutdown_rx));

        Ok(Self {
            snapshot_rx,
            shutdown_tx,
            runtime,
        })
    }

    /// Receiver with last-value semantics; late subscribers see the most
    /// recent snapshot immediately.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.snapshot_rx.clone()
    }

    /// Block until the next published snapshot, or `None` on timeout.
    pub fn next_snapshot(
        &self,
        rx: &mut watch::Receiver<Arc<Snapshot>>,
        timeout: Duration,
    ) -> Option<Arc<Snapshot>> {
        self.runtime.block_on(async {
            match tokio::time::timeout(timeout, rx.changed()).await {
                Ok(Ok(())) => Some(rx.borrow_and_update().clone()),
                _ => None,
            }
        })
    }

    /// Stop the sampling task; no tick fires after the signal lands.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        self.runtime.shutdown_timeout(Duration::from_secs(1));
    }
}

async fn sampling_task<S: CounterSource>(
    mut sampler: Sampler<S>,
    period: Duration,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = sampler.tick();
                // send() only fails once every receiver is gone
                if snapshot_tx.send(Arc::new(snapshot)).is_err() {
                    break;
                }
            }
            _ = shutdown.recv() => {
                break;
            }
        }
    }
}
