//! Point-in-time access to the volatile counters the sampler polls.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::debug;
use sysinfo::{Disks, MemoryRefreshKind, Networks, RefreshKind, System};

use crate::error::{DroidtopError, Result};

use super::types::{BatteryReading, CoreFrequencyReading};

const CPU_ROOT: &str = "/sys/devices/system/cpu";
const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// Memory and swap occupancy in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryReading {
    pub mem_used_bytes: u64,
    pub mem_total_bytes: u64,
    pub swap_used_bytes: u64,
    pub swap_total_bytes: u64,
}

/// Side-effecting read interface over the hardware counters.
///
/// The sampler polls this once per tick. Per-core frequency failures are
/// local (an unreadable core reads as zeroed and gets excluded); the
/// other readings surface errors so the sampler can substitute its
/// last-known values.
pub trait CounterSource: Send {
    /// Batch-read current/max frequency for every core.
    fn core_frequencies(&mut self) -> Vec<CoreFrequencyReading>;

    /// Cumulative (received, transmitted) byte totals across interfaces.
    fn network_totals(&mut self) -> Result<(u64, u64)>;

    fn memory(&mut self) -> Result<MemoryReading>;

    fn storage_free_bytes(&mut self) -> Result<u64>;

    fn battery(&mut self) -> Result<BatteryReading>;

    fn uptime_secs(&mut self) -> Result<u64>;

    /// Milliseconds on the monotonic clock all counter samples share.
    fn monotonic_ms(&self) -> i64;
}

/// Production source: memory, swap, network and storage through
/// `sysinfo`; per-core frequencies and battery telemetry straight from
/// the kernel's cpufreq and power-supply class trees.
pub struct SystemCounterSource {
    system: System,
    networks: Networks,
    disks: Disks,
    cpu_root: PathBuf,
    core_count: usize,
    battery_dir: Option<PathBuf>,
    started: Instant,
}

impl SystemCounterSource {
    pub fn new() -> Self {
        Self::with_roots(CPU_ROOT, POWER_SUPPLY_ROOT)
    }

    /// Custom sysfs roots, used by tests to point at fixture trees.
    pub fn with_roots<P: Into<PathBuf>, Q: AsRef<Path>>(cpu_root: P, power_supply_root: Q) -> Self {
        let refresh = RefreshKind::nothing().with_memory(MemoryRefreshKind::everything());
        let system = System::new_with_specifics(refresh);
        let networks = Networks::new_with_refreshed_list();
        let disks = Disks::new_with_refreshed_list();

        let cpu_root = cpu_root.into();
        let core_count = count_cores(&cpu_root);
        let battery_dir = find_battery_dir(power_supply_root.as_ref());
        if battery_dir.is_none() {
            debug!("no battery under {:?}", power_supply_root.as_ref());
        }

        Self {
            system,
            networks,
            disks,
            cpu_root,
            core_count,
            battery_dir,
            started: Instant::now(),
        }
    }
}

impl Default for SystemCounterSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for SystemCounterSource {
    fn core_frequencies(&mut self) -> Vec<CoreFrequencyReading> {
        (0..self.core_count)
            .map(|core_id| {
                let cpufreq = self.cpu_root.join(format!("cpu{core_id}")).join("cpufreq");
                match (
                    read_khz(&cpufreq.join("scaling_cur_freq")),
                    read_khz(&cpufreq.join("cpuinfo_max_freq")),
                ) {
                    (Some(current_khz), Some(max_khz)) => CoreFrequencyReading {
                        core_id,
                        current_hz: current_khz * 1000,
                        max_hz: max_khz * 1000,
                    },
                    _ => {
                        debug!("cpu{core_id}: cpufreq unreadable");
                        CoreFrequencyReading::unreadable(core_id)
                    }
                }
            })
            .collect()
    }

    fn network_totals(&mut self) -> Result<(u64, u64)> {
        self.networks.refresh(true);
        let mut rx = 0u64;
        let mut tx = 0u64;
        for data in self.networks.values() {
            rx = rx.saturating_add(data.total_received());
            tx = tx.saturating_add(data.total_transmitted());
        }
        Ok((rx, tx))
    }

    fn memory(&mut self) -> Result<MemoryReading> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(DroidtopError::counter_read("total memory reads as zero"));
        }
        Ok(MemoryReading {
            mem_used_bytes: self.system.used_memory(),
            mem_total_bytes: total,
            swap_used_bytes: self.system.used_swap(),
            swap_total_bytes: self.system.total_swap(),
        })
    }

    fn storage_free_bytes(&mut self) -> Result<u64> {
        self.disks.refresh(true);
        if self.disks.list().is_empty() {
            return Err(DroidtopError::counter_read("no disks enumerated"));
        }
        Ok(self
            .disks
            .iter()
            .fold(0u64, |acc, disk| acc.saturating_add(disk.available_space())))
    }

    fn battery(&mut self) -> Result<BatteryReading> {
        let dir = self
            .battery_dir
            .as_ref()
            .ok_or_else(|| DroidtopError::counter_read("no battery present"))?;

        let voltage_uv = read_i64(&dir.join("voltage_now"))
            .ok_or_else(|| DroidtopError::counter_read("voltage_now unreadable"))?;
        let current_ua = read_i64(&dir.join("current_now"))
            .ok_or_else(|| DroidtopError::counter_read("current_now unreadable"))?;
        let status = fs::read_to_string(dir.join("status")).unwrap_or_default();

        Ok(BatteryReading {
            voltage_v: voltage_uv as f64 / 1_000_000.0,
            current_a: current_ua as f64 / 1_000_000.0,
            discharging: status.trim().eq_ignore_ascii_case("discharging"),
        })
    }

    fn uptime_secs(&mut self) -> Result<u64> {
        Ok(System::uptime())
    }

    fn monotonic_ms(&self) -> i64 {
        self.started.elapsed().as_millis() as i64
    }
}

/// Count `cpuN` directories under the cpu class root.
fn count_cores(root: &Path) -> usize {
    let Ok(entries) = fs::read_dir(root) else {
        debug!("cpu root {root:?} unreadable");
        return 0;
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.strip_prefix("cpu")
                .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        })
        .count()
}

/// First power-supply entry whose `type` reads `Battery`.
fn find_battery_dir(root: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(root).ok()?;
    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if let Ok(kind) = fs::read_to_string(path.join("type")) {
            if kind.trim().eq_ignore_ascii_case("battery") {
                return Some(path);
            }
        }
    }
    None
}

fn read_khz(path: &Path) -> Option<u64> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn read_i64(path: &Path) -> Option<i64> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn reads_cpufreq_fixture_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let cpu_root = tmp.path().join("cpu");
        for (core, cur, max) in [
            ("cpu0", 1_800_000u64, 1_800_000u64),
            ("cpu1", 800_000, 3_200_000),
        ] {
            let cpufreq = cpu_root.join(core).join("cpufreq");
            write(&cpufreq.join("scaling_cur_freq"), &format!("{cur}\n"));
            write(&cpufreq.join("cpuinfo_max_freq"), &format!("{max}\n"));
        }
        // a directory that must not count as a core
        fs::create_dir_all(cpu_root.join("cpufreq")).unwrap();

        let mut source = SystemCounterSource::with_roots(&cpu_root, tmp.path().join("power"));
        let readings = source.core_frequencies();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].current_hz, 1_800_000 * 1000);
        assert_eq!(readings[1].max_hz, 3_200_000 * 1000);
    }

    #[test]
    fn unreadable_core_reads_as_zero() {
        let tmp = tempfile::tempdir().unwrap();
        let cpu_root = tmp.path().join("cpu");
        // cpu0 exists but has no cpufreq files
        fs::create_dir_all(cpu_root.join("cpu0")).unwrap();

        let mut source = SystemCounterSource::with_roots(&cpu_root, tmp.path().join("power"));
        let readings = source.core_frequencies();
        assert_eq!(readings, vec![CoreFrequencyReading::unreadable(0)]);
    }

    #[test]
    fn reads_battery_fixture() {
        let tmp = tempfile::tempdir().unwrap();
        let battery = tmp.path().join("power").join("battery");
        write(&battery.join("type"), "Battery\n");
        write(&battery.join("voltage_now"), "4200000\n");
        write(&battery.join("current_now"), "500000\n");
        write(&battery.join("status"), "Discharging\n");
        // a non-battery sibling entry
        let usb = tmp.path().join("power").join("usb");
        write(&usb.join("type"), "USB\n");

        let mut source =
            SystemCounterSource::with_roots(tmp.path().join("cpu"), tmp.path().join("power"));
        let reading = source.battery().unwrap();
        assert!((reading.voltage_v - 4.2).abs() < 1e-9);
        assert!((reading.current_a - 0.5).abs() < 1e-9);
        assert!(reading.discharging);
    }

    #[test]
    fn missing_battery_is_an_error_not_a_panic() {
        let tmp = tempfile::tempdir().unwrap();
        let mut source =
            SystemCounterSource::with_roots(tmp.path().join("cpu"), tmp.path().join("power"));
        assert!(source.battery().is_err());
    }
}
