use colored::{ColoredString, Colorize};
use humansize::{format_size, BINARY};

use crate::core::telemetry::Snapshot;

/// Format a byte count in human-readable form (KiB, MiB, GiB)
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

/// Format a throughput value as bytes per second
pub fn format_rate(bytes_per_sec: u64) -> String {
    format!("{}/s", format_size(bytes_per_sec, BINARY))
}

/// Format a signed power draw in watts
pub fn format_watts(watts: f64) -> String {
    format!("{watts:+.2} W")
}

/// Format an uptime as d/h/m/s components
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else {
        format!("{minutes}m {seconds}s")
    }
}

fn colorize_percent(percent: f32) -> ColoredString {
    let text = format!("{percent:5.1}%");
    if percent >= 85.0 {
        text.red().bold()
    } else if percent >= 60.0 {
        text.yellow()
    } else {
        text.green()
    }
}

/// One human-readable line per snapshot
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let cpu_percent = snapshot.cpu_utilization * 100.0;
    format!(
        "#{:<6} cpu {}  mem {} ({} / {})  swap {}  pwr {}  net ↓{} ↑{}  free {}  up {}",
        snapshot.seq,
        colorize_percent(cpu_percent),
        colorize_percent(snapshot.mem_percent()),
        format_bytes(snapshot.mem_used_bytes),
        format_bytes(snapshot.mem_total_bytes),
        colorize_percent(snapshot.swap_percent()),
        format_watts(snapshot.power_watts),
        format_rate(snapshot.net_rx_bytes_per_sec),
        format_rate(snapshot.net_tx_bytes_per_sec),
        format_bytes(snapshot.storage_free_bytes),
        format_uptime(snapshot.uptime_secs),
    )
}
