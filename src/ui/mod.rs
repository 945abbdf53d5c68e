// UI module - output formatting for the CLI (a consumer of snapshots,
// not part of the telemetry core)

pub mod formatters;

pub use formatters::{format_bytes, format_rate, format_uptime, format_watts, render_snapshot};
