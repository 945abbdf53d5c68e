//! Privileged command execution and the diagnostics built on it.
//!
//! Diagnostic shell commands (window dumps, frame-timing dumps) need
//! more privilege than an app sandbox grants. This module resolves
//! which execution tier is currently usable and degrades gracefully
//! when none is.

mod channel;
mod fps;
mod tier;

pub use channel::{CommandResult, PrivilegedChannel};
pub use fps::{foreground_package, frames_in_window, FrameRateAnalyzer};
pub use tier::{resolve_tier, AccessTier, ShellTierProbe, TierPreference, TierProbe};
