use std::fmt;
use std::process::{Command, Stdio};
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::DroidtopError;

/// Shell bridge of the elevated service.
pub(crate) const ELEVATED_SHELL: &str = "rish";
/// Superuser shell.
pub(crate) const SUPERUSER_SHELL: &str = "su";

/// Execution privilege channel usable for diagnostic commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessTier {
    /// Elevated shell service (shell-level privileges without root).
    Elevated,
    /// Superuser shell.
    Superuser,
    /// No privileged channel available; commands yield empty results.
    None,
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessTier::Elevated => write!(f, "elevated"),
            AccessTier::Superuser => write!(f, "superuser"),
            AccessTier::None => write!(f, "none"),
        }
    }
}

/// Persisted preference controlling which tier may be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TierPreference {
    #[default]
    Auto,
    Elevated,
    Superuser,
}

impl TierPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierPreference::Auto => "AUTO",
            TierPreference::Elevated => "ELEVATED",
            TierPreference::Superuser => "SUPERUSER",
        }
    }
}

impl fmt::Display for TierPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierPreference {
    type Err = DroidtopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AUTO" => Ok(TierPreference::Auto),
            "ELEVATED" => Ok(TierPreference::Elevated),
            "SUPERUSER" => Ok(TierPreference::Superuser),
            other => Err(DroidtopError::config(format!(
                "unknown tier preference '{other}' (expected AUTO, ELEVATED or SUPERUSER)"
            ))),
        }
    }
}

/// Availability checks for each privileged tier.
///
/// Grants can change at runtime, so resolution runs on every command
/// invocation; implementations must not cache results.
pub trait TierProbe {
    fn elevated_available(&self) -> bool;
    fn superuser_available(&self) -> bool;
}

/// Probes the live device: a tier is available when its shell binary
/// resolves on PATH and a no-op command through it exits successfully.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellTierProbe;

impl TierProbe for ShellTierProbe {
    fn elevated_available(&self) -> bool {
        shell_responds(ELEVATED_SHELL)
    }

    fn superuser_available(&self) -> bool {
        shell_responds(SUPERUSER_SHELL)
    }
}

fn shell_responds(binary: &str) -> bool {
    if which::which(binary).is_err() {
        debug!("{binary} not on PATH");
        return false;
    }
    Command::new(binary)
        .args(["-c", "true"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Resolve the usable tier for one command invocation.
///
/// A pinned preference checks only its own tier; there is no fallback
/// when the pinned tier is unavailable. `Auto` probes the elevated
/// service first, then the superuser shell.
pub fn resolve_tier(preference: TierPreference, probe: &dyn TierProbe) -> AccessTier {
    match preference {
        TierPreference::Elevated => {
            if probe.elevated_available() {
                AccessTier::Elevated
            } else {
                AccessTier::None
            }
        }
        TierPreference::Superuser => {
            if probe.superuser_available() {
                AccessTier::Superuser
            } else {
                AccessTier::None
            }
        }
        TierPreference::Auto => {
            if probe.elevated_available() {
                AccessTier::Elevated
            } else if probe.superuser_available() {
                AccessTier::Superuser
            } else {
                AccessTier::None
            }
        }
    }
}
