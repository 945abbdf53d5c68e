use std::process::{Command, Stdio};

use log::{debug, warn};

use super::tier::{
    resolve_tier, AccessTier, ShellTierProbe, TierPreference, TierProbe, ELEVATED_SHELL,
    SUPERUSER_SHELL,
};

/// Captured output of one privileged command.
///
/// An execution failure yields an explicit empty result; partial output
/// is never silently dropped and errors never propagate as panics.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Tier the command actually ran through (or would have).
    pub tier: AccessTier,
    /// Standard output, one entry per line.
    pub lines: Vec<String>,
}

impl CommandResult {
    pub fn empty(tier: AccessTier) -> Self {
        Self {
            tier,
            lines: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One execution strategy per tier, all sharing the same contract.
trait Executor {
    fn execute(&self, command: &str) -> CommandResult;
}

/// Runs the command through a privileged shell binary (`<shell> -c`).
struct ShellExecutor {
    shell: &'static str,
    tier: AccessTier,
}

impl Executor for ShellExecutor {
    fn execute(&self, command: &str) -> CommandResult {
        let output = Command::new(self.shell)
            .args(["-c", command])
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => {
                if !output.status.success() {
                    warn!("`{} -c {command}` exited with {}", self.shell, output.status);
                }
                let lines = String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .map(str::to_string)
                    .collect();
                CommandResult {
                    tier: self.tier,
                    lines,
                }
            }
            Err(e) => {
                warn!("failed to spawn {}: {e}", self.shell);
                CommandResult::empty(self.tier)
            }
        }
    }
}

/// Spawns nothing; every command yields an immediate empty result.
struct NullExecutor;

impl Executor for NullExecutor {
    fn execute(&self, command: &str) -> CommandResult {
        debug!("no privileged tier available, skipping `{command}`");
        CommandResult::empty(AccessTier::None)
    }
}

fn executor_for(tier: AccessTier) -> Box<dyn Executor> {
    match tier {
        AccessTier::Elevated => Box::new(ShellExecutor {
            shell: ELEVATED_SHELL,
            tier,
        }),
        AccessTier::Superuser => Box::new(ShellExecutor {
            shell: SUPERUSER_SHELL,
            tier,
        }),
        AccessTier::None => Box::new(NullExecutor),
    }
}

/// Shell-command-in, line-sequence-out channel over the resolved tier.
///
/// Tier resolution runs on every `execute` call: grants can be revoked
/// or appear at runtime, and a pinned preference must not silently fall
/// back.
pub struct PrivilegedChannel<P: TierProbe = ShellTierProbe> {
    preference: TierPreference,
    probe: P,
}

impl PrivilegedChannel<ShellTierProbe> {
    pub fn new(preference: TierPreference) -> Self {
        Self::with_probe(preference, ShellTierProbe)
    }
}

impl<P: TierProbe> PrivilegedChannel<P> {
    pub fn with_probe(preference: TierPreference, probe: P) -> Self {
        Self { preference, probe }
    }

    pub fn preference(&self) -> TierPreference {
        self.preference
    }

    /// Tier that would serve a command issued right now.
    pub fn resolve(&self) -> AccessTier {
        resolve_tier(self.preference, &self.probe)
    }

    /// Execute `command` through whichever tier resolves right now,
    /// capturing stdout line-by-line after the process completes.
    pub fn execute(&self, command: &str) -> CommandResult {
        executor_for(self.resolve()).execute(command)
    }
}
