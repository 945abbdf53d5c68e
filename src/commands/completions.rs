use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use clap_complete::{generate, Shell};
use std::io;

/// Generate shell completions for the specified shell
pub fn execute(matches: &ArgMatches, cli: &mut Command) -> Result<()> {
    let shell_name = matches
        .get_one::<String>("shell")
        .ok_or_else(|| anyhow!("shell argument is required"))?;

    let shell: Shell = shell_name
        .to_lowercase()
        .parse()
        .map_err(|_| anyhow!("unsupported shell '{shell_name}' (bash, zsh, fish, powershell, elvish)"))?;

    generate(shell, cli, "droidtop", &mut io::stdout());
    Ok(())
}
