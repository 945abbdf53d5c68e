use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use droidtop::commands;

fn main() -> Result<()> {
    droidtop::init_logging();

    let mut cli = build_cli();
    let matches = cli.clone().get_matches();

    match matches.subcommand() {
        Some(("monitor", sub)) => commands::monitor::execute(sub),
        Some(("fps", sub)) => commands::fps::execute(sub),
        Some(("tier", _)) => commands::tier::execute(),
        Some(("config", sub)) => commands::config::execute(sub),
        Some(("completions", sub)) => commands::completions::execute(sub, &mut cli),
        Some(("version", _)) => commands::version::execute(),
        _ => {
            cli.print_help()?;
            Ok(())
        }
    }
}

fn build_cli() -> Command {
    Command::new("droidtop")
        .version(env!("CARGO_PKG_VERSION"))
        .about("On-device telemetry monitor: CPU, memory, power, network and frame rate")
        .subcommand(
            Command::new("monitor")
                .about("Stream telemetry snapshots, one per sampling tick")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("MS")
                        .help("Sampling period in milliseconds (default from config)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("samples")
                        .short('n')
                        .long("samples")
                        .value_name("COUNT")
                        .help("Stop after this many snapshots")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Emit one JSON object per snapshot (for scripting)")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("fps")
                .about("Report frames presented by the foreground app in the last second")
                .arg(
                    Arg::new("package")
                        .short('p')
                        .long("package")
                        .value_name("PACKAGE")
                        .help("Analyze this package instead of detecting the foreground app"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Emit the result as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("tier").about("Probe which privileged execution tier is usable"))
        .subcommand(
            Command::new("config")
                .about("Read or change persisted settings")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("get").about("Print the current configuration"))
                .subcommand(
                    Command::new("set")
                        .about("Change a setting")
                        .subcommand_required(true)
                        .arg_required_else_help(true)
                        .subcommand(
                            Command::new("tier")
                                .about("Pin the privileged tier (AUTO, ELEVATED, SUPERUSER)")
                                .arg(Arg::new("value").required(true).index(1)),
                        )
                        .subcommand(
                            Command::new("interval")
                                .about("Default sampling period in milliseconds")
                                .arg(
                                    Arg::new("value")
                                        .required(true)
                                        .index(1)
                                        .value_parser(clap::value_parser!(u64)),
                                ),
                        ),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Target shell (bash, zsh, fish, powershell, elvish)")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("version").about("Show version information"))
}
