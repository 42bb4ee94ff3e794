pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use shelfscan_core::config::{ConfigOverrides, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "shelfscan",
    about = "Shelfscan operator CLI",
    long_about = "Validate catalog resources, run point lookups, and drive scan payloads through the lookup pipeline.",
    after_help = "Examples:\n  shelfscan check --catalog catalog.toml\n  shelfscan lookup A1\n  shelfscan scan A1 B2\n  shelfscan doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to the catalog resource (overrides config)")]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Load and validate the catalog resource, reporting the record count")]
    Check,
    #[command(about = "Look up a single identifier and print the matching record")]
    Lookup {
        #[arg(help = "Identifier to look up, exactly as decoded from the barcode")]
        id: String,
    },
    #[command(about = "Run decoded payloads (arguments or stdin lines) through the scan pipeline")]
    Scan {
        #[arg(help = "Decoded payloads; reads stdin lines when omitted")]
        payloads: Vec<String>,
        #[arg(long, help = "Bounded scan queue capacity (overrides config)")]
        queue_capacity: Option<usize>,
        #[arg(long, help = "Log level for pipeline output (overrides config)")]
        log_level: Option<String>,
        #[arg(
            long,
            value_parser = parse_log_format,
            help = "Log format: compact, pretty, or json (overrides config)"
        )]
        log_format: Option<LogFormat>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, catalog resource presence, and catalog load readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse::<LogFormat>().map_err(|error| error.to_string())
}

pub fn execute(cli: Cli) -> commands::CommandResult {
    let overrides = ConfigOverrides { catalog_path: cli.catalog, ..ConfigOverrides::default() };

    match cli.command {
        Command::Check => commands::check::run(overrides),
        Command::Lookup { id } => commands::lookup::run(&id, overrides),
        Command::Scan { payloads, queue_capacity, log_level, log_format } => {
            let overrides = ConfigOverrides { queue_capacity, log_level, log_format, ..overrides };
            commands::scan::run(payloads, overrides)
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(overrides) }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json, overrides) }
        }
    }
}

pub fn run() -> ExitCode {
    let result = execute(Cli::parse());

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
