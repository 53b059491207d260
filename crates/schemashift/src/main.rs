//! schemashift command-line launcher
//!
//! Converts table schemas between BigQuery JSON and Avro:
//! - **convert**: read a schema in one format, print it in the other
//! - **check**: decode a schema and report its size without converting

use clap::{Parser, Subcommand};
use schemashift_logging::{init_logging, LogConfig};
use std::process::ExitCode;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "schemashift", version, about = "Convert schemas between BigQuery and Avro")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Also write logs to ~/.schemashift/logs
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a schema from one format to the other
    Convert(cli::convert::ConvertArgs),

    /// Validate a schema and report its field count and depth
    Check(cli::check::CheckArgs),
}

impl Commands {
    fn wants_json(&self) -> bool {
        matches!(self, Commands::Check(args) if args.json)
    }
}

fn run_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Convert(args) => cli::convert::run(args),
        Commands::Check(args) => cli::check::run(args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(LogConfig {
        app_name: "schemashift",
        verbose: cli.verbose,
        log_to_file: cli.log_file,
    }) {
        eprintln!("Warning: {:#}", err);
    }

    let json_mode = cli.command.wants_json();
    match run_command(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                eprintln!("{:?}", err);
            }
            ExitCode::from(1)
        }
    }
}
