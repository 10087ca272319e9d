//! netverify CLI
//!
//! Command-line interface for pre/post change verification of network
//! device fleets. Exit status: 0 when every verdict is pass or skip,
//! 1 when any verdict failed, 2 for precondition or usage errors.

use clap::{Parser, Subcommand};
use netverify_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "netverify")]
#[command(about = "Pre/post regression verification for network device fleets", long_about = None)]
struct Cli {
    /// Emit JSON logs instead of human-readable ones
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Capture a stage and, when a baseline is given, compare against it
    Run(commands::run::RunArgs),
    /// Apply the pre-only rule set to an already-captured stage directory
    Check(commands::check::CheckArgs),
    /// Diff two snapshot files
    Diff(commands::diff::DiffArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Check(args) => commands::check::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
