//! stepmark command-line interface.
//!
//! Runs registered benchmarks, generates cached initial configurations, and
//! reports host capabilities. Library errors surface here with their cause
//! chain and a triage-friendly exit code.

use std::process;

use clap::{Parser, Subcommand};
use console::style;

mod commands;
mod exit;
mod output;
mod report;

use commands::{GenerateCommand, RunCommand};

/// Throughput benchmarks for steppable particle simulations
#[derive(Parser)]
#[command(name = "stepmark")]
#[command(about = "Throughput benchmarks for steppable particle simulations")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more benchmarks
    Run(RunCommand),

    /// Generate (or locate) a cached initial configuration
    #[command(alias = "gen")]
    Generate(GenerateCommand),

    /// List the registered benchmark kinds
    List,

    /// Show host capabilities and cache state
    Info,
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(cmd) => cmd.execute(cli.verbose > 0),
        Commands::Generate(cmd) => cmd.execute(),
        Commands::List => commands::list::execute(),
        Commands::Info => commands::info::execute(),
    };

    match result {
        Ok(()) => exit::EXIT_SUCCESS,
        Err(err) => {
            report_error(&err);
            exit::exit_code_for(&err)
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the verbosity flag.
fn setup_logging(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn report_error(err: &anyhow::Error) {
    eprintln!("{} {err}", style("error:").red().bold());
    for cause in err.chain().skip(1) {
        eprintln!("  {} {cause}", style("caused by:").dim());
    }
}
