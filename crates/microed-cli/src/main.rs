mod commands;
mod progress;
mod summary;

use clap::{Parser, Subcommand};
use console::style;
use microed_core::error::MicroedError;
use microed_core::safe_exit::{ExitStatus, SafeExit};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "microed", about = "MicroED tilt-series planning and drift correction")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Align a drift-affected image series and save the corrected stack
    Align(commands::align::AlignArgs),
    /// Derive the acquisition parameters of a tilt series
    Plan(commands::plan::PlanArgs),
    /// Show stack metadata
    Info(commands::info::InfoArgs),
    /// Print or save a default pipeline config
    Config(commands::config::ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // No hardware is driven from the command line; the context still owns
    // the exit path so status codes follow the shared contract.
    let mut exit = SafeExit::without_microscope();

    let result = match &cli.command {
        Commands::Align(args) => commands::align::run(args, &mut exit),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config(args) => commands::config::run(args),
    };

    let status = match &result {
        Ok(()) => ExitStatus::Success,
        Err(e) if matches!(e.downcast_ref::<MicroedError>(), Some(MicroedError::Cancelled)) => {
            ExitStatus::EarlyExit
        }
        Err(e) => {
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            ExitStatus::Failure
        }
    };
    exit.exit(status)
}
