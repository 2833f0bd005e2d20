//! QMK Catalog - keyboard layout catalog generator
//!
//! Walks a QMK firmware checkout, extracts layout macros from keyboard headers,
//! overlays info.json overrides, and writes one JSON descriptor per keyboard
//! plus an aggregate catalog.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qmk_catalog::cli::{BuildArgs, CliResult, InspectArgs, ListKeyboardsArgs};

/// QMK Catalog - keyboard layout catalog generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and publish the catalog for every keyboard
    Build(BuildArgs),
    /// List the keyboards a build would process
    ListKeyboards(ListKeyboardsArgs),
    /// Show the descriptor for one keyboard
    Inspect(InspectArgs),
}

impl Command {
    fn execute(&self) -> CliResult<()> {
        match self {
            Command::Build(args) => args.execute(),
            Command::ListKeyboards(args) => args.execute(),
            Command::Inspect(args) => args.execute(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays parseable
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = cli.command.execute() {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
