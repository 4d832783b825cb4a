//! CLI frontend for the Burning Wheel style test roller.

mod commands;
mod prompt;
mod store;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bw",
    about = "Roll Burning Wheel style tests and track advancement",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log dice pools and bookkeeping to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample character file
    Init {
        /// Character file to create
        file: PathBuf,

        /// Character name
        name: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show a character's traits and advancement logs
    Show {
        /// Character file
        file: PathBuf,

        /// Rules table (TOML)
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Roll a test and record it on the character
    Roll(commands::roll::RollArgs),
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init { file, name, force } => commands::init::run(&file, &name, force),
        Commands::Show { file, rules } => commands::show::run(&file, rules.as_deref()),
        Commands::Roll(args) => commands::roll::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
