//! plasmamem CLI: drug-likeness flashcards in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "plasmamem", version, about = "Drug-likeness flashcard quiz")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive quiz session
    Play {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Compound id pool (JSON array), overrides the config
        #[arg(long)]
        pool: Option<PathBuf>,

        /// Seed for reproducible compound picks
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Assemble one round and print its answers
    Inspect {
        /// Compound id to assemble; sampled from the pool when omitted
        #[arg(long)]
        cid: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Compound id pool (JSON array), overrides the config
        #[arg(long)]
        pool: Option<PathBuf>,

        /// Seed for the pool draw
        #[arg(long)]
        seed: Option<u64>,

        /// Print the round as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the Lipinski and Veber thresholds
    Rules,

    /// Create a starter config, pool and offline fixture
    Init,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("plasmamem=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play { config, pool, seed } => commands::play::execute(config, pool, seed).await,
        Commands::Inspect {
            cid,
            config,
            pool,
            seed,
            json,
        } => commands::inspect::execute(cid, config, pool, seed, json).await,
        Commands::Rules => commands::rules::execute(),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
