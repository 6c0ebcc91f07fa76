use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pageglide_core::AppConfig;

mod commands;

use commands::simulate::SimulateArgs;

#[derive(Parser)]
#[command(name = "pageglide")]
#[command(author, version, about = "Headless smooth-scroll and page-motion toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the structure of a captured page
    Inspect {
        /// Page snapshot (JSON)
        file: PathBuf,
    },
    /// Run the scroll engine against a page and trace each frame
    Simulate(SimulateArgs),
    /// Write a demo page snapshot to play with
    Demo {
        /// Where to write the snapshot
        #[arg(short, long, default_value = "demo-page.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Inspect { file } => commands::inspect::run(&file),
        Commands::Simulate(args) => commands::simulate::run(&config, args).await,
        Commands::Demo { output } => commands::demo::run(&output),
    }
}
