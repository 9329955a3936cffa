//! Fairway CLI - golf tour companion in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{auth, demo, score, standings, tour};

/// Fairway - golf tour companion in your terminal
#[derive(Parser)]
#[command(name = "fw", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Golf score calculations
    Score {
        #[command(subcommand)]
        command: score::ScoreCommands,
    },

    /// Manage the signed-in session
    Auth {
        #[command(subcommand)]
        command: auth::AuthCommands,
    },

    /// Show the active tour and countdown
    Tour {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show team standings for the active tour
    Standings {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Score { command } => score::run(command),
        Commands::Auth { command } => auth::run(command).await,
        Commands::Tour { json } => tour::run(json).await,
        Commands::Standings { json } => standings::run(json).await,
        Commands::Demo { command } => demo::run(command),
    }
}
