//! Morris CLI - Command-line interface
//!
//! Commands:
//! - play: interactive game against the AI
//! - match: AI vs AI series between two difficulty tiers

use clap::{Parser, Subcommand};

mod match_cmd;
mod play_cmd;

#[derive(Parser)]
#[command(name = "morris")]
#[command(about = "Nine men's morris engine and AI")]
struct Cli {
    /// RNG seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive game against the AI
    Play(play_cmd::PlayArgs),
    /// Play an AI vs AI series
    Match(match_cmd::MatchArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
    }
}
