//! KINGROW CLI - Command-line interface
//!
//! Commands:
//! - play: Interactive match against the AI
//! - selfplay: AI vs AI matches
//! - analyze: Inspect a position from a diagram file

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kingrow_cli::{analyze_cmd, play_cmd, selfplay_cmd};

#[derive(Parser)]
#[command(name = "kingrow")]
#[command(about = "KINGROW draughts engine")]
struct Cli {
    /// Random seed for reproducible AI play
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a heart match against the AI
    Play(play_cmd::PlayArgs),
    /// Run AI vs AI matches
    Selfplay(selfplay_cmd::SelfPlayArgs),
    /// Evaluate a position and show the engine's choice
    Analyze(analyze_cmd::AnalyzeArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Selfplay(args) => selfplay_cmd::run(args, cli.seed),
        Commands::Analyze(args) => analyze_cmd::run(args, cli.seed),
    }
}
