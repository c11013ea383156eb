//! Play command - interactive match against the AI
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_match()
//! - Level 3: human_turn(), ai_turn()
//! - Level 4: console observer, outcome formatting

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use kingrow_core::{
    Difficulty, MatchConfig, MatchController, MatchObserver, Phase, Player, TurnOutcome,
};

use crate::display::{parse_move, render_board, render_moves};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// AI difficulty: easy, medium or hard
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Hearts per side
    #[arg(long)]
    pub hearts: Option<u8>,

    /// Pause before the AI moves, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Match config JSON file (flags override its values)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

type InputLines = Lines<BufReader<Stdin>>;

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the match config from file and flags
/// 2. Play the match on a tokio runtime so the AI pause never blocks input
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed)?;

    tracing::info!(
        "Starting match: difficulty={}, hearts={}, delay={}ms",
        config.search.difficulty,
        config.starting_hearts,
        config.ai_delay_ms
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(play_match(config))
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Merge config file and command-line overrides
pub fn build_config(args: &PlayArgs, seed: Option<u64>) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)
            .with_context(|| format!("Failed to load match config: {}", path.display()))?,
        None => MatchConfig::default(),
    };

    if let Some(difficulty) = args.difficulty {
        config.search.difficulty = difficulty;
    }
    if let Some(hearts) = args.hearts {
        config.starting_hearts = hearts;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.ai_delay_ms = delay_ms;
    }
    if let Some(seed) = seed {
        config.search.seed = Some(seed);
    }

    anyhow::ensure!(config.starting_hearts > 0, "A match needs at least one heart per side");
    Ok(config)
}

async fn play_match(config: MatchConfig) -> Result<()> {
    let delay = Duration::from_millis(config.ai_delay_ms);
    let mut controller = MatchController::new(config);
    controller.subscribe(Box::new(ConsoleObserver));

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("You play White (w) from the bottom. Enter a move number or 'r,c r,c'; 'q' quits.");

    loop {
        match controller.phase() {
            Phase::AwaitingHumanMove => {
                if !human_turn(&mut controller, &mut input).await? {
                    println!("Match abandoned.");
                    return Ok(());
                }
            }
            Phase::AiThinking => {
                controller = ai_turn(controller, delay).await?;
            }
            Phase::RoundOver => {
                controller.next_round();
            }
            Phase::MatchOver => {
                println!("{}", render_board(controller.board()));
                return Ok(());
            }
        }
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Prompt until a legal move is entered. Returns false on quit or EOF.
async fn human_turn(controller: &mut MatchController, input: &mut InputLines) -> Result<bool> {
    println!(
        "\nRound {} | hearts: White {} / Black {}",
        controller.round_number(),
        controller.hearts(Player::White),
        controller.hearts(Player::Black)
    );
    println!("{}", render_board(controller.board()));

    let moves = controller.human_moves();
    print!("{}", render_moves(&moves));

    loop {
        let line = match input.next_line().await.context("Failed to read move")? {
            Some(line) => line,
            None => return Ok(false),
        };
        if matches!(line.trim(), "q" | "quit") {
            return Ok(false);
        }

        let outcome = match parse_move(&line, &moves) {
            Some(mv) => controller.submit_human_move(mv),
            None => TurnOutcome::Ignored,
        };

        match outcome {
            TurnOutcome::Ignored => println!("Not a legal move, try again."),
            other => {
                report_outcome(Player::White, other);
                return Ok(true);
            }
        }
    }
}

/// Pause, then search on a blocking thread. No cancellation: a started
/// search always finishes.
async fn ai_turn(mut controller: MatchController, delay: Duration) -> Result<MatchController> {
    println!("Black is thinking...");
    tokio::time::sleep(delay).await;

    let (controller, outcome) = tokio::task::spawn_blocking(move || {
        let outcome = controller.step();
        (controller, outcome)
    })
    .await
    .context("AI search task failed")?;

    let stats = controller.engine_stats();
    tracing::debug!("AI searched {} nodes ({} cutoffs)", stats.nodes, stats.cutoffs);

    report_outcome(Player::Black, outcome);
    Ok(controller)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

struct ConsoleObserver;

impl MatchObserver for ConsoleObserver {
    fn on_round_end(&mut self, winner: Player, loser_hearts_remaining: u8) {
        println!(
            "\n*** {} wins the round! {} has {} heart(s) left. ***",
            winner,
            winner.opponent(),
            loser_hearts_remaining
        );
    }

    fn on_match_end(&mut self, winner: Player) {
        let verdict = match winner {
            Player::White => "You win the match!",
            Player::Black => "The AI wins the match.",
        };
        println!("\n*** {} ***", verdict);
    }
}

fn report_outcome(mover: Player, outcome: TurnOutcome) {
    if outcome == TurnOutcome::Continued && mover == Player::Black {
        println!("Black has moved.");
    }
}
