//! Analyze command - inspect a position from a diagram file
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_board(), analyze()
//! - Level 4: text report

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use kingrow_core::{
    evaluate, Board, Difficulty, Move, Player, SearchConfig, SearchEngine, SearchStats,
};

use crate::display::render_board;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Side {
    White,
    Black,
}

impl From<Side> for Player {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Player::White,
            Side::Black => Player::Black,
        }
    }
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Board diagram file (8 lines of . w W b B)
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Side to move
    #[arg(long, value_enum, default_value = "black")]
    pub side: Side,

    /// Search difficulty used for scoring
    #[arg(long, default_value = "hard")]
    pub difficulty: Difficulty,
}

/// Everything the report prints
#[derive(Clone, Debug)]
pub struct Analysis {
    pub evaluation: i32,
    pub side: Player,
    /// Move scores from the side to move's perspective
    pub scored_moves: Vec<(Move, i32)>,
    pub best_move: Option<Move>,
    pub stats: SearchStats,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: AnalyzeArgs, seed: Option<u64>) -> Result<()> {
    let board = load_board(&args.board)?;
    let side = Player::from(args.side);

    tracing::info!("Analyzing {} for {} at {}", args.board.display(), side, args.difficulty);

    let analysis = analyze(&board, side, args.difficulty, seed.unwrap_or(42));
    print_report(&board, &analysis);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

pub fn load_board(path: &Path) -> Result<Board> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file: {}", path.display()))?;
    Board::from_diagram(&text).with_context(|| format!("Failed to parse board file: {}", path.display()))
}

/// Score all moves once and pick one. Scores are unjittered; the choice
/// applies the tier's jitter to them.
pub fn analyze(board: &Board, side: Player, difficulty: Difficulty, seed: u64) -> Analysis {
    let mut engine = SearchEngine::new(SearchConfig::new(difficulty).with_seed(seed));

    let scored_moves = engine.score_moves(board, side);
    let best_move = engine.choose_from_scored(&scored_moves, side);

    Analysis {
        evaluation: evaluate(board),
        side,
        scored_moves,
        best_move,
        stats: engine.stats(),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_report(board: &Board, analysis: &Analysis) {
    println!("{}", render_board(board));
    println!("Static evaluation (Black's view): {:+}", analysis.evaluation);
    println!(
        "Material: White {} / Black {}",
        board.piece_count(Player::White),
        board.piece_count(Player::Black)
    );

    println!("\nMoves for {}:", analysis.side);
    if analysis.scored_moves.is_empty() {
        println!("  (none - {} loses the round)", analysis.side);
    }
    for (mv, score) in &analysis.scored_moves {
        println!("  {:+6}  {}", score, mv);
    }

    match analysis.best_move {
        Some(mv) => println!("\nEngine choice: {}", mv),
        None => println!("\nEngine choice: none"),
    }
    println!(
        "Searched {} nodes, {} cutoffs{}",
        analysis.stats.nodes,
        analysis.stats.cutoffs,
        if analysis.stats.budget_exhausted { " (node budget exhausted)" } else { "" }
    );
}
