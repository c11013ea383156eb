//! Self-play command - AI vs AI matches
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_matches(), report_results()
//! - Level 3: play_single_match(), compute_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use kingrow_core::{
    Difficulty, MatchConfig, MatchController, Phase, Player, SearchEngine, TurnOutcome,
};

/// Mixed into the seed so the two sides draw different jitter
const WHITE_SEED_SALT: u64 = 0x5eed_0f_7711e;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Clone)]
pub struct SelfPlayArgs {
    /// Difficulty of the White engine
    #[arg(long, default_value = "medium")]
    pub white: Difficulty,

    /// Difficulty of the Black engine
    #[arg(long, default_value = "medium")]
    pub black: Difficulty,

    /// Number of matches to play
    #[arg(long, default_value = "10")]
    pub matches: usize,

    /// Hearts per side in every match
    #[arg(long, default_value = "3")]
    pub hearts: u8,

    /// Abandon a match when a single round runs this long
    #[arg(long, default_value = "200")]
    pub max_plies: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single match
#[derive(Clone, Debug, Serialize)]
pub struct MatchRecord {
    pub match_number: usize,
    /// None when the round limit was hit
    pub winner: Option<Player>,
    pub rounds: u32,
    pub plies: u32,
    pub white_hearts: u8,
    pub black_hearts: u8,
}

/// Aggregated self-play results
#[derive(Clone, Debug, Serialize)]
pub struct SelfPlayResults {
    pub generated_at: DateTime<Utc>,
    pub white: Difficulty,
    pub black: Difficulty,
    pub white_wins: usize,
    pub black_wins: usize,
    pub unfinished: usize,
    pub avg_rounds: f32,
    pub avg_plies: f32,
    pub matches: Vec<MatchRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run self-play command
///
/// 1. Play all matches in parallel
/// 2. Report results
pub fn run(args: SelfPlayArgs, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Starting self play: White={} vs Black={} ({} matches, {} hearts)",
        args.white,
        args.black,
        args.matches,
        args.hearts
    );

    let results = play_matches(&args, seed.unwrap_or(42), !args.json)?;
    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all matches using rayon; each match owns its controller
pub fn play_matches(args: &SelfPlayArgs, base_seed: u64, show_progress: bool) -> Result<SelfPlayResults> {
    let progress = if show_progress {
        let bar = ProgressBar::new(args.matches as u64);
        bar.set_style(ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} matches",
        )?);
        bar
    } else {
        ProgressBar::hidden()
    };

    let records: Vec<MatchRecord> = (0..args.matches)
        .into_par_iter()
        .map(|i| {
            let record = play_single_match(i + 1, args, base_seed.wrapping_add(i as u64));
            progress.inc(1);
            record
        })
        .collect();

    progress.finish_and_clear();

    for record in &records {
        tracing::info!(
            "Match {}: {} ({} rounds, {} plies)",
            record.match_number,
            winner_label(record.winner),
            record.rounds,
            record.plies
        );
    }

    Ok(compute_statistics(args, records))
}

fn report_results(results: &SelfPlayResults, args: &SelfPlayArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one match. White is driven through the human entry point.
pub fn play_single_match(match_number: usize, args: &SelfPlayArgs, seed: u64) -> MatchRecord {
    let config = MatchConfig::new(args.black)
        .with_hearts(args.hearts)
        .with_seed(seed)
        .with_ai_delay_ms(0);
    let mut controller = MatchController::new(config);
    let mut white = SearchEngine::with_seed(args.white, seed ^ WHITE_SEED_SALT);

    let mut plies = 0;
    let mut winner = None;

    loop {
        let outcome = match controller.phase() {
            Phase::AwaitingHumanMove => match white.choose_move(controller.board(), Player::White) {
                Some(mv) => controller.submit_human_move(mv),
                None => break,
            },
            Phase::AiThinking => controller.step(),
            Phase::RoundOver => {
                controller.next_round();
                continue;
            }
            Phase::MatchOver => break,
        };

        match outcome {
            TurnOutcome::Ignored => break,
            TurnOutcome::MatchWon { winner: w } => {
                plies += 1;
                winner = Some(w);
                break;
            }
            TurnOutcome::Continued | TurnOutcome::RoundWon { .. } => plies += 1,
        }

        if controller.plies_this_round() >= args.max_plies {
            tracing::debug!(
                "Match {} abandoned in round {} after {} plies",
                match_number,
                controller.round_number(),
                controller.plies_this_round()
            );
            break;
        }
    }

    MatchRecord {
        match_number,
        winner,
        rounds: controller.round_number(),
        plies,
        white_hearts: controller.hearts(Player::White),
        black_hearts: controller.hearts(Player::Black),
    }
}

/// Compute aggregate statistics from match records
pub fn compute_statistics(args: &SelfPlayArgs, matches: Vec<MatchRecord>) -> SelfPlayResults {
    let white_wins = matches.iter().filter(|m| m.winner == Some(Player::White)).count();
    let black_wins = matches.iter().filter(|m| m.winner == Some(Player::Black)).count();
    let unfinished = matches.iter().filter(|m| m.winner.is_none()).count();

    let (avg_rounds, avg_plies) = if matches.is_empty() {
        (0.0, 0.0)
    } else {
        let total_rounds: u32 = matches.iter().map(|m| m.rounds).sum();
        let total_plies: u32 = matches.iter().map(|m| m.plies).sum();
        (
            total_rounds as f32 / matches.len() as f32,
            total_plies as f32 / matches.len() as f32,
        )
    };

    SelfPlayResults {
        generated_at: Utc::now(),
        white: args.white,
        black: args.black,
        white_wins,
        black_wins,
        unfinished,
        avg_rounds,
        avg_plies,
        matches,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn winner_label(winner: Option<Player>) -> String {
    match winner {
        Some(player) => format!("{} wins", player),
        None => "unfinished".to_string(),
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn print_text_results(results: &SelfPlayResults) {
    let total = results.matches.len();

    println!("\n=== Self-Play Results ({}) ===", results.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("White ({}) vs Black ({})", results.white, results.black);
    println!("Total matches: {}", total);
    println!("White wins:    {} ({:.1}%)", results.white_wins, percent(results.white_wins, total));
    println!("Black wins:    {} ({:.1}%)", results.black_wins, percent(results.black_wins, total));
    println!("Unfinished:    {} ({:.1}%)", results.unfinished, percent(results.unfinished, total));
    println!("Avg rounds:    {:.1}", results.avg_rounds);
    println!("Avg plies:     {:.1}", results.avg_plies);

    println!("\nMatch details:");
    for record in &results.matches {
        println!(
            "  Match {}: {} in {} rounds (hearts W{} / B{})",
            record.match_number,
            winner_label(record.winner),
            record.rounds,
            record.white_hearts,
            record.black_hearts
        );
    }
}
