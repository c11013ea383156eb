//! CPU-based minimax AI with alpha-beta pruning

use crate::board::{Board, Player};
use crate::config::{Difficulty, SearchConfig};
use crate::eval::evaluate_with;
use crate::game::Move;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Score for a side left without moves (Black's perspective)
pub const WIN_VALUE: i32 = 1000;

/// Window bounds for a fresh search
const NEG_INF: i32 = i32::MIN;
const POS_INF: i32 = i32::MAX;

// ============================================================================
// SEARCH ENGINE
// ============================================================================

/// Counters from the most recent search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
    pub budget_exhausted: bool,
}

/// Minimax AI player. Scores are always from Black's perspective: Black is
/// the maximizing side, White the minimizing side.
pub struct SearchEngine {
    config: SearchConfig,
    rng: ChaCha8Rng,
    stats: SearchStats,
}

impl SearchEngine {
    /// Create an engine; an unset seed draws a random one
    pub fn new(config: SearchConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            stats: SearchStats::default(),
        }
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::new(SearchConfig::new(difficulty).with_seed(seed))
    }

    /// Restart the jitter sequence
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Counters from the last call to `choose_move` or `score_moves`
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Pick a move for `player`, or None if it has no legal moves
    pub fn choose_move(&mut self, board: &Board, player: Player) -> Option<Move> {
        let scored = self.score_moves(board, player);
        self.choose_from_scored(&scored, player)
    }

    /// Largest noise added to a root score: a fraction of one man's value
    pub fn jitter_amplitude(&self) -> f32 {
        self.config.difficulty.jitter_fraction() * self.config.heuristics.man_value as f32
    }

    /// Apply root jitter to scores from [`score_moves`](Self::score_moves)
    /// and pick the best. Ties keep the earliest move.
    pub fn choose_from_scored(&mut self, scored: &[(Move, i32)], player: Player) -> Option<Move> {
        let (first, _) = *scored.first()?;
        let amplitude = self.jitter_amplitude();

        let mut best_move = first;
        let mut best_score = f32::NEG_INFINITY;

        for &(mv, score) in scored {
            let noise = if amplitude > 0.0 {
                self.rng.gen_range(-amplitude..=amplitude)
            } else {
                0.0
            };
            let score = score as f32 + noise;

            // Strict comparison keeps the first of equal moves
            if score > best_score {
                best_score = score;
                best_move = mv;
            }
        }

        tracing::debug!(
            "{} ({}) chose {} after {} nodes, {} cutoffs{}",
            player,
            self.config.difficulty,
            best_move,
            self.stats.nodes,
            self.stats.cutoffs,
            if self.stats.budget_exhausted { ", budget exhausted" } else { "" }
        );

        Some(best_move)
    }

    /// Score every legal move for `player` at the configured depth, from
    /// that player's perspective, in move generation order.
    pub fn score_moves(&mut self, board: &Board, player: Player) -> Vec<(Move, i32)> {
        self.stats = SearchStats::default();

        let depth = self.config.difficulty.depth();
        let child_maximizing = player == Player::White;

        board
            .legal_moves(player)
            .into_iter()
            .map(|mv| {
                let child = board.apply_move(mv);
                let value = self.minimax(&child, depth - 1, child_maximizing, NEG_INF, POS_INF);
                let score = match player {
                    Player::Black => value,
                    Player::White => -value,
                };
                (mv, score)
            })
            .collect()
    }

    /// Alpha-beta minimax. Black maximizes.
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.stats.nodes += 1;

        if depth == 0 {
            return evaluate_with(board, &self.config.heuristics);
        }

        if let Some(budget) = self.config.node_budget {
            if self.stats.nodes > budget {
                self.stats.budget_exhausted = true;
                return evaluate_with(board, &self.config.heuristics);
            }
        }

        let player = if maximizing { Player::Black } else { Player::White };
        let moves = board.legal_moves(player);

        if moves.is_empty() {
            return if maximizing { -WIN_VALUE } else { WIN_VALUE };
        }

        if maximizing {
            let mut best = NEG_INF;
            for mv in moves {
                let child = board.apply_move(mv);
                let score = self.minimax(&child, depth - 1, false, alpha, beta);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            best
        } else {
            let mut best = POS_INF;
            for mv in moves {
                let child = board.apply_move(mv);
                let score = self.minimax(&child, depth - 1, true, alpha, beta);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            best
        }
    }
}

/// Choose Black's move with a freshly seeded engine
pub fn choose_ai_move(board: &Board, difficulty: Difficulty) -> Option<Move> {
    SearchEngine::new(SearchConfig::new(difficulty)).choose_move(board, Player::Black)
}

// ============================================================================
// TESTS
// ============================================================================
