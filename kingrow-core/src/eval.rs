//! Position evaluation

use crate::board::{Board, Player, Rank};
use serde::{Deserialize, Serialize};

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Value of an uncrowned piece
    pub man_value: i32,
    /// Value of a king
    pub king_value: i32,
    /// Weight for mobility (legal move count difference)
    pub mobility_weight: i32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            man_value: 10,
            king_value: 15,
            mobility_weight: 2,
        }
    }
}

/// Evaluate position from Black's (the AI's) perspective.
/// Positive favors Black.
pub fn evaluate(board: &Board) -> i32 {
    evaluate_with(board, &Heuristics::default())
}

/// Evaluate with custom weights
pub fn evaluate_with(board: &Board, heuristics: &Heuristics) -> i32 {
    let mut score = 0;

    // Material
    for (_, piece) in board.pieces() {
        let value = match piece.rank {
            Rank::Man => heuristics.man_value,
            Rank::King => heuristics.king_value,
        };
        match piece.owner {
            Player::Black => score += value,
            Player::White => score -= value,
        }
    }

    // Mobility
    if heuristics.mobility_weight != 0 {
        let black_mobility = board.mobility(Player::Black) as i32;
        let white_mobility = board.mobility(Player::White) as i32;
        score += heuristics.mobility_weight * (black_mobility - white_mobility);
    }

    score
}
