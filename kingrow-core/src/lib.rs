//! KINGROW Core - Draughts engine and AI
//!
//! This crate provides the core game logic for KINGROW:
//! - Board geometry (8x8, dark squares only) and the promotion rule
//! - Legal move generation with single captures
//! - Position evaluation with material and mobility
//! - Minimax AI with alpha-beta pruning and difficulty tiers
//! - Round/heart match controller

pub mod board;
pub mod game;
pub mod eval;
pub mod ai;
pub mod controller;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Piece, Player, Rank, Square, BOARD_SIZE, piece_directions, playable_squares, promote_if_eligible};
pub use game::Move;
pub use eval::{Heuristics, evaluate, evaluate_with};
pub use ai::{SearchEngine, SearchStats, WIN_VALUE, choose_ai_move};
pub use controller::{MatchController, MatchObserver, MatchStatus, Phase, TurnOutcome};
pub use config::{Difficulty, MatchConfig, SearchConfig};
pub use error::{Error, Result};
