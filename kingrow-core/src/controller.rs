//! Round/heart match state machine
//!
//! White is the human side and always opens a round; Black is driven by the
//! search engine through [`MatchController::step`]. Each lost round costs the
//! loser one heart and the match ends when a side runs out.

use crate::ai::{SearchEngine, SearchStats};
use crate::board::{Board, Player};
use crate::config::MatchConfig;
use crate::game::Move;

// ============================================================================
// CORE TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchStatus {
    InRound,
    /// Only observable with `auto_next_round` disabled
    RoundOver { winner: Player },
    MatchOver { winner: Player },
}

/// What the host should be doing right now
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingHumanMove,
    AiThinking,
    RoundOver,
    MatchOver,
}

/// Result of a move request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Request was not legal in the current state; nothing changed
    Ignored,
    /// Move applied, the round goes on
    Continued,
    RoundWon { winner: Player },
    MatchWon { winner: Player },
}

/// Round and match notifications, e.g. for a persistence layer
pub trait MatchObserver: Send {
    fn on_round_end(&mut self, _winner: Player, _loser_hearts_remaining: u8) {}
    fn on_match_end(&mut self, _winner: Player) {}
}

// ============================================================================
// MATCH CONTROLLER
// ============================================================================

/// Single owner of the current board and match state
pub struct MatchController {
    board: Board,
    hearts: [u8; 2],
    side_to_move: Player,
    status: MatchStatus,
    round: u32,
    plies: u32,
    config: MatchConfig,
    engine: SearchEngine,
    observers: Vec<Box<dyn MatchObserver>>,
}

impl MatchController {
    /// Start a match with a fresh board
    pub fn new(config: MatchConfig) -> Self {
        Self::from_position(config, Board::new(), Player::White)
    }

    /// Start a match from an arbitrary position. Later rounds use the
    /// standard opening.
    pub fn from_position(config: MatchConfig, board: Board, side_to_move: Player) -> Self {
        let engine = SearchEngine::new(config.search.clone());
        let hearts = [config.starting_hearts; 2];
        Self {
            board,
            hearts,
            side_to_move,
            status: MatchStatus::InRound,
            round: 1,
            plies: 0,
            config,
            engine,
            observers: Vec::new(),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hearts(&self, player: Player) -> u8 {
        self.hearts[player as usize]
    }

    pub fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn phase(&self) -> Phase {
        match self.status {
            MatchStatus::InRound => match self.side_to_move {
                Player::White => Phase::AwaitingHumanMove,
                Player::Black => Phase::AiThinking,
            },
            MatchStatus::RoundOver { .. } => Phase::RoundOver,
            MatchStatus::MatchOver { .. } => Phase::MatchOver,
        }
    }

    /// 1-based round counter
    pub fn round_number(&self) -> u32 {
        self.round
    }

    /// Plies played in the current round
    pub fn plies_this_round(&self) -> u32 {
        self.plies
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Stats from the AI's last search
    pub fn engine_stats(&self) -> SearchStats {
        self.engine.stats()
    }

    /// Legal moves for the human side, empty when it is not their turn
    pub fn human_moves(&self) -> Vec<Move> {
        if self.phase() == Phase::AwaitingHumanMove {
            self.board.legal_moves(Player::White)
        } else {
            Vec::new()
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn MatchObserver>) {
        self.observers.push(observer);
    }

    // ========================================================================
    // TURNS
    // ========================================================================

    /// Apply a human (White) move. Moves that are not legal right now are
    /// ignored and leave every piece of state untouched.
    pub fn submit_human_move(&mut self, mv: Move) -> TurnOutcome {
        if self.phase() != Phase::AwaitingHumanMove {
            tracing::debug!("Ignoring human move {} in phase {:?}", mv, self.phase());
            return TurnOutcome::Ignored;
        }
        if !self.board.legal_moves(Player::White).contains(&mv) {
            tracing::debug!("Ignoring illegal human move {}", mv);
            return TurnOutcome::Ignored;
        }

        self.play(Player::White, mv)
    }

    /// Run the AI (Black) turn. Blocks for the duration of the search.
    pub fn step(&mut self) -> TurnOutcome {
        if self.phase() != Phase::AiThinking {
            return TurnOutcome::Ignored;
        }

        match self.engine.choose_move(&self.board, Player::Black) {
            Some(mv) => self.play(Player::Black, mv),
            None => {
                tracing::debug!("Black has no legal moves");
                self.finish_round(Player::White)
            }
        }
    }

    /// Leave the round-over state. Returns false if there was nothing to do.
    pub fn next_round(&mut self) -> bool {
        if !matches!(self.status, MatchStatus::RoundOver { .. }) {
            return false;
        }
        self.start_round();
        true
    }

    fn play(&mut self, mover: Player, mv: Move) -> TurnOutcome {
        self.board = self.board.apply_move(mv);
        self.plies += 1;

        match round_winner(&self.board, mover) {
            Some(winner) => self.finish_round(winner),
            None => {
                self.side_to_move = mover.opponent();
                TurnOutcome::Continued
            }
        }
    }

    // ========================================================================
    // ROUND / MATCH END
    // ========================================================================

    fn finish_round(&mut self, winner: Player) -> TurnOutcome {
        let loser = winner.opponent();
        let remaining = self.hearts[loser as usize].saturating_sub(1);
        self.hearts[loser as usize] = remaining;

        tracing::debug!(
            "Round {} won by {} after {} plies; {} has {} hearts left",
            self.round,
            winner,
            self.plies,
            loser,
            remaining
        );

        for observer in &mut self.observers {
            observer.on_round_end(winner, remaining);
        }

        if remaining == 0 {
            self.status = MatchStatus::MatchOver { winner };
            tracing::debug!("Match won by {} in {} rounds", winner, self.round);
            for observer in &mut self.observers {
                observer.on_match_end(winner);
            }
            return TurnOutcome::MatchWon { winner };
        }

        self.status = MatchStatus::RoundOver { winner };
        if self.config.auto_next_round {
            self.start_round();
        }
        TurnOutcome::RoundWon { winner }
    }

    fn start_round(&mut self) {
        self.board = Board::new();
        self.side_to_move = Player::White;
        self.status = MatchStatus::InRound;
        self.round += 1;
        self.plies = 0;
    }
}

/// Decide the round after `mover` has moved. The opponent loses if it has
/// no pieces or no moves; otherwise the mover loses if it is itself stuck.
///
/// The opponent check comes first: a mover that takes the last opposing
/// piece (or blocks the last opposing move) wins even if it is left
/// without a move of its own.
pub fn round_winner(board: &Board, mover: Player) -> Option<Player> {
    let opponent = mover.opponent();
    if board.piece_count(opponent) == 0 || !board.has_moves(opponent) {
        Some(mover)
    } else if !board.has_moves(mover) {
        Some(opponent)
    } else {
        None
    }
}

// ============================================================================
// TESTS
// ============================================================================
