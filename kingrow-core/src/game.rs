//! Move generation and move application

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{piece_directions, promote_if_eligible, Board, Player, Square};

// ============================================================================
// CORE TYPES
// ============================================================================

/// A legal move. A capture ends the turn; there are no multi-jump chains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Step { from: Square, to: Square },
    Capture { from: Square, to: Square, captured: Square },
}

impl Move {
    pub fn from(&self) -> Square {
        match *self {
            Move::Step { from, .. } | Move::Capture { from, .. } => from,
        }
    }

    pub fn to(&self) -> Square {
        match *self {
            Move::Step { to, .. } | Move::Capture { to, .. } => to,
        }
    }

    /// Square of the jumped piece, if any
    pub fn captured(&self) -> Option<Square> {
        match *self {
            Move::Step { .. } => None,
            Move::Capture { captured, .. } => Some(captured),
        }
    }

    pub fn is_capture(&self) -> bool {
        matches!(self, Move::Capture { .. })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Step { from, to } => write!(f, "{} -> {}", from, to),
            Move::Capture { from, to, captured } => {
                write!(f, "{} x {} (takes {})", from, to, captured)
            }
        }
    }
}

// ============================================================================
// MOVE GENERATION
// ============================================================================

impl Board {
    /// Generate all legal moves for `player`, ordered by piece (row, then
    /// column) and then by direction.
    pub fn legal_moves(&self, player: Player) -> Vec<Move> {
        let mut moves = Vec::new();
        for (from, piece) in self.pieces() {
            if piece.owner != player {
                continue;
            }
            self.generate_piece_moves(from, player, piece_directions(piece.rank, player), &mut moves);
        }
        moves
    }

    fn generate_piece_moves(
        &self,
        from: Square,
        player: Player,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &dir in directions {
            let adjacent = from.offset(dir);
            if !adjacent.is_valid() {
                continue;
            }

            match self.get(adjacent) {
                None => moves.push(Move::Step { from, to: adjacent }),
                Some(occupant) if occupant.owner != player => {
                    let landing = adjacent.offset(dir);
                    if landing.is_valid() && self.get(landing).is_none() {
                        moves.push(Move::Capture { from, to: landing, captured: adjacent });
                    }
                }
                Some(_) => {} // Blocked by own piece
            }
        }
    }

    /// Count legal moves for a player (mobility heuristic)
    pub fn mobility(&self, player: Player) -> usize {
        self.legal_moves(player).len()
    }

    /// Whether `player` has at least one legal move
    pub fn has_moves(&self, player: Player) -> bool {
        self.pieces().any(|(from, piece)| {
            if piece.owner != player {
                return false;
            }
            let mut moves = Vec::new();
            self.generate_piece_moves(from, player, piece_directions(piece.rank, player), &mut moves);
            !moves.is_empty()
        })
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Apply move, return new board
    pub fn apply_move(&self, mv: Move) -> Self {
        let mut next = *self;
        next.apply_move_internal(mv);
        next
    }

    fn apply_move_internal(&mut self, mv: Move) {
        let from = mv.from();
        let to = mv.to();

        let piece = self
            .get(from)
            .unwrap_or_else(|| panic!("no piece at {} for move {}", from, mv));
        assert!(self.get(to).is_none(), "destination {} is occupied for move {}", to, mv);

        if let Some(captured) = mv.captured() {
            let victim = self.get(captured);
            assert!(
                victim.is_some_and(|v| v.owner != piece.owner),
                "no opposing piece to capture at {}",
                captured
            );
            self.set(captured, None);
        }

        self.set(from, None);
        self.set(to, Some(promote_if_eligible(piece, to.row)));
    }
}

// ============================================================================
// TESTS
// ============================================================================
