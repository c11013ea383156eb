//! Board geometry, pieces and the promotion rule

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Board width and height
pub const BOARD_SIZE: i8 = 8;

/// Rows filled with men for each side at round start
const STARTING_ROWS: i8 = 3;

/// Diagonal direction vectors (d_row, d_col)
/// Index: 0=NW, 1=NE, 2=SW, 3=SE
pub const DIRECTIONS: [(i8, i8); 4] = [
    (-1, -1), // NW
    (-1, 1),  // NE
    (1, -1),  // SW
    (1, 1),   // SE
];

const NORTH_DIRS: &[(i8, i8)] = &[DIRECTIONS[0], DIRECTIONS[1]];
const SOUTH_DIRS: &[(i8, i8)] = &[DIRECTIONS[2], DIRECTIONS[3]];
const ALL_DIRS: &[(i8, i8)] = &DIRECTIONS;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Side to move. White (side A, the human) starts at the bottom and moves
/// first; Black (side B, the AI) starts at the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Row a man of this side must reach to be crowned
    pub fn promotion_row(self) -> i8 {
        match self {
            Player::White => 0,
            Player::Black => BOARD_SIZE - 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Man,
    King,
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub owner: Player,
    pub rank: Rank,
}

impl Piece {
    pub const fn man(owner: Player) -> Self {
        Self { owner, rank: Rank::Man }
    }

    pub const fn king(owner: Player) -> Self {
        Self { owner, rank: Rank::King }
    }

    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }

    fn glyph(&self) -> char {
        match (self.owner, self.rank) {
            (Player::White, Rank::Man) => 'w',
            (Player::White, Rank::King) => 'W',
            (Player::Black, Rank::Man) => 'b',
            (Player::Black, Rank::King) => 'B',
        }
    }

    fn from_glyph(c: char) -> Option<Self> {
        match c {
            'w' => Some(Piece::man(Player::White)),
            'W' => Some(Piece::king(Player::White)),
            'b' => Some(Piece::man(Player::Black)),
            'B' => Some(Piece::king(Player::Black)),
            _ => None,
        }
    }
}

/// Board coordinate, row 0 at the top
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: i8,
    pub col: i8,
}

impl Square {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this square is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// Only dark squares ((row + col) odd) ever hold pieces
    pub fn is_playable(&self) -> bool {
        self.is_valid() && (self.row + self.col) % 2 == 1
    }

    /// Step once along a direction vector
    pub fn offset(&self, (dr, dc): (i8, i8)) -> Square {
        Square::new(self.row + dr, self.col + dc)
    }

    fn index(&self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Directions a piece may move or capture in
pub fn piece_directions(rank: Rank, owner: Player) -> &'static [(i8, i8)] {
    match (rank, owner) {
        (Rank::King, _) => ALL_DIRS,
        (Rank::Man, Player::White) => NORTH_DIRS,
        (Rank::Man, Player::Black) => SOUTH_DIRS,
    }
}

/// Crown a man that lands on the opponent's back rank
pub fn promote_if_eligible(piece: Piece, landing_row: i8) -> Piece {
    if piece.rank == Rank::Man && landing_row == piece.owner.promotion_row() {
        Piece::king(piece.owner)
    } else {
        piece
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// 8x8 draughts board (copy to mutate)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Piece>; 64],
}

impl Board {
    /// Starting position: Black men on rows 0-2, White men on rows 5-7
    pub fn new() -> Self {
        let mut board = Self::empty();
        for sq in playable_squares() {
            if sq.row < STARTING_ROWS {
                board.set(sq, Some(Piece::man(Player::Black)));
            } else if sq.row >= BOARD_SIZE - STARTING_ROWS {
                board.set(sq, Some(Piece::man(Player::White)));
            }
        }
        board
    }

    /// Board with no pieces
    pub fn empty() -> Self {
        Self { cells: [None; 64] }
    }

    /// Get piece at square
    pub fn get(&self, sq: Square) -> Option<Piece> {
        assert!(sq.is_valid(), "square {} is off the board", sq);
        self.cells[sq.index()]
    }

    /// Place or clear a piece. Panics on light squares.
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        assert!(
            sq.is_playable() || piece.is_none(),
            "square {} cannot hold a piece",
            sq
        );
        self.cells[sq.index()] = piece;
    }

    /// Iterate pieces by ascending row, then column
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        playable_squares().filter_map(move |sq| self.cells[sq.index()].map(|p| (sq, p)))
    }

    pub fn piece_count(&self, player: Player) -> usize {
        self.pieces().filter(|(_, p)| p.owner == player).count()
    }

    /// Parse an 8-line diagram: `.` empty, `w`/`W` White man/king,
    /// `b`/`B` Black man/king. Spaces are ignored.
    pub fn from_diagram(text: &str) -> Result<Self> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        if rows.len() != BOARD_SIZE as usize {
            return Err(Error::MalformedDiagram {
                line: rows.len(),
                reason: format!("expected {} rows, found {}", BOARD_SIZE, rows.len()),
            });
        }

        let mut board = Self::empty();
        for (r, row) in rows.iter().enumerate() {
            if row.len() != BOARD_SIZE as usize {
                return Err(Error::MalformedDiagram {
                    line: r + 1,
                    reason: format!("expected {} columns, found {}", BOARD_SIZE, row.len()),
                });
            }
            for (c, &glyph) in row.iter().enumerate() {
                if glyph == '.' {
                    continue;
                }
                let piece = Piece::from_glyph(glyph).ok_or_else(|| Error::MalformedDiagram {
                    line: r + 1,
                    reason: format!("unknown glyph '{}'", glyph),
                })?;
                let sq = Square::new(r as i8, c as i8);
                if !sq.is_playable() {
                    return Err(Error::MalformedDiagram {
                        line: r + 1,
                        reason: format!("piece on light square {}", sq),
                    });
                }
                if promote_if_eligible(piece, sq.row) != piece {
                    return Err(Error::MalformedDiagram {
                        line: r + 1,
                        reason: format!("uncrowned {} man on promotion row at {}", piece.owner, sq),
                    });
                }
                board.set(sq, Some(piece));
            }
        }

        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            let line: String = (0..BOARD_SIZE)
                .map(|col| {
                    self.cells[Square::new(row, col).index()]
                        .map_or('.', |p| p.glyph())
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\n{})", self)
    }
}

/// All dark squares in row-major order
pub fn playable_squares() -> impl Iterator<Item = Square> {
    (0..BOARD_SIZE)
        .flat_map(|row| (0..BOARD_SIZE).map(move |col| Square::new(row, col)))
        .filter(|sq| sq.is_playable())
}
