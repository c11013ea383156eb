//! Terminal rendering and move input parsing shared by the commands

use kingrow_core::{Board, Move, Square, BOARD_SIZE};

/// Board diagram with row and column labels
pub fn render_board(board: &Board) -> String {
    let mut out = String::from("   ");
    for col in 0..BOARD_SIZE {
        out.push_str(&format!(" {}", col));
    }
    out.push('\n');

    for (row, line) in board.to_string().lines().enumerate() {
        out.push_str(&format!(" {} ", row));
        for glyph in line.chars() {
            out.push(' ');
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// Numbered list of moves, one per line
pub fn render_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .enumerate()
        .map(|(i, mv)| format!("  [{}] {}\n", i, mv))
        .collect()
}

/// Parse user input against the legal moves. Accepts a list index (`3`),
/// or origin and destination as `r,c r,c` (also `r,c-r,c`).
pub fn parse_move(input: &str, legal: &[Move]) -> Option<Move> {
    let input = input.trim();

    if let Ok(index) = input.parse::<usize>() {
        return legal.get(index).copied();
    }

    let squares: Vec<Square> = input
        .split(|c: char| c.is_whitespace() || c == '-' || c == 'x')
        .filter(|part| !part.is_empty())
        .map(parse_square)
        .collect::<Option<_>>()?;

    match squares.as_slice() {
        [from, to] => legal
            .iter()
            .find(|mv| mv.from() == *from && mv.to() == *to)
            .copied(),
        _ => None,
    }
}

fn parse_square(text: &str) -> Option<Square> {
    let (row, col) = text.split_once(',')?;
    let sq = Square::new(row.trim().parse().ok()?, col.trim().parse().ok()?);
    sq.is_valid().then_some(sq)
}
