//! Fixed-width action indices for moves.
//!
//! Every origin square owns 73 slots, giving 8 × 8 × 73 = 4672 actions:
//! - 56 sliding slots: 8 directions × distances 1..=7
//! - 8 knight slots
//! - 9 under-promotion slots: 3 lateral directions × {knight, bishop, rook}
//!
//! Queen promotions share the sliding slot of the plain one-step move. Indices are
//! side-relative: for black both rows are mirrored before encoding, so the mover
//! always appears to be moving up the board.

use crate::error::{ChessError, Result};
use crate::moves::Move;
use crate::types::{Color, PieceKind, Square};

pub const ACTION_SPACE: usize = 4672;
pub const SLOTS_PER_SQUARE: usize = 73;

const SLIDE_SLOTS: usize = 56;
const KNIGHT_SLOTS: usize = 8;

/// Sliding directions as (d_row, d_col), in slot order.
const SLIDE_DIRS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Knight jumps as (d_row, d_col), in slot order.
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Action index of `mv` played by `mover`.
pub fn action_index(mv: &Move, mover: Color) -> Result<usize> {
    let fail = |reason| ChessError::Encoding {
        mv: mv.to_string(),
        reason,
    };
    if mv.from.row > 7 || mv.from.col > 7 || mv.to.row > 7 || mv.to.col > 7 {
        return Err(fail("square off the board"));
    }

    let (from, to) = orient(mv.from, mv.to, mover);
    let d_row = to.row as i8 - from.row as i8;
    let d_col = to.col as i8 - from.col as i8;
    let base = from.index() * SLOTS_PER_SQUARE;

    if let Some(kind) = mv.promotion
        && kind != PieceKind::Queen
    {
        let piece_slot = match kind {
            PieceKind::Knight => 0,
            PieceKind::Bishop => 1,
            PieceKind::Rook => 2,
            _ => return Err(fail("invalid promotion target")),
        };
        if d_row != 1 || d_col.abs() > 1 {
            return Err(fail("under-promotion must be a single forward step"));
        }
        let dir_slot = (d_col + 1) as usize;
        return Ok(base + SLIDE_SLOTS + KNIGHT_SLOTS + dir_slot * 3 + piece_slot);
    }

    if let Some(jump) = KNIGHT_JUMPS.iter().position(|&j| j == (d_row, d_col)) {
        return Ok(base + SLIDE_SLOTS + jump);
    }

    let straight = d_row == 0 || d_col == 0 || d_row.abs() == d_col.abs();
    if !straight || (d_row == 0 && d_col == 0) {
        return Err(fail("destination is neither a line nor a knight jump"));
    }
    let distance = d_row.abs().max(d_col.abs());
    let dir = (d_row.signum(), d_col.signum());
    let dir_slot = SLIDE_DIRS
        .iter()
        .position(|&d| d == dir)
        .ok_or_else(|| fail("unknown direction"))?;
    Ok(base + dir_slot * 7 + (distance as usize - 1))
}

fn orient(from: Square, to: Square, mover: Color) -> (Square, Square) {
    match mover {
        Color::White => (from, to),
        Color::Black => (
            Square::new(7 - from.row, from.col),
            Square::new(7 - to.row, to.col),
        ),
    }
}

#[cfg(test)]
#[path = "encoding_tests.rs"]
mod encoding_tests;
