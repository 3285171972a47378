//! Board-plane encoding consumed by evaluators.
//!
//! 12 planes of 64 squares: the side to move's pawn, rook, bishop, knight, queen
//! and king, then the opponent's in the same order. Rows are mirrored when black
//! is to move, so the side to move always plays up the board. Columns are left as is.

use crate::board::Board;
use crate::types::{Color, PieceKind};

pub const NUM_PLANES: usize = 12;

/// 8 × 8 × 12 = 768
pub const NUM_FEATURES: usize = 64 * NUM_PLANES;

fn plane_of(kind: PieceKind) -> usize {
    match kind {
        PieceKind::Pawn => 0,
        PieceKind::Rook => 1,
        PieceKind::Bishop => 2,
        PieceKind::Knight => 3,
        PieceKind::Queen => 4,
        PieceKind::King => 5,
    }
}

pub fn encode_planes(board: &Board) -> Vec<f32> {
    let mut features = vec![0.0f32; NUM_FEATURES];
    let mover = board.side_to_move();

    for piece in board.pieces() {
        let row = match mover {
            Color::White => piece.square.row,
            Color::Black => 7 - piece.square.row,
        } as usize;
        let side_offset = if piece.color == mover { 0 } else { 6 };
        let plane = plane_of(piece.kind) + side_offset;
        features[plane * 64 + row * 8 + piece.square.col as usize] = 1.0;
    }

    features
}
