use std::fmt;

use crate::types::{CastleSide, PieceKind, Square};

/// Stable identifier of a piece, assigned once at setup.
pub type PieceId = u8;

/// The piece a move removes from the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capture {
    pub kind: PieceKind,
    pub id: PieceId,
}

/// A single ply. Immutable once generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Kind of the piece that moves (a pawn for promotions).
    pub piece: PieceKind,
    pub capture: Option<Capture>,
    pub promotion: Option<PieceKind>,
    pub is_en_passant: bool,
    pub castle: Option<CastleSide>,
}

impl Move {
    pub fn new(from: Square, to: Square, piece: PieceKind) -> Self {
        Self {
            from,
            to,
            piece,
            capture: None,
            promotion: None,
            is_en_passant: false,
            castle: None,
        }
    }

    pub fn capturing(mut self, kind: PieceKind, id: PieceId) -> Self {
        self.capture = Some(Capture { kind, id });
        self
    }

    pub fn promoting(mut self, kind: PieceKind) -> Self {
        self.promotion = Some(kind);
        self
    }

    pub fn is_capture(&self) -> bool {
        self.capture.is_some()
    }

    /// Square of the captured piece. Differs from `to` only for en passant.
    pub fn capture_square(&self) -> Option<Square> {
        self.capture?;
        if self.is_en_passant {
            Some(Square::new(self.from.row, self.to.col))
        } else {
            Some(self.to)
        }
    }

    /// Rook relocation of a castle move as (from, to).
    pub fn rook_squares(&self) -> Option<(Square, Square)> {
        let side = self.castle?;
        let row = self.from.row;
        Some((
            Square::new(row, side.rook_from_col()),
            Square::new(row, side.rook_to_col()),
        ))
    }

    /// Same origin, destination and promotion target.
    pub fn same_action(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }
}

/// Plain start+end coordinates, e.g. "e2e4". Promotion targets are not shown.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
