use std::fmt;

use crate::error::{ChessError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
    /// Row delta of a forward pawn step.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
    /// Row holding the king and rooks at game start.
    pub fn home_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
    pub fn pawn_row(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }
    /// Row a pawn must stand on to capture en passant.
    pub fn en_passant_row(self) -> u8 {
        match self {
            Color::White => 4,
            Color::Black => 3,
        }
    }
    pub fn promotion_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Promotion targets in generation order.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Bishop,
    ];

    pub fn idx(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    pub fn from_char(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

/// Board coordinate. Row 0 is white's back rank, col 0 is the a-file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Square from signed coordinates, `None` when off the board.
    pub fn checked(row: i8, col: i8) -> Option<Square> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Square> {
        Square::checked(self.row as i8 + d_row, self.col as i8 + d_col)
    }

    pub const fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    /// Light squares have an odd coordinate sum.
    pub fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    pub fn parse(txt: &str) -> Result<Square> {
        let b = txt.as_bytes();
        if b.len() != 2 || !(b'a'..=b'h').contains(&b[0]) || !(b'1'..=b'8').contains(&b[1]) {
            return Err(ChessError::InvalidSquare(txt.to_string()));
        }
        Ok(Square::new(b[1] - b'1', b[0] - b'a'))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row + 1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Queenside,
    Kingside,
}

impl CastleSide {
    /// Column the rook starts on.
    pub fn rook_from_col(self) -> u8 {
        match self {
            CastleSide::Queenside => 0,
            CastleSide::Kingside => 7,
        }
    }
    /// Column the rook lands on, next to the king's destination.
    pub fn rook_to_col(self) -> u8 {
        match self {
            CastleSide::Queenside => 3,
            CastleSide::Kingside => 5,
        }
    }
}

/// Castling rights of one side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub queenside: bool,
    pub kingside: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        queenside: true,
        kingside: true,
    };
    pub const NONE: CastlingRights = CastlingRights {
        queenside: false,
        kingside: false,
    };

    pub fn any(self) -> bool {
        self.queenside || self.kingside
    }

    pub fn has(self, side: CastleSide) -> bool {
        match side {
            CastleSide::Queenside => self.queenside,
            CastleSide::Kingside => self.kingside,
        }
    }

    pub fn revoke(&mut self, side: CastleSide) {
        match side {
            CastleSide::Queenside => self.queenside = false,
            CastleSide::Kingside => self.kingside = false,
        }
    }
}
