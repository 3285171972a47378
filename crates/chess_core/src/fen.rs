//! Forsyth-Edwards Notation, used by tests and UCI position setup.

use crate::board::{Board, Setup};
use crate::error::{ChessError, Result};
use crate::types::*;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    pub fn from_fen(fen: &str) -> Result<Self> {
        let invalid = |what: &str| ChessError::InvalidFen(format!("{what} in \"{fen}\""));
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(invalid("expected at least 4 fields"));
        }
        let halfmove_part = parts.get(4).copied().unwrap_or("0");
        let fullmove_part = parts.get(5).copied().unwrap_or("1");

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid("board section needs 8 ranks"));
        }
        let mut placements = Vec::with_capacity(32);
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let row = 7 - rank_idx as u8; // FEN lists rank 8 .. 1
            let mut col = 0u8;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    col += d as u8;
                } else {
                    let kind = PieceKind::from_char(ch.to_ascii_lowercase())
                        .ok_or_else(|| invalid("unknown piece letter"))?;
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if col > 7 {
                        return Err(invalid("too many files in a rank"));
                    }
                    placements.push((kind, color, Square::new(row, col)));
                    col += 1;
                }
                if col > 8 {
                    return Err(invalid("too many files in a rank"));
                }
            }
            if col != 8 {
                return Err(invalid("not enough files in a rank"));
            }
        }

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(invalid("side to move must be w or b")),
        };

        let mut castling = [CastlingRights::NONE; 2];
        if parts[2] != "-" {
            for c in parts[2].chars() {
                let (color, side) = match c {
                    'K' => (Color::White, CastleSide::Kingside),
                    'Q' => (Color::White, CastleSide::Queenside),
                    'k' => (Color::Black, CastleSide::Kingside),
                    'q' => (Color::Black, CastleSide::Queenside),
                    _ => return Err(invalid("bad castling field")),
                };
                let rights = &mut castling[color.idx()];
                match side {
                    CastleSide::Kingside => rights.kingside = true,
                    CastleSide::Queenside => rights.queenside = true,
                }
            }
        }

        let en_passant = match parts[3] {
            "-" => None,
            sq => Some(Square::parse(sq).map_err(|_| invalid("bad en passant square"))?.col),
        };
        let halfmove_clock: u32 = halfmove_part
            .parse()
            .map_err(|_| invalid("bad halfmove clock"))?;
        let fullmove: u32 = fullmove_part
            .parse()
            .map_err(|_| invalid("bad fullmove number"))?;
        let ply = fullmove.saturating_sub(1) * 2 + side_to_move.idx() as u32;

        Board::from_placements(
            &placements,
            Setup {
                side_to_move,
                castling,
                en_passant,
                halfmove_clock,
                ply,
            },
        )
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::new();
        for row in (0..8).rev() {
            let mut empty = 0;
            for col in 0..8 {
                match self.piece_at(Square::new(row, col)) {
                    Some(p) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        let ch = p.kind.to_char();
                        out.push(match p.color {
                            Color::White => ch.to_ascii_uppercase(),
                            Color::Black => ch,
                        });
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if row > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move() {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        let mut any = false;
        for (color, k, q) in [(Color::White, 'K', 'Q'), (Color::Black, 'k', 'q')] {
            let rights = self.castling(color);
            if rights.kingside {
                out.push(k);
                any = true;
            }
            if rights.queenside {
                out.push(q);
                any = true;
            }
        }
        if !any {
            out.push('-');
        }

        out.push(' ');
        match self.en_passant_file() {
            // The capture square sits behind the pawn that just moved.
            Some(file) => {
                let row = self.side_to_move().en_passant_row() as i8 + self.side_to_move().forward();
                out.push_str(&Square::new(row as u8, file).to_string());
            }
            None => out.push('-'),
        }

        let fullmove = self.ply() / 2 + 1;
        out.push_str(&format!(" {} {}", self.halfmove_clock(), fullmove));
        out
    }
}
