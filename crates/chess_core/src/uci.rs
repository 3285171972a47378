//! String move adapter and UCI position setup.
//!
//! Search code never compares strings; these helpers only translate at the edge.

use crate::board::Board;
use crate::error::{ChessError, Result};
use crate::fen::START_FEN;
use crate::game::Game;
use crate::moves::Move;
use crate::types::{PieceKind, Square};

/// Long algebraic form with a promotion suffix, e.g. "e7e8n".
pub fn move_to_uci(mv: &Move) -> String {
    let mut s = mv.to_string();
    if let Some(p) = mv.promotion {
        s.push(p.to_char());
    }
    s
}

/// Resolves "e2e4" or "e7e8q" against the legal moves of `board`, so castle and
/// en passant flags come from the generator. A bare promotion picks the first
/// generated target, which is the queen.
pub fn parse_move(board: &Board, txt: &str) -> Result<Move> {
    let illegal = || ChessError::IllegalMove(txt.to_string());
    if !txt.is_ascii() || !(4..=5).contains(&txt.len()) {
        return Err(illegal());
    }
    let from = Square::parse(&txt[0..2]).map_err(|_| illegal())?;
    let to = Square::parse(&txt[2..4]).map_err(|_| illegal())?;
    let promo = match txt[4..].chars().next() {
        Some(ch) => match PieceKind::from_char(ch) {
            Some(kind) if PieceKind::PROMOTIONS.contains(&kind) => Some(kind),
            _ => return Err(illegal()),
        },
        None => None,
    };

    board
        .legal_moves()
        .iter()
        .find(|m| m.from == from && m.to == to && (promo.is_none() || m.promotion == promo))
        .copied()
        .ok_or_else(illegal)
}

/// Builds a game from `position` arguments:
/// `startpos [moves ...]` or `fen <6 fields> [moves ...]`.
pub fn set_position_from_uci(args: &[&str]) -> Result<Game> {
    let mut i = 0;
    let mut game = match args.first() {
        Some(&"fen") => {
            let end = args.iter().position(|&a| a == "moves").unwrap_or(args.len());
            i = end;
            Game::from_fen(&args[1..end].join(" "))?
        }
        Some(&"startpos") => {
            i = 1;
            Game::from_fen(START_FEN)?
        }
        _ => Game::new(),
    };

    if args.get(i) == Some(&"moves") {
        for txt in &args[i + 1..] {
            game.do_str_move(txt)?;
        }
    }
    Ok(game)
}
