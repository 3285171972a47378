//! Game controller: a board plus its move history and repetition counts.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::board::{Board, Undo};
use crate::error::{ChessError, Result};
use crate::moves::Move;
use crate::piece::Piece;
use crate::types::{Color, PieceKind, Square};
use crate::uci::parse_move;

/// Why a finished game is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawReason {
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoveRule,
    Stalemate,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let txt = match self {
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::ThreefoldRepetition => "threefold repetition",
            DrawReason::FiftyMoveRule => "fifty moves without a capture or pawn move",
            DrawReason::Stalemate => "stalemate",
        };
        f.write_str(txt)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Draw(DrawReason),
    /// The side to move has been mated.
    Checkmate,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }

    /// Outcome for the side to move: -1 when mated, 0 for a draw.
    /// `None` while the game is still running.
    pub fn value(self) -> Option<f32> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::Draw(_) => Some(0.0),
            GameStatus::Checkmate => Some(-1.0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    history: Vec<Undo>,
    /// Occurrences of each position hash along the played line.
    repetitions: HashMap<u64, u32>,
}

impl Default for Game {
    fn default() -> Self {
        Self::from_board(Board::startpos())
    }
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        Ok(Self::from_board(Board::from_fen(fen)?))
    }

    pub fn from_board(board: Board) -> Self {
        let mut repetitions = HashMap::new();
        repetitions.insert(board.hash(), 1);
        Self {
            board,
            history: Vec::new(),
            repetitions,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn legal_moves(&self) -> &[Move] {
        self.board.legal_moves()
    }

    pub fn team_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn hash(&self) -> u64 {
        self.board.hash()
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.board.pieces()
    }

    pub fn history(&self) -> &[Undo] {
        &self.history
    }

    /// How many times the current position has occurred.
    pub fn repetitions(&self) -> u32 {
        self.repetitions.get(&self.hash()).copied().unwrap_or(0)
    }

    /// Plays a legal move. Anything not in the current legal-move list is rejected
    /// and leaves the game untouched.
    pub fn do_move(&mut self, mv: &Move) -> Result<Undo> {
        if !self.board.legal_moves().contains(mv) {
            return Err(ChessError::IllegalMove(mv.to_string()));
        }
        let undo = self.board.do_move(mv, false)?;
        self.history.push(undo);
        *self.repetitions.entry(self.board.hash()).or_insert(0) += 1;
        Ok(undo)
    }

    /// Plays a move given as "e2e4" or "e7e8n". Without a suffix a promotion
    /// defaults to the first generated target, a queen.
    pub fn do_str_move(&mut self, txt: &str) -> Result<Move> {
        let mv = parse_move(&self.board, txt)?;
        self.do_move(&mv)?;
        Ok(mv)
    }

    /// Takes back the last ply and returns it.
    pub fn undo_move(&mut self) -> Result<Move> {
        let Some(undo) = self.history.last().copied() else {
            warn!("cannot undo past the starting position");
            return Err(ChessError::NoHistory);
        };
        let hash = self.board.hash();
        self.board.undo_move(&undo, false)?;
        self.history.pop();
        match self.repetitions.get_mut(&hash) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                self.repetitions.remove(&hash);
            }
            None => warn!(hash, "position missing from the repetition table"),
        }
        Ok(undo.mv)
    }

    /// Destination squares of legal moves starting on `from`, for a UI.
    pub fn legal_moves_from(&self, from: Square) -> Vec<Square> {
        let mut out = Vec::new();
        for mv in self.legal_moves().iter().filter(|m| m.from == from) {
            if !out.contains(&mv.to) {
                out.push(mv.to);
            }
        }
        out
    }

    pub fn is_square_friendly(&self, sq: Square) -> bool {
        self.board
            .piece_at(sq)
            .is_some_and(|p| p.color == self.team_to_move())
    }

    /// Terminal-state detection. Rules are tried in a fixed order, so a position that
    /// is both stalemate and a threefold repetition reports the repetition.
    pub fn status(&self) -> GameStatus {
        let status = if self.insufficient_material() {
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        } else if self.repetitions() >= 3 {
            GameStatus::Draw(DrawReason::ThreefoldRepetition)
        } else if self.board.halfmove_clock() >= 100 {
            GameStatus::Draw(DrawReason::FiftyMoveRule)
        } else if self.legal_moves().is_empty() {
            if self.board.in_check(self.team_to_move()) {
                GameStatus::Checkmate
            } else {
                GameStatus::Draw(DrawReason::Stalemate)
            }
        } else {
            GameStatus::InProgress
        };
        if status.is_over() {
            debug!(?status, ply = self.board.ply(), "terminal position");
        }
        status
    }

    /// No pawns, rooks or queens, at most one minor piece per side. Knight with
    /// bishop, or bishops on opposite colours, can still mate.
    fn insufficient_material(&self) -> bool {
        let mut bishops = [0u8; 2];
        let mut bishop_light = [false; 2];
        let mut knights = 0;
        for p in self.pieces() {
            match p.kind {
                PieceKind::King => {}
                PieceKind::Bishop => {
                    let side = p.color.idx();
                    bishops[side] += 1;
                    if bishops[side] > 1 {
                        return false;
                    }
                    bishop_light[side] = p.square.is_light();
                }
                PieceKind::Knight => {
                    knights += 1;
                    if knights > 1 {
                        return false;
                    }
                }
                _ => return false,
            }
        }
        if knights > 0 && bishops.iter().sum::<u8>() > 0 {
            return false;
        }
        !(bishops == [1, 1] && bishop_light[0] != bishop_light[1])
    }

    /// Occupancy planes for the evaluator, oriented for the side to move.
    pub fn planes(&self) -> Vec<f32> {
        crate::features::encode_planes(&self.board)
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
