use std::fmt;

use tracing::warn;

use crate::bitboard::Bitboard;
use crate::error::{ChessError, Result};
use crate::moves::{Move, PieceId};
use crate::piece::{DIAGONALS, Footprint, KNIGHT_JUMPS, ORTHOGONALS, Piece};
use crate::types::*;
use crate::zobrist::ZOBRIST;

/// Board state: piece arena, mailbox, and the rule counters.
///
/// Pieces live in an arena indexed by their [`PieceId`]; captured pieces stay in the
/// arena with `alive == false` so undo can revive them by id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pieces: Vec<Piece>,
    squares: [Option<PieceId>; 64],
    /// Arena ids of the white and black king.
    kings: [PieceId; 2],
    side_to_move: Color,
    en_passant: Option<u8>, // file of a pawn that just advanced two squares
    castling: [CastlingRights; 2],
    halfmove_clock: u32,
    ply: u32,
    legal_moves: Vec<Move>,
}

/// Everything needed to take back one ply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Undo {
    pub mv: Move,
    pub en_passant: Option<u8>,
    pub castling: [CastlingRights; 2],
    pub halfmove_clock: u32,
}

/// Initial placement used to build a board.
#[derive(Clone, Copy, Debug)]
pub struct Setup {
    pub side_to_move: Color,
    pub castling: [CastlingRights; 2],
    pub en_passant: Option<u8>,
    pub halfmove_clock: u32,
    pub ply: u32,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            side_to_move: Color::White,
            castling: [CastlingRights::ALL; 2],
            en_passant: None,
            halfmove_clock: 0,
            ply: 0,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Board {
    pub fn startpos() -> Self {
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut placements = Vec::with_capacity(32);
        for color in Color::BOTH {
            for (col, &kind) in back.iter().enumerate() {
                placements.push((kind, color, Square::new(color.home_row(), col as u8)));
            }
            for col in 0..8 {
                placements.push((PieceKind::Pawn, color, Square::new(color.pawn_row(), col)));
            }
        }
        // The standard placement always has both kings.
        match Self::from_placements(&placements, Setup::default()) {
            Ok(board) => board,
            Err(err) => unreachable!("start position rejected: {err}"),
        }
    }

    /// Builds a board, assigning piece ids in placement order.
    pub fn from_placements(placements: &[(PieceKind, Color, Square)], setup: Setup) -> Result<Self> {
        if placements.len() > PieceId::MAX as usize {
            return Err(ChessError::InvalidFen("too many pieces".into()));
        }
        let mut pieces = Vec::with_capacity(placements.len());
        let mut squares = [None; 64];
        let mut kings = [None, None];
        for (idx, &(kind, color, square)) in placements.iter().enumerate() {
            let id = idx as PieceId;
            if squares[square.index()].replace(id).is_some() {
                return Err(ChessError::InvalidFen(format!("two pieces on {square}")));
            }
            if kind == PieceKind::King && kings[color.idx()].replace(id).is_some() {
                return Err(ChessError::InvalidFen(format!("more than one {color:?} king")));
            }
            pieces.push(Piece::new(id, kind, color, square));
        }
        let [Some(white), Some(black)] = kings else {
            return Err(ChessError::InvalidFen("both kings are required".into()));
        };

        let mut board = Board {
            pieces,
            squares,
            kings: [white, black],
            side_to_move: setup.side_to_move,
            en_passant: setup.en_passant,
            castling: setup.castling,
            halfmove_clock: setup.halfmove_clock,
            ply: setup.ply,
            legal_moves: Vec::new(),
        };
        board.refresh()?;
        Ok(board)
    }

    /// Regenerates every live unit and the legal-move list from scratch.
    pub fn refresh(&mut self) -> Result<()> {
        for idx in 0..self.pieces.len() {
            if self.pieces[idx].alive {
                let generated = self.pieces[idx].generate(self);
                self.pieces[idx].store(generated);
            }
        }
        self.legal_moves = self.compute_legal_moves()?;
        Ok(())
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn en_passant_file(&self) -> Option<u8> {
        self.en_passant
    }
    pub fn castling(&self, color: Color) -> CastlingRights {
        self.castling[color.idx()]
    }
    /// Plies since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }
    pub fn ply(&self) -> u32 {
        self.ply
    }
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.squares[sq.index()].map(|id| &self.pieces[id as usize])
    }

    /// Live pieces, kings included, in id order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|p| p.alive)
    }

    pub fn king(&self, color: Color) -> &Piece {
        &self.pieces[self.kings[color.idx()] as usize]
    }

    pub fn in_check(&self, color: Color) -> bool {
        self.is_attacked(self.king(color).square, color, None)
    }

    /// Whether a `defender` king standing on `target` would be attacked.
    ///
    /// Probes outward from `target` like a queen and a knight combined. `vacated`
    /// is treated as empty, which lets castling test the squares the king walks
    /// over without moving it.
    pub fn is_attacked(&self, target: Square, defender: Color, vacated: Option<Square>) -> bool {
        let occupant = |sq: Square| {
            if vacated == Some(sq) {
                None
            } else {
                self.piece_at(sq)
            }
        };

        for (dr, dc) in DIAGONALS.into_iter().chain(ORTHOGONALS) {
            let diagonal = dr != 0 && dc != 0;
            let mut cur = target;
            let mut distance = 1;
            while let Some(sq) = cur.offset(dr, dc) {
                if let Some(p) = occupant(sq) {
                    if p.color != defender {
                        let hit = match p.kind {
                            PieceKind::Queen => true,
                            PieceKind::Bishop => diagonal,
                            PieceKind::Rook => !diagonal,
                            PieceKind::King => distance == 1,
                            PieceKind::Pawn => {
                                distance == 1 && diagonal && dr == defender.forward()
                            }
                            PieceKind::Knight => false,
                        };
                        if hit {
                            return true;
                        }
                    }
                    break;
                }
                cur = sq;
                distance += 1;
            }
        }

        KNIGHT_JUMPS.iter().any(|&(dr, dc)| {
            target
                .offset(dr, dc)
                .and_then(occupant)
                .is_some_and(|p| p.color != defender && p.kind == PieceKind::Knight)
        })
    }

    fn id_at(&self, sq: Square) -> Result<PieceId> {
        self.squares[sq.index()].ok_or_else(|| {
            warn!(square = %sq, "expected a piece");
            ChessError::MissingPiece(sq)
        })
    }

    /// Plays `mv`. Test moves only reposition units: caches, counters and the
    /// legal-move list are left alone, so a test move must be undone before
    /// anything else reads the board.
    pub fn do_move(&mut self, mv: &Move, test: bool) -> Result<Undo> {
        let undo = Undo {
            mv: *mv,
            en_passant: self.en_passant,
            castling: self.castling,
            halfmove_clock: self.halfmove_clock,
        };

        let mover = self.id_at(mv.from)?;
        let victim = mv.capture_square().map(|sq| self.id_at(sq).map(|id| (sq, id))).transpose()?;
        let rook = mv
            .rook_squares()
            .map(|(from, to)| self.id_at(from).map(|id| (from, to, id)))
            .transpose()?;

        if let Some((sq, id)) = victim {
            self.pieces[id as usize].alive = false;
            self.squares[sq.index()] = None;
        }

        self.en_passant = None;
        if mv.piece == PieceKind::Pawn && mv.from.row.abs_diff(mv.to.row) == 2 {
            self.en_passant = Some(mv.from.col);
        }

        if let Some((from, to, id)) = rook {
            self.squares[from.index()] = None;
            self.squares[to.index()] = Some(id);
            self.pieces[id as usize].square = to;
        }

        self.squares[mv.from.index()] = None;
        self.squares[mv.to.index()] = Some(mover);
        self.pieces[mover as usize].advance(mv);
        self.revoke_castling(mv);

        if !test {
            let footprint = self.footprint(mv, &undo);
            self.regenerate(mover, &footprint);
        }

        self.side_to_move = self.side_to_move.other();

        if !test {
            self.ply += 1;
            if mv.is_capture() || mv.piece == PieceKind::Pawn {
                self.halfmove_clock = 0;
            } else {
                self.halfmove_clock += 1;
            }
            self.legal_moves = self.compute_legal_moves()?;
        }

        Ok(undo)
    }

    /// Exact inverse of [`Board::do_move`] with the same `test` flag.
    pub fn undo_move(&mut self, undo: &Undo, test: bool) -> Result<()> {
        let mv = undo.mv;
        let mover = self.id_at(mv.to)?;
        let rook = mv
            .rook_squares()
            .map(|(from, to)| self.id_at(to).map(|id| (from, to, id)))
            .transpose()?;
        let victim = match mv.capture {
            Some(cap) => match self.pieces.get(cap.id as usize) {
                Some(p) if !p.alive => Some((p.square, cap.id)),
                _ => {
                    warn!(id = cap.id, mv = %mv, "captured piece not found for revival");
                    return Err(ChessError::MissingPiece(mv.to));
                }
            },
            None => None,
        };

        // Moves are recorded from the mover's perspective.
        self.side_to_move = self.side_to_move.other();
        if !test {
            self.ply -= 1;
            self.halfmove_clock = undo.halfmove_clock;
        }

        let after = Undo {
            mv,
            en_passant: self.en_passant,
            castling: self.castling,
            halfmove_clock: self.halfmove_clock,
        };
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;

        if let Some((from, to, id)) = rook {
            self.squares[to.index()] = None;
            self.squares[from.index()] = Some(id);
            self.pieces[id as usize].square = from;
        }

        self.squares[mv.to.index()] = None;
        self.squares[mv.from.index()] = Some(mover);
        self.pieces[mover as usize].retreat(&mv);

        if let Some((sq, id)) = victim {
            self.pieces[id as usize].alive = true;
            self.squares[sq.index()] = Some(id);
        }

        if !test {
            let footprint = self.footprint(&mv, &after);
            self.regenerate(mover, &footprint);
            self.legal_moves = self.compute_legal_moves()?;
        }
        Ok(())
    }

    /// Squares and rights a ply touched. `other` holds the rule state on the far
    /// side of the ply from the current one.
    fn footprint(&self, mv: &Move, other: &Undo) -> Footprint {
        let mut squares = Bitboard::from_square(mv.from) | Bitboard::from_square(mv.to);
        if let Some(sq) = mv.capture_square() {
            squares.set(sq);
        }
        if let Some((from, to)) = mv.rook_squares() {
            squares.set(from);
            squares.set(to);
        }
        Footprint {
            squares,
            en_passant_changed: self.en_passant.is_some() || other.en_passant.is_some(),
            castling_live: [0, 1].map(|c| self.castling[c].any() || other.castling[c].any()),
        }
    }

    fn regenerate(&mut self, moved: PieceId, footprint: &Footprint) {
        let stale: Vec<usize> = self
            .pieces
            .iter()
            .filter(|p| p.alive && (p.id == moved || p.depends_on_move(footprint)))
            .map(|p| p.id as usize)
            .collect();
        for idx in stale {
            let generated = self.pieces[idx].generate(self);
            self.pieces[idx].store(generated);
        }
    }

    fn revoke_castling(&mut self, mv: &Move) {
        let touches = |sq: Square| mv.from == sq || mv.to == sq;
        for color in Color::BOTH {
            let row = color.home_row();
            let rights = &mut self.castling[color.idx()];
            if touches(Square::new(row, 4)) {
                *rights = CastlingRights::NONE;
            }
            for side in [CastleSide::Queenside, CastleSide::Kingside] {
                if touches(Square::new(row, side.rook_from_col())) {
                    rights.revoke(side);
                }
            }
        }
    }

    /// Filters the side to move's pseudo-legal moves by playing each as a test
    /// move and rejecting those that leave its own king attacked.
    fn compute_legal_moves(&mut self) -> Result<Vec<Move>> {
        let mover = self.side_to_move;
        let candidates: Vec<Move> = self
            .pieces
            .iter()
            .filter(|p| p.alive && p.color == mover)
            .flat_map(|p| p.moves().iter().copied())
            .collect();

        let mut legal = Vec::with_capacity(candidates.len());
        for mv in candidates {
            let undo = self.do_move(&mv, true)?;
            let safe = !self.in_check(mover);
            self.undo_move(&undo, true)?;
            if safe {
                legal.push(mv);
            }
        }
        Ok(legal)
    }

    /// Zobrist key of the position.
    pub fn hash(&self) -> u64 {
        let mut h = 0u64;
        for p in self.pieces() {
            h ^= ZOBRIST.piece_key(p.color, p.kind, p.square);
        }
        if self.side_to_move == Color::Black {
            h ^= ZOBRIST.side_to_move;
        }
        for color in Color::BOTH {
            let rights = self.castling[color.idx()];
            if rights.queenside {
                h ^= ZOBRIST.castling_key(color, CastleSide::Queenside);
            }
            if rights.kingside {
                h ^= ZOBRIST.castling_key(color, CastleSide::Kingside);
            }
        }
        if let Some(file) = self.en_passant {
            h ^= ZOBRIST.ep_key(file);
        }
        h
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            write!(f, "{} ", row + 1)?;
            for col in 0..8 {
                let ch = match self.piece_at(Square::new(row, col)) {
                    Some(p) if p.color == Color::White => p.kind.to_char().to_ascii_uppercase(),
                    Some(p) => p.kind.to_char(),
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
