//! Piece units and pseudo-legal move generation.
//!
//! Every unit caches its own pseudo-legal moves together with the set of squares
//! those moves were derived from. After a ply only units whose dependency set
//! meets the ply's footprint are regenerated; the rest keep their cached lists.

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::moves::{Move, PieceId};
use crate::types::{CastleSide, Color, PieceKind, Square};

pub(crate) const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

pub(crate) const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(crate) const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A piece owned by the board's arena, addressed by its stable id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
    pub alive: bool,
    depends_on: Bitboard,
    moves: Vec<Move>,
}

/// What a ply changed, as seen by cached move lists.
#[derive(Clone, Copy, Debug)]
pub struct Footprint {
    /// Squares whose occupancy changed.
    pub squares: Bitboard,
    pub en_passant_changed: bool,
    /// Per side, whether castling rights were held before or after the ply.
    pub castling_live: [bool; 2],
}

impl Piece {
    pub fn new(id: PieceId, kind: PieceKind, color: Color, square: Square) -> Self {
        Self {
            id,
            kind,
            color,
            square,
            alive: true,
            depends_on: Bitboard::EMPTY,
            moves: Vec::new(),
        }
    }

    /// Cached pseudo-legal moves for the current position.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn depends_on(&self) -> Bitboard {
        self.depends_on
    }

    /// Moves the unit along `mv`, taking the promoted kind if any.
    pub(crate) fn advance(&mut self, mv: &Move) {
        self.square = mv.to;
        if let Some(kind) = mv.promotion {
            self.kind = kind;
        }
    }

    /// Inverse of [`Piece::advance`].
    pub(crate) fn retreat(&mut self, mv: &Move) {
        self.square = mv.from;
        if mv.promotion.is_some() {
            self.kind = PieceKind::Pawn;
        }
    }

    /// Whether this unit's cached moves may be stale after a ply with `footprint`.
    pub fn depends_on_move(&self, footprint: &Footprint) -> bool {
        match self.kind {
            // Castling depends on attacks anywhere on the board.
            PieceKind::King if footprint.castling_live[self.color.idx()] => true,
            PieceKind::Pawn
                if footprint.en_passant_changed
                    && self.square.row == self.color.en_passant_row() =>
            {
                true
            }
            _ => self.depends_on.intersects(footprint.squares),
        }
    }

    /// Installs the output of [`Piece::generate`].
    pub(crate) fn store(&mut self, (moves, depends_on): (Vec<Move>, Bitboard)) {
        self.moves = moves;
        self.depends_on = depends_on;
    }

    /// Computes moves and dependencies from scratch for the current square.
    pub fn generate(&self, board: &Board) -> (Vec<Move>, Bitboard) {
        let mut g = Generator {
            board,
            piece: self,
            moves: Vec::with_capacity(16),
            deps: Bitboard::from_square(self.square),
        };
        match self.kind {
            PieceKind::Pawn => g.pawn(),
            PieceKind::Knight => {
                for (dr, dc) in KNIGHT_JUMPS {
                    g.step(dr, dc);
                }
            }
            PieceKind::Bishop => g.rays(&DIAGONALS),
            PieceKind::Rook => g.rays(&ORTHOGONALS),
            PieceKind::Queen => {
                g.rays(&DIAGONALS);
                g.rays(&ORTHOGONALS);
            }
            PieceKind::King => {
                for (dr, dc) in DIAGONALS.into_iter().chain(ORTHOGONALS) {
                    g.step(dr, dc);
                }
                g.castles();
            }
        }
        (g.moves, g.deps)
    }
}

struct Generator<'a> {
    board: &'a Board,
    piece: &'a Piece,
    moves: Vec<Move>,
    deps: Bitboard,
}

impl Generator<'_> {
    fn plain(&self, to: Square) -> Move {
        Move::new(self.piece.square, to, self.piece.kind)
    }

    /// Emits a move to `to` when it is empty or holds an enemy.
    /// Returns false when the square is occupied, i.e. a ray stops here.
    fn land(&mut self, to: Square) -> bool {
        self.deps.set(to);
        match self.board.piece_at(to) {
            None => {
                let mv = self.plain(to);
                self.moves.push(mv);
                true
            }
            Some(other) => {
                if other.color != self.piece.color {
                    let mv = self.plain(to).capturing(other.kind, other.id);
                    self.moves.push(mv);
                }
                false
            }
        }
    }

    fn step(&mut self, dr: i8, dc: i8) {
        if let Some(to) = self.piece.square.offset(dr, dc) {
            self.land(to);
        }
    }

    fn rays(&mut self, dirs: &[(i8, i8)]) {
        for &(dr, dc) in dirs {
            let mut cur = self.piece.square;
            while let Some(to) = cur.offset(dr, dc) {
                if !self.land(to) {
                    break;
                }
                cur = to;
            }
        }
    }

    fn push_promotions(&mut self, base: Move) {
        for kind in PieceKind::PROMOTIONS {
            self.moves.push(base.promoting(kind));
        }
    }

    fn pawn(&mut self) {
        let color = self.piece.color;
        let from = self.piece.square;
        let fwd = color.forward();
        let promo_row = color.promotion_row();

        if let Some(one) = from.offset(fwd, 0) {
            self.deps.set(one);
            if self.board.piece_at(one).is_none() {
                let mv = self.plain(one);
                if one.row == promo_row {
                    self.push_promotions(mv);
                } else {
                    self.moves.push(mv);
                }
                if from.row == color.pawn_row()
                    && let Some(two) = from.offset(2 * fwd, 0)
                {
                    self.deps.set(two);
                    if self.board.piece_at(two).is_none() {
                        let mv = self.plain(two);
                        self.moves.push(mv);
                    }
                }
            }
        }

        let on_ep_row = from.row == color.en_passant_row();
        for dc in [-1, 1] {
            let Some(to) = from.offset(fwd, dc) else {
                continue;
            };
            self.deps.set(to);
            match self.board.piece_at(to) {
                Some(other) if other.color != color => {
                    let mv = self.plain(to).capturing(other.kind, other.id);
                    if to.row == promo_row {
                        self.push_promotions(mv);
                    } else {
                        self.moves.push(mv);
                    }
                }
                Some(_) => {}
                None => {
                    if on_ep_row && self.board.en_passant_file() == Some(to.col) {
                        let beside = Square::new(from.row, to.col);
                        if let Some(victim) = self.board.piece_at(beside)
                            && victim.color != color
                            && victim.kind == PieceKind::Pawn
                        {
                            let mut mv = self.plain(to).capturing(victim.kind, victim.id);
                            mv.is_en_passant = true;
                            self.moves.push(mv);
                        }
                    }
                }
            }
            if on_ep_row {
                self.deps.set(Square::new(from.row, to.col));
            }
        }
    }

    fn castles(&mut self) {
        let color = self.piece.color;
        let from = self.piece.square;
        let rights = self.board.castling(color);
        let home = Square::new(color.home_row(), 4);
        if !rights.any() || from != home || self.board.is_attacked(from, color, None) {
            return;
        }

        for side in [CastleSide::Queenside, CastleSide::Kingside] {
            if !rights.has(side) {
                continue;
            }
            let rook_sq = Square::new(home.row, side.rook_from_col());
            self.deps.set(rook_sq);
            match self.board.piece_at(rook_sq) {
                Some(rook) if rook.color == color && rook.kind == PieceKind::Rook => {}
                _ => continue,
            }

            // Squares the king crosses must be empty and safe; the extra
            // queenside square only needs to be empty.
            let (walk, extra): (&[u8], Option<u8>) = match side {
                CastleSide::Queenside => (&[3, 2], Some(1)),
                CastleSide::Kingside => (&[5, 6], None),
            };
            let mut clear = true;
            for &col in walk.iter().chain(extra.iter()) {
                let sq = Square::new(home.row, col);
                self.deps.set(sq);
                if self.board.piece_at(sq).is_some() {
                    clear = false;
                }
            }
            if !clear {
                continue;
            }
            let safe = walk.iter().all(|&col| {
                !self
                    .board
                    .is_attacked(Square::new(home.row, col), color, Some(from))
            });
            if safe {
                let mut mv = self.plain(Square::new(home.row, walk[1]));
                mv.castle = Some(side);
                self.moves.push(mv);
            }
        }
    }
}

#[cfg(test)]
#[path = "piece_tests.rs"]
mod piece_tests;
