//! Zobrist keys for position hashing.
//!
//! A position hash XORs together one key per live piece (12 kinds × 64 squares),
//! one for black to move, one per held castling right and one for the en passant
//! file. Keys are drawn from the operating system's RNG once per process, so
//! hashes are only comparable within a single run.

use std::sync::LazyLock;

use rand::RngCore;
use rand::rngs::OsRng;

use crate::types::{CastleSide, Color, PieceKind, Square};

pub struct ZobristKeys {
    /// Indexed by [color][piece_kind][square].
    pub pieces: [[[u64; 64]; 6]; 2],
    /// XORed in when black is to move.
    pub side_to_move: u64,
    /// [white queenside, white kingside, black queenside, black kingside]
    pub castling: [u64; 4],
    pub en_passant: [u64; 8],
}

impl ZobristKeys {
    pub fn from_rng(rng: &mut impl RngCore) -> Self {
        let mut pieces = [[[0u64; 64]; 6]; 2];
        for key in pieces.iter_mut().flatten().flatten() {
            *key = rng.next_u64();
        }
        let side_to_move = rng.next_u64();
        let castling = std::array::from_fn(|_| rng.next_u64());
        let en_passant = std::array::from_fn(|_| rng.next_u64());
        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            en_passant,
        }
    }

    #[inline(always)]
    pub fn piece_key(&self, color: Color, kind: PieceKind, sq: Square) -> u64 {
        self.pieces[color.idx()][kind.idx()][sq.index()]
    }

    #[inline(always)]
    pub fn castling_key(&self, color: Color, side: CastleSide) -> u64 {
        let side_idx = match side {
            CastleSide::Queenside => 0,
            CastleSide::Kingside => 1,
        };
        self.castling[color.idx() * 2 + side_idx]
    }

    #[inline(always)]
    pub fn ep_key(&self, file: u8) -> u64 {
        self.en_passant[file as usize]
    }
}

pub static ZOBRIST: LazyLock<ZobristKeys> = LazyLock::new(|| ZobristKeys::from_rng(&mut OsRng));

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
