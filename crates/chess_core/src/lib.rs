pub mod bitboard;
pub mod board;
pub mod encoding;
pub mod error;
pub mod eval;
pub mod features;
pub mod fen;
pub mod game;
pub mod moves;
pub mod perft;
pub mod piece;
pub mod types;
pub mod uci;
pub mod zobrist;

// Re-export core game logic (not engine-specific)
pub use bitboard::*;
pub use board::{Board, Setup, Undo};
pub use encoding::{ACTION_SPACE, action_index};
pub use error::{ChessError, Result};
pub use eval::{Evaluator, MaterialEvaluator, Prediction};
pub use features::{encode_planes, NUM_FEATURES, NUM_PLANES};
pub use fen::START_FEN;
pub use game::{DrawReason, Game, GameStatus};
pub use moves::*;
pub use perft::{divide, perft};
pub use piece::Piece;
pub use types::*;
pub use uci::*;
pub use zobrist::ZOBRIST;

// =============================================================================
// Engine trait — implemented by every search strategy
// =============================================================================

/// How much work a single `choose_move` call may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    /// Iterative-deepening cap for alpha-beta.
    pub max_depth: u8,
    /// Root simulations for the policy/value search.
    pub simulations: u32,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_depth: 3,
            simulations: 200,
        }
    }
}

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The best move found. `None` means the search produced no candidate and the
    /// caller should fall back to any legal move.
    pub best_move: Option<Move>,
    /// Score in [-1, 1] from the side to move's perspective
    pub score: f32,
    /// Deepest completed iteration (0 for searches without depth)
    pub depth: u8,
    /// Number of nodes searched (for stats)
    pub nodes: u64,
}

/// Trait that all chess engines must implement.
///
/// Engines walk hypothetical lines on the caller's game with do/undo and must
/// hand it back exactly as they found it.
pub trait Engine: Send {
    fn choose_move(&mut self, game: &mut Game, budget: SearchBudget) -> Result<SearchResult>;

    /// Returns the engine's name for UCI identification
    fn name(&self) -> &str;

    /// Returns the engine's author for UCI identification
    fn author(&self) -> &str {
        "chess_core"
    }

    /// Reset internal state for a new game (clear caches, statistics, etc.)
    fn new_game(&mut self) {}

    /// Optional: Set a UCI option. Returns true if the option was recognized.
    fn set_option(&mut self, _name: &str, _value: &str) -> bool {
        false
    }
}
