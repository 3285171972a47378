//! Random Move Chess Engine
//!
//! Selects moves uniformly at random from all legal moves. Serves as a baseline
//! opponent and as the fallback when a search produces no candidate.

use chess_core::{Engine, Game, Move, Result, SearchBudget, SearchResult};
use rand::seq::SliceRandom;
use rand::thread_rng;
use tracing::debug;


/// Uniformly random legal move, `None` only when the game has none.
pub fn fallback_move(game: &Game) -> Option<Move> {
    let mv = game.legal_moves().choose(&mut thread_rng()).copied();
    if let Some(mv) = mv {
        debug!(%mv, "falling back to a random legal move");
    }
    mv
}

/// A chess engine that plays random legal moves.
#[derive(Debug, Clone, Default)]
pub struct RandomEngine;

impl RandomEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for RandomEngine {
    fn choose_move(&mut self, game: &mut Game, _budget: SearchBudget) -> Result<SearchResult> {
        Ok(SearchResult {
            best_move: fallback_move(game),
            score: 0.0,
            depth: 0,
            nodes: 1,
        })
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }
}
