//! Alpha-Beta Chess Engine
//!
//! Iterative-deepening negamax over the game controller. Scores are evaluator
//! values in [-1, 1] from the side to move's point of view, with a delivered
//! mate worth exactly 1.

mod search;

use chess_core::{Engine, Evaluator, Game, MaterialEvaluator, Result, SearchBudget, SearchResult};
use serde::{Deserialize, Serialize};

pub use search::{Searcher, MATE_SCORE};

/// Settings read from the `[alphabeta]` section of the engine config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaBetaConfig {
    /// Iterative-deepening cap.
    pub max_depth: u8,
    /// Capture-only plies searched below the horizon. 0 evaluates leaves statically.
    pub quiescence_depth: u8,
}

impl Default for AlphaBetaConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            quiescence_depth: 0,
        }
    }
}

/// Alpha-beta engine using evaluator values as leaf scores.
///
/// The memo tables live as long as the engine and are dropped on `new_game`.
pub struct AlphaBetaEngine<E> {
    evaluator: E,
    searcher: Searcher,
}

impl Default for AlphaBetaEngine<MaterialEvaluator> {
    fn default() -> Self {
        Self::new(MaterialEvaluator, AlphaBetaConfig::default())
    }
}

impl<E: Evaluator> AlphaBetaEngine<E> {
    pub fn new(evaluator: E, config: AlphaBetaConfig) -> Self {
        Self {
            evaluator,
            searcher: Searcher::new(config.quiescence_depth),
        }
    }

    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }
}

impl<E: Evaluator + Send> Engine for AlphaBetaEngine<E> {
    fn choose_move(&mut self, game: &mut Game, budget: SearchBudget) -> Result<SearchResult> {
        self.searcher.nodes = 0;
        let outcome = self
            .searcher
            .search_root(game, &mut self.evaluator, budget.max_depth)?;

        Ok(SearchResult {
            best_move: outcome.best_move,
            score: outcome.score,
            depth: outcome.depth,
            nodes: self.searcher.nodes,
        })
    }

    fn name(&self) -> &str {
        "AlphaBeta v1.0"
    }

    fn new_game(&mut self) {
        self.searcher.clear();
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        match name.to_ascii_lowercase().as_str() {
            "quiescencedepth" => match value.parse() {
                Ok(depth) => {
                    self.searcher.quiescence_depth = depth;
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}
