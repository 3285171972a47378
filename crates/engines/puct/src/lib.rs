//! Policy/Value Tree Search Engine
//!
//! Repeated simulations from the root build visit statistics over positions,
//! guided by an evaluator's prior and value (AlphaZero-style PUCT selection).
//! The played move is the most visited legal action.
//!
//! Any [`Evaluator`] can drive the search. [`MaterialEvaluator`] works out of the
//! box; with the `onnx` feature a trained network can be loaded from disk.

mod tree;

#[cfg(feature = "onnx")]
mod onnx;

use chess_core::{Engine, Evaluator, Game, MaterialEvaluator, Result, SearchBudget, SearchResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "onnx")]
pub use onnx::OnnxEvaluator;
pub use tree::SearchTree;

/// Settings read from the `[puct]` section of the engine config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuctConfig {
    /// Simulations per move.
    pub simulations: u32,
    /// Exploration constant weighting the prior against the running mean.
    pub c_puct: f32,
}

impl Default for PuctConfig {
    fn default() -> Self {
        Self {
            simulations: 200,
            c_puct: 0.2,
        }
    }
}

/// Tree search engine. Statistics persist between moves of the same game, so
/// later searches start from the subtrees earlier ones explored.
pub struct PuctEngine<E> {
    evaluator: E,
    tree: SearchTree,
}

impl Default for PuctEngine<MaterialEvaluator> {
    fn default() -> Self {
        Self::new(MaterialEvaluator, PuctConfig::default())
    }
}

impl<E: Evaluator> PuctEngine<E> {
    pub fn new(evaluator: E, config: PuctConfig) -> Self {
        Self {
            evaluator,
            tree: SearchTree::new(config.c_puct),
        }
    }

    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }
}

impl<E: Evaluator + Send> Engine for PuctEngine<E> {
    fn choose_move(&mut self, game: &mut Game, budget: SearchBudget) -> Result<SearchResult> {
        self.tree.nodes = 0;
        if game.status().is_over() {
            return Ok(SearchResult {
                best_move: None,
                score: 0.0,
                depth: 0,
                nodes: 0,
            });
        }

        // The first simulation only expands the root.
        for _ in 0..budget.simulations.max(2) {
            self.tree.search(game, &mut self.evaluator)?;
        }
        let choice = self.tree.choose_move(game)?;
        debug!(
            simulations = budget.simulations,
            nodes = self.tree.nodes,
            positions = self.tree.len(),
            "search finished"
        );

        Ok(SearchResult {
            best_move: choice.map(|(mv, _)| mv),
            score: choice.map(|(_, q)| q).unwrap_or(0.0),
            depth: 0,
            nodes: self.tree.nodes,
        })
    }

    fn name(&self) -> &str {
        "PUCT v1.0"
    }

    fn new_game(&mut self) {
        self.tree.clear();
    }

    fn set_option(&mut self, name: &str, value: &str) -> bool {
        match name.to_ascii_lowercase().as_str() {
            "cpuct" => match value.parse() {
                Ok(c) => {
                    self.tree.c_puct = c;
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}
