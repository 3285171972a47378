//! Visit statistics and the recursive simulation.
//!
//! Values returned by [`SearchTree::search`] are from the point of view of the
//! side that moved into the searched position, so a parent can use them as-is
//! for its own action and hand the negation further up.

use std::collections::HashMap;

use chess_core::{action_index, ChessError, Evaluator, Game, Move, Result, ACTION_SPACE};
use tracing::{trace, warn};

/// Per-position action statistics, indexed by action index.
#[derive(Debug, Clone)]
struct NodeStats {
    /// Running mean of backed-up values.
    q: Vec<f32>,
    n: Vec<u32>,
    /// Evaluator prior.
    p: Vec<f32>,
    /// Sum of `n`.
    visits: u32,
}

impl NodeStats {
    fn new(prior: Vec<f32>) -> Self {
        Self {
            q: vec![0.0; ACTION_SPACE],
            n: vec![0; ACTION_SPACE],
            p: prior,
            visits: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchTree {
    stats: HashMap<u64, NodeStats>,
    pub c_puct: f32,
    pub nodes: u64,
}

impl SearchTree {
    pub fn new(c_puct: f32) -> Self {
        Self {
            c_puct,
            ..Self::default()
        }
    }

    pub fn clear(&mut self) {
        self.stats.clear();
        self.nodes = 0;
    }

    /// Number of expanded positions.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn is_visited(&self, key: u64) -> bool {
        self.stats.contains_key(&key)
    }

    /// One simulation: descend by PUCT to an unexpanded or terminal position,
    /// expand it with the evaluator and back the value up.
    pub fn search<E: Evaluator>(&mut self, game: &mut Game, eval: &mut E) -> Result<f32> {
        self.nodes += 1;
        if let Some(value) = game.status().value() {
            return Ok(-value);
        }

        let key = game.hash();
        if !self.stats.contains_key(&key) {
            let prediction = eval.evaluate(game.board())?;
            if prediction.policy.len() != ACTION_SPACE {
                return Err(ChessError::Evaluator(format!(
                    "policy has {} entries, expected {ACTION_SPACE}",
                    prediction.policy.len()
                )));
            }
            trace!(key, value = prediction.value, "expanded");
            self.stats.insert(key, NodeStats::new(prediction.policy));
            return Ok(-prediction.value);
        }
        let stats = &self.stats[&key];

        let mover = game.team_to_move();
        let sqrt_visits = (stats.visits as f32).sqrt();
        let mut max_u = f32::NEG_INFINITY;
        let mut best = None;
        for mv in game.legal_moves() {
            let a = action_index(mv, mover)?;
            let u = stats.q[a] + self.c_puct * stats.p[a] * sqrt_visits / (1.0 + stats.n[a] as f32);
            if u > max_u {
                max_u = u;
                best = Some((*mv, a));
            }
        }
        let Some((mv, a)) = best else {
            warn!(key, "no selectable move, prior is unusable");
            return Ok(0.0);
        };

        game.do_move(&mv)?;
        let result = self.search(game, eval);
        game.undo_move()?;
        let v = result?;

        if let Some(stats) = self.stats.get_mut(&key) {
            let n = stats.n[a] as f32;
            stats.q[a] = (n * stats.q[a] + v) / (n + 1.0);
            stats.n[a] += 1;
            stats.visits += 1;
        }
        Ok(-v)
    }

    /// Improved policy: visit counts normalised to sum to 1. All zeros if the
    /// position was expanded but never descended through.
    pub fn pi(&self, key: u64) -> Result<Vec<f32>> {
        let Some(stats) = self.stats.get(&key) else {
            warn!(key, "policy requested for an unvisited position");
            return Err(ChessError::UnvisitedPosition(key));
        };
        if stats.visits == 0 {
            return Ok(vec![0.0; ACTION_SPACE]);
        }
        let total = stats.visits as f32;
        Ok(stats.n.iter().map(|&n| n as f32 / total).collect())
    }

    /// Legal move with the largest share of visits, with its mean value. `None`
    /// when no legal action was ever visited.
    pub fn choose_move(&self, game: &Game) -> Result<Option<(Move, f32)>> {
        let key = game.hash();
        let pi = self.pi(key)?;
        let mover = game.team_to_move();
        let mut best = None;
        let mut max_p = 0.0;
        for mv in game.legal_moves() {
            let a = action_index(mv, mover)?;
            if pi[a] > max_p {
                max_p = pi[a];
                best = Some((*mv, a));
            }
        }
        Ok(best.map(|(mv, a)| {
            let q = self.stats.get(&key).map_or(0.0, |s| s.q[a]);
            (mv, q)
        }))
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tree_tests;
