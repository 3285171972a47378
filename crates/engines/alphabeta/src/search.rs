//! Negamax search with alpha-beta pruning and a position-keyed memo.

use std::collections::HashMap;

use chess_core::{Evaluator, Game, Move, Result};
use tracing::{debug, trace};

/// Score of a position where the side to move delivers mate.
pub const MATE_SCORE: f32 = 1.0;

/// Root window, wide enough to hold any score.
const WINDOW: f32 = 100.0;

#[derive(Debug, Clone, Copy)]
struct MemoEntry {
    best_move: Move,
    depth: u8,
    score: f32,
}

#[derive(Debug, Clone, Copy)]
struct QuiesceEntry {
    depth: u8,
    score: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct RootOutcome {
    pub best_move: Option<Move>,
    pub score: f32,
    /// Last completed iteration.
    pub depth: u8,
}

/// Search state that outlives a single root search: both memo tables and the
/// node counter.
#[derive(Debug, Default)]
pub struct Searcher {
    memo: HashMap<u64, MemoEntry>,
    quiesce_memo: HashMap<u64, QuiesceEntry>,
    pub quiescence_depth: u8,
    pub nodes: u64,
}

impl Searcher {
    pub fn new(quiescence_depth: u8) -> Self {
        Self {
            quiescence_depth,
            ..Self::default()
        }
    }

    pub fn clear(&mut self) {
        self.memo.clear();
        self.quiesce_memo.clear();
        self.nodes = 0;
    }

    /// Number of positions with a remembered best move.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Iterative deepening from depth 1 up to `max_depth`, stopping early once a
    /// forced mate is found. Each iteration starts with the previous best move.
    pub fn search_root<E: Evaluator>(
        &mut self,
        game: &mut Game,
        eval: &mut E,
        max_depth: u8,
    ) -> Result<RootOutcome> {
        let mut moves = game.legal_moves().to_vec();
        let mut outcome = RootOutcome {
            best_move: None,
            score: -WINDOW,
            depth: 0,
        };

        for depth in 1..=max_depth.max(1) {
            let mut best: Option<(Move, f32)> = None;
            for mv in &moves {
                game.do_move(mv)?;
                let result = self.alpha_beta(game, eval, -WINDOW, WINDOW, depth - 1);
                game.undo_move()?;
                let score = -result?;
                if best.is_none_or(|(_, s)| score > s) {
                    best = Some((*mv, score));
                }
            }

            let Some((mv, score)) = best else {
                break;
            };
            outcome = RootOutcome {
                best_move: Some(mv),
                score,
                depth,
            };
            debug!(depth, %mv, score, nodes = self.nodes, "iteration complete");
            if score >= MATE_SCORE {
                break;
            }
            if let Some(idx) = moves.iter().position(|m| *m == mv) {
                moves[..=idx].rotate_right(1);
            }
        }
        Ok(outcome)
    }

    fn alpha_beta<E: Evaluator>(
        &mut self,
        game: &mut Game,
        eval: &mut E,
        mut alpha: f32,
        beta: f32,
        depth_left: u8,
    ) -> Result<f32> {
        self.nodes += 1;
        if depth_left == 0 {
            return self.quiesce(game, eval, alpha, beta, self.quiescence_depth);
        }
        if let Some(value) = game.status().value() {
            return Ok(value);
        }

        let key = game.hash();
        let remembered = self.memo.get(&key).copied();
        let mut best_move = None;
        if let Some(entry) = remembered {
            if entry.depth >= depth_left {
                trace!(key, depth = entry.depth, "memo cutoff");
                return Ok(entry.score);
            }
            // Hashes can collide, so the hint is only used if it is legal here.
            let hint = game
                .legal_moves()
                .iter()
                .copied()
                .find(|m| m.same_action(&entry.best_move));
            if let Some(hint) = hint {
                best_move = Some(hint);
                game.do_move(&hint)?;
                let result = self.alpha_beta(game, eval, -beta, -alpha, depth_left - 1);
                game.undo_move()?;
                let score = -result?;
                if score >= beta {
                    return Ok(beta);
                }
                if score > alpha {
                    alpha = score;
                }
            }
        }

        let hint = best_move;
        for mv in game.legal_moves().to_vec() {
            if hint == Some(mv) {
                continue;
            }
            game.do_move(&mv)?;
            let result = self.alpha_beta(game, eval, -beta, -alpha, depth_left - 1);
            game.undo_move()?;
            let score = -result?;
            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
                best_move = Some(mv);
            }
        }

        if let Some(best_move) = best_move {
            if remembered.is_none_or(|e| depth_left >= e.depth) {
                self.memo.insert(
                    key,
                    MemoEntry {
                        best_move,
                        depth: depth_left,
                        score: alpha,
                    },
                );
            }
        }
        Ok(alpha)
    }

    /// Leaf evaluation: the evaluator's value clamped into the window, extended by
    /// up to `depth_left` plies of captures.
    fn quiesce<E: Evaluator>(
        &mut self,
        game: &mut Game,
        eval: &mut E,
        mut alpha: f32,
        beta: f32,
        depth_left: u8,
    ) -> Result<f32> {
        if let Some(value) = game.status().value() {
            return Ok(value);
        }

        let key = game.hash();
        if let Some(entry) = self.quiesce_memo.get(&key) {
            if entry.depth >= depth_left {
                return Ok(entry.score);
            }
        }

        let stand_pat = eval.evaluate(game.board())?.value;
        if stand_pat >= beta {
            return Ok(beta);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        if depth_left > 0 {
            let captures: Vec<Move> = game
                .legal_moves()
                .iter()
                .copied()
                .filter(Move::is_capture)
                .collect();
            for mv in captures {
                self.nodes += 1;
                game.do_move(&mv)?;
                let result = self.quiesce(game, eval, -beta, -alpha, depth_left - 1);
                game.undo_move()?;
                let score = -result?;
                if score >= beta {
                    return Ok(beta);
                }
                if score > alpha {
                    alpha = score;
                }
            }
        }

        self.quiesce_memo.insert(
            key,
            QuiesceEntry {
                depth: depth_left,
                score: alpha,
            },
        );
        Ok(alpha)
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
