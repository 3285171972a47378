//! UCI command handling, independent of stdin/stdout so it can be tested.

use std::io::Write;

use chess_core::{move_to_uci, set_position_from_uci, Engine, Game, Result, SearchBudget};
use random_engine::fallback_move;
use tracing::{error, info, warn};

use crate::config::{EngineConfig, EngineKind};

pub struct Session {
    config: EngineConfig,
    engine: Box<dyn Engine>,
    budget: SearchBudget,
    game: Game,
}

impl Session {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let engine = config.build_engine()?;
        let budget = config.budget();
        Ok(Self {
            config,
            engine,
            budget,
            game: Game::new(),
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Handles one command line. Returns false on `quit`.
    pub fn handle(&mut self, line: &str, out: &mut impl Write) -> std::io::Result<bool> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            return Ok(true);
        };

        match command {
            "uci" => {
                writeln!(out, "id name {}", self.engine.name())?;
                writeln!(out, "id author {}", self.engine.author())?;
                writeln!(
                    out,
                    "option name Engine type combo default alphabeta var alphabeta var puct var random"
                )?;
                writeln!(out, "option name Depth type spin default {} min 1 max 8", self.budget.max_depth)?;
                writeln!(
                    out,
                    "option name Simulations type spin default {} min 1 max 100000",
                    self.budget.simulations
                )?;
                writeln!(out, "option name CPuct type string default {}", self.config.puct.c_puct)?;
                writeln!(
                    out,
                    "option name QuiescenceDepth type spin default {} min 0 max 8",
                    self.config.alphabeta.quiescence_depth
                )?;
                writeln!(out, "uciok")?;
            }
            "isready" => writeln!(out, "readyok")?,
            "setoption" => self.set_option(&parts[1..]),
            "ucinewgame" => {
                self.game = Game::new();
                self.engine.new_game();
            }
            "position" => match set_position_from_uci(&parts[1..]) {
                Ok(game) => self.game = game,
                Err(e) => error!(%e, "bad position command, keeping the previous position"),
            },
            "go" => self.go(out)?,
            "d" => {
                writeln!(out, "{}", self.game.board())?;
                writeln!(out, "fen {}", self.game.board().to_fen())?;
                writeln!(out, "status {:?}", self.game.status())?;
            }
            "quit" => return Ok(false),
            _ => warn!(command, "unknown command"),
        }
        out.flush()?;
        Ok(true)
    }

    /// `setoption name <name> value <value>`
    fn set_option(&mut self, args: &[&str]) {
        let name_at = args.iter().position(|&x| x == "name");
        let value_at = name_at.and_then(|n| {
            args[n + 1..]
                .iter()
                .position(|&x| x == "value")
                .map(|i| n + 1 + i)
        });
        let (Some(n), Some(v)) = (name_at, value_at) else {
            warn!(?args, "malformed setoption");
            return;
        };
        let name = args[n + 1..v].join(" ");
        let value = args[v + 1..].join(" ");

        let applied = match name.to_ascii_lowercase().as_str() {
            "depth" => value
                .parse::<u8>()
                .map(|d| self.budget.max_depth = d.clamp(1, 8))
                .is_ok(),
            "simulations" => value
                .parse::<u32>()
                .map(|s| self.budget.simulations = s.max(1))
                .is_ok(),
            "engine" => match EngineKind::parse(&value) {
                Some(kind) => {
                    self.config.engine = kind;
                    self.rebuild()
                }
                None => false,
            },
            // Engine tunables are kept in the config so they survive an engine switch.
            "cpuct" => match value.parse::<f32>() {
                Ok(c) if c.is_finite() && c >= 0.0 => {
                    self.config.puct.c_puct = c;
                    self.engine.set_option(&name, &value);
                    true
                }
                _ => false,
            },
            "quiescencedepth" => match value.parse::<u8>() {
                Ok(depth) => {
                    self.config.alphabeta.quiescence_depth = depth;
                    self.engine.set_option(&name, &value);
                    true
                }
                Err(_) => false,
            },
            _ => self.engine.set_option(&name, &value),
        };
        if !applied {
            warn!(%name, %value, "option not applied");
        }
    }

    fn rebuild(&mut self) -> bool {
        match self.config.build_engine() {
            Ok(engine) => {
                self.engine = engine;
                true
            }
            Err(e) => {
                error!(%e, "could not build engine");
                false
            }
        }
    }

    fn go(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        let status = self.game.status();
        if status.is_over() {
            info!(?status, "game is over");
        }

        let chosen = match self.engine.choose_move(&mut self.game, self.budget) {
            Ok(result) => {
                writeln!(
                    out,
                    "info depth {} nodes {} string score {:.3}",
                    result.depth, result.nodes, result.score
                )?;
                result.best_move
            }
            Err(e) => {
                error!(%e, "search failed");
                None
            }
        };
        // A search with no candidate still has to answer with some legal move.
        let best = chosen.or_else(|| fallback_move(&self.game));
        match best {
            Some(mv) => writeln!(out, "bestmove {}", move_to_uci(&mv))?,
            None => writeln!(out, "bestmove 0000")?,
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
