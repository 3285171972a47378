//! Driver configuration, read from a TOML file.
//!
//! ```toml
//! engine = "puct"
//! model_path = "models/v001/model.onnx"
//!
//! [puct]
//! simulations = 400
//! c_puct = 0.2
//!
//! [alphabeta]
//! max_depth = 4
//! quiescence_depth = 2
//! ```
//!
//! Every field is optional.

use std::path::{Path, PathBuf};

use alphabeta_engine::{AlphaBetaConfig, AlphaBetaEngine};
use chess_core::{ChessError, Engine, MaterialEvaluator, Result, SearchBudget};
use puct_engine::{PuctConfig, PuctEngine};
use random_engine::RandomEngine;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Puct,
    #[default]
    Alphabeta,
    Random,
}

impl EngineKind {
    pub fn parse(txt: &str) -> Option<Self> {
        match txt.to_ascii_lowercase().as_str() {
            "puct" => Some(EngineKind::Puct),
            "alphabeta" => Some(EngineKind::Alphabeta),
            "random" => Some(EngineKind::Random),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub engine: EngineKind,
    /// ONNX network for the PUCT engine. Needs the `onnx` feature.
    pub model_path: Option<PathBuf>,
    pub puct: PuctConfig,
    pub alphabeta: AlphaBetaConfig,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let txt = std::fs::read_to_string(path)
            .map_err(|e| ChessError::Config(format!("{}: {e}", path.display())))?;
        Self::parse(&txt)
    }

    pub fn parse(txt: &str) -> Result<Self> {
        toml::from_str(txt).map_err(|e| ChessError::Config(e.to_string()))
    }

    pub fn budget(&self) -> SearchBudget {
        SearchBudget {
            max_depth: self.alphabeta.max_depth,
            simulations: self.puct.simulations,
        }
    }

    pub fn build_engine(&self) -> Result<Box<dyn Engine>> {
        Ok(match self.engine {
            EngineKind::Random => Box::new(RandomEngine::new()),
            EngineKind::Alphabeta => Box::new(AlphaBetaEngine::new(MaterialEvaluator, self.alphabeta)),
            EngineKind::Puct => self.build_puct()?,
        })
    }

    #[cfg(feature = "onnx")]
    fn build_puct(&self) -> Result<Box<dyn Engine>> {
        match &self.model_path {
            Some(path) => {
                let evaluator = puct_engine::OnnxEvaluator::load(path)?;
                Ok(Box::new(PuctEngine::new(evaluator, self.puct)))
            }
            None => Ok(Box::new(PuctEngine::new(MaterialEvaluator, self.puct))),
        }
    }

    #[cfg(not(feature = "onnx"))]
    fn build_puct(&self) -> Result<Box<dyn Engine>> {
        if let Some(path) = &self.model_path {
            tracing::warn!(
                path = %path.display(),
                "built without the onnx feature, using the material evaluator"
            );
        }
        Ok(Box::new(PuctEngine::new(MaterialEvaluator, self.puct)))
    }
}
