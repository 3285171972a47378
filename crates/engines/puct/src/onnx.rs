//! ONNX model loading and inference
//!
//! Expects a model taking a `(1, 768)` plane tensor and producing a policy of
//! 4672 logits-or-probabilities followed by a scalar value.
//! Requires the `onnx` feature to be enabled.

use std::path::Path;

use chess_core::{ChessError, Evaluator, Prediction, Result, ACTION_SPACE, NUM_FEATURES};
use tract_onnx::prelude::*;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

fn model_error(stage: &str, e: impl std::fmt::Display) -> ChessError {
    ChessError::Evaluator(format!("{stage}: {e}"))
}

/// The model must take exactly one plane encoding per position.
fn check_input_width(width: usize) -> Result<()> {
    if width != NUM_FEATURES {
        return Err(ChessError::Evaluator(format!(
            "model takes {width} inputs, expected {NUM_FEATURES}"
        )));
    }
    Ok(())
}

/// Evaluator backed by an ONNX policy/value network.
pub struct OnnxEvaluator {
    model: Plan,
}

impl OnnxEvaluator {
    /// Load an ONNX model from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| model_error("failed to load ONNX model", e))?
            .into_optimized()
            .map_err(|e| model_error("failed to optimize model", e))?
            .into_runnable()
            .map_err(|e| model_error("failed to make model runnable", e))?;

        let input_fact = model
            .model()
            .input_fact(0)
            .map_err(|e| model_error("failed to get input fact", e))?;
        let input_size = input_fact
            .shape
            .iter()
            .filter_map(|d| d.to_i64().ok())
            .product::<i64>() as usize;
        check_input_width(input_size)?;

        tracing::info!(path = %path.display(), input_size, "loaded ONNX evaluator");
        Ok(Self { model })
    }
}

impl Evaluator for OnnxEvaluator {
    fn predict(&mut self, planes: &[f32]) -> Result<Prediction> {
        check_input_width(planes.len())?;
        let input: Tensor = tract_ndarray::Array::from_shape_vec((1, NUM_FEATURES), planes.to_vec())
            .map_err(|e| model_error("bad input shape", e))?
            .into();
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| model_error("inference failed", e))?;

        let [policy_out, value_out] = outputs.as_slice() else {
            return Err(ChessError::Evaluator(format!(
                "expected policy and value outputs, got {}",
                outputs.len()
            )));
        };
        let policy: Vec<f32> = policy_out
            .to_array_view::<f32>()
            .map_err(|e| model_error("policy output", e))?
            .iter()
            .copied()
            .collect();
        if policy.len() != ACTION_SPACE {
            return Err(ChessError::Evaluator(format!(
                "policy has {} entries, expected {ACTION_SPACE}",
                policy.len()
            )));
        }
        let value = value_out
            .to_array_view::<f32>()
            .map_err(|e| model_error("value output", e))?
            .iter()
            .next()
            .copied()
            .unwrap_or(0.0);

        Ok(Prediction { policy, value })
    }
}
