//! Evaluator interface shared by both searches.

use crate::board::Board;
use crate::encoding::ACTION_SPACE;
use crate::error::Result;
use crate::features::encode_planes;
use crate::types::PieceKind;

/// Evaluator output for one position, from the side to move's point of view.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Prior over all [`ACTION_SPACE`] action indices.
    pub policy: Vec<f32>,
    /// Expected outcome in [-1, 1].
    pub value: f32,
}

/// Maps board planes (see [`crate::features`]) to a policy and a value.
pub trait Evaluator {
    fn predict(&mut self, planes: &[f32]) -> Result<Prediction>;

    fn evaluate(&mut self, board: &Board) -> Result<Prediction> {
        self.predict(&encode_planes(board))
    }
}

/// Material count squashed into [-1, 1] with a uniform prior. Lets both searches
/// run without a trained model.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator;

pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

impl Evaluator for MaterialEvaluator {
    fn predict(&mut self, planes: &[f32]) -> Result<Prediction> {
        // Plane order: pawn, rook, bishop, knight, queen, king.
        const PLANE_KINDS: [PieceKind; 6] = [
            PieceKind::Pawn,
            PieceKind::Rook,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Queen,
            PieceKind::King,
        ];
        let mut score = 0i32;
        for (plane, chunk) in planes.chunks(64).enumerate().take(12) {
            let count = chunk.iter().filter(|&&x| x > 0.5).count() as i32;
            let v = piece_value(PLANE_KINDS[plane % 6]) * count;
            score += if plane < 6 { v } else { -v };
        }
        Ok(Prediction {
            policy: vec![1.0 / ACTION_SPACE as f32; ACTION_SPACE],
            value: (score as f32 / 1000.0).tanh(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_evaluator_is_side_relative() {
        let mut eval = MaterialEvaluator;
        let even = eval.evaluate(&Board::startpos()).unwrap();
        assert_eq!(even.value, 0.0);
        assert_eq!(even.policy.len(), ACTION_SPACE);

        let white = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
        let black = Board::from_fen("4k3/8/8/8/8/8/8/Q3K3 b - - 0 1").unwrap();
        let up = eval.evaluate(&white).unwrap().value;
        let down = eval.evaluate(&black).unwrap().value;
        assert!(up > 0.5);
        assert!((up + down).abs() < 1e-6);
    }
}
