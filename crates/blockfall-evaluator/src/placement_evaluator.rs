//! Placement evaluation: scoring a single piece placement.
//!
//! A [`PlacementEvaluator`] turns a [`PlacementAnalysis`] into a score where lower is
//! better. The [`HeuristicEvaluator`] computes it in two steps:
//!
//! 1. **Base score** - the stage-adaptive weighted sum of the board features
//!    (see [`crate::weights`])
//! 2. **Adjustments** - named [`PlacementAdjustment`] terms added on top, each testable
//!    on its own
//!
//! ```text
//! score = weights(max_height) · features + Σ adjustmentᵢ
//! ```
//!
//! # Usage
//!
//! ```
//! use blockfall_engine::{Board, Piece, PieceKind};
//! use blockfall_evaluator::{
//!     placement_analysis::PlacementAnalysis,
//!     placement_evaluator::{EdgeIPieceBonus, HeuristicEvaluator, PlacementEvaluator},
//!     weights::StageWeights,
//! };
//!
//! let evaluator = HeuristicEvaluator::new(StageWeights::default())
//!     .with_adjustment(EdgeIPieceBonus::new(0.3));
//!
//! let board = Board::default();
//! let flat = PlacementAnalysis::from_board(&board, Piece::new(PieceKind::I, 0, 0, 18));
//! let upright = PlacementAnalysis::from_board(&board, Piece::new(PieceKind::I, 1, 4, 16));
//! assert!(evaluator.evaluate_placement(&flat) < evaluator.evaluate_placement(&upright));
//! ```

use std::fmt;

use blockfall_engine::PieceKind;

use crate::{
    SearchConfig, SearchConfigError, placement_analysis::PlacementAnalysis, weights::StageWeights,
};

/// Evaluates piece placements by assigning scores.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    /// Evaluates a placement and returns a score (lower is better).
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32;
}

/// A named term added to the base heuristic score of a placement.
pub trait PlacementAdjustment: fmt::Debug + Send + Sync {
    /// Returns the amount to add to the score. Negative values reward the placement.
    fn adjustment(&self, analysis: &PlacementAnalysis) -> f32;
}

/// Rewards an upright I piece standing against the left or right wall.
///
/// Keeping the I piece in an edge well preserves the flat middle of the stack.
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
/// use blockfall_evaluator::{
///     placement_analysis::PlacementAnalysis,
///     placement_evaluator::{EdgeIPieceBonus, PlacementAdjustment},
/// };
///
/// let bonus = EdgeIPieceBonus::new(0.5);
/// let board = Board::default();
/// let at_wall = PlacementAnalysis::from_board(&board, Piece::new(PieceKind::I, 1, 9, 16));
/// let in_middle = PlacementAnalysis::from_board(&board, Piece::new(PieceKind::I, 1, 5, 16));
/// assert_eq!(bonus.adjustment(&at_wall), -0.5);
/// assert_eq!(bonus.adjustment(&in_middle), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeIPieceBonus {
    bonus: f32,
}

impl EdgeIPieceBonus {
    #[must_use]
    pub fn new(bonus: f32) -> Self {
        Self { bonus }
    }

    #[must_use]
    pub fn bonus(&self) -> f32 {
        self.bonus
    }
}

impl PlacementAdjustment for EdgeIPieceBonus {
    fn adjustment(&self, analysis: &PlacementAnalysis) -> f32 {
        let placement = analysis.placement();
        if placement.kind() != PieceKind::I {
            return 0.0;
        }

        let mut columns = placement.occupied_positions().map(|(x, _y)| x);
        let Some(column) = columns.next() else {
            return 0.0;
        };
        let upright = columns.all(|x| x == column);
        let width = analysis.board_analysis().board().width();
        let last_column = i32::try_from(width).unwrap_or(i32::MAX) - 1;
        if upright && (column == 0 || column == last_column) {
            -self.bonus
        } else {
            0.0
        }
    }
}

/// Scores placements with stage-adaptive heuristic weights plus adjustments.
#[derive(Debug)]
pub struct HeuristicEvaluator {
    weights: StageWeights,
    adjustments: Vec<Box<dyn PlacementAdjustment>>,
}

impl HeuristicEvaluator {
    /// Creates an evaluator without adjustments.
    #[must_use]
    pub fn new(weights: StageWeights) -> Self {
        Self {
            weights,
            adjustments: Vec::new(),
        }
    }

    /// Creates the evaluator described by `config`, after validating it.
    ///
    /// The edge I bonus is added only when it is non-zero.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchConfigError> {
        config.validate()?;
        let evaluator = Self::new(config.weights.clone());
        if config.edge_i_bonus.abs() < f32::EPSILON {
            Ok(evaluator)
        } else {
            Ok(evaluator.with_adjustment(EdgeIPieceBonus::new(config.edge_i_bonus)))
        }
    }

    #[must_use]
    pub fn with_adjustment<A>(mut self, adjustment: A) -> Self
    where
        A: PlacementAdjustment + 'static,
    {
        self.adjustments.push(Box::new(adjustment));
        self
    }

    #[must_use]
    pub fn weights(&self) -> &StageWeights {
        &self.weights
    }

    /// The weighted feature sum alone, without adjustments.
    #[must_use]
    pub fn base_score(&self, analysis: &PlacementAnalysis) -> f32 {
        self.weights.score(&analysis.board_analysis().features())
    }
}

impl PlacementEvaluator for HeuristicEvaluator {
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
        let adjustment: f32 = self
            .adjustments
            .iter()
            .map(|adjustment| adjustment.adjustment(analysis))
            .sum();
        self.base_score(analysis) + adjustment
    }
}
