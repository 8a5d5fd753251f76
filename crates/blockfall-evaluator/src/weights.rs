//! Stage-adaptive heuristic weights.
//!
//! The heuristic score of a board is a weighted sum of its [`BoardFeatures`]:
//!
//! ```text
//! score = aggregate_height·Wh + holes·Wo + bumpiness·Wb + complete_lines·Wl
//! ```
//!
//! Lower is better, so penalties carry positive weights and the line weight is negative.
//! Which weights apply depends on the danger level, the height of the tallest column:
//! a [`StageWeights`] table holds one [`WeightStage`] per danger band, ordered from the
//! lowest stack to the highest.
//!
//! The default table plays aggressively while the stack is low and conservatively
//! near the top:
//!
//! | max height | height | holes | bumpiness | lines |
//! |------------|--------|-------|-----------|-------|
//! | < 8        | 0.22   | 1.25  | 0.35      | -2.8  |
//! | < 14       | 0.28   | 1.25  | 0.55      | -2.2  |
//! | otherwise  | 0.38   | 1.5   | 0.6       | -3.2  |

use serde::{Deserialize, Serialize};

use crate::{SearchConfigError, board_analysis::BoardFeatures};

/// One set of feature weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeuristicWeights {
    pub height: f32,
    pub holes: f32,
    pub bumpiness: f32,
    pub lines: f32,
}

impl HeuristicWeights {
    /// Weighted sum of the features (lower is better).
    ///
    /// ```
    /// use blockfall_evaluator::{board_analysis::BoardFeatures, weights::HeuristicWeights};
    ///
    /// let weights = HeuristicWeights { height: 1.0, holes: 10.0, bumpiness: 0.5, lines: -2.0 };
    /// let features = BoardFeatures {
    ///     aggregate_height: 4,
    ///     holes: 1,
    ///     bumpiness: 2.0,
    ///     complete_lines: 1,
    ///     max_height: 2,
    /// };
    /// assert_eq!(weights.score(&features), 4.0 + 10.0 + 1.0 - 2.0);
    /// ```
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn score(&self, features: &BoardFeatures) -> f32 {
        features.aggregate_height as f32 * self.height
            + features.holes as f32 * self.holes
            + features.bumpiness * self.bumpiness
            + features.complete_lines as f32 * self.lines
    }

    fn named_values(&self) -> [(&'static str, f32); 4] {
        [
            ("height", self.height),
            ("holes", self.holes),
            ("bumpiness", self.bumpiness),
            ("lines", self.lines),
        ]
    }
}

/// Weights that apply while the tallest column is below `below_max_height`.
///
/// `None` marks the last, unbounded stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightStage {
    pub below_max_height: Option<usize>,
    pub weights: HeuristicWeights,
}

impl WeightStage {
    fn applies_to(&self, max_height: usize) -> bool {
        self.below_max_height.is_none_or(|limit| max_height < limit)
    }
}

/// Ordered table of weight stages.
///
/// A table always has at least one stage, bounded stages come first with strictly
/// increasing thresholds, and the last stage is unbounded. Both [`StageWeights::new`] and
/// deserialization enforce this, so [`StageWeights::select`] always finds a stage.
///
/// # Example
///
/// ```
/// use blockfall_evaluator::weights::StageWeights;
///
/// let weights = StageWeights::default();
/// assert_eq!(weights.select(0).lines, -2.8);
/// assert_eq!(weights.select(8).lines, -2.2);
/// assert_eq!(weights.select(20).lines, -3.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WeightStage>", into = "Vec<WeightStage>")]
pub struct StageWeights {
    stages: Vec<WeightStage>,
}

impl Default for StageWeights {
    fn default() -> Self {
        Self {
            stages: vec![
                WeightStage {
                    below_max_height: Some(8),
                    weights: HeuristicWeights {
                        height: 0.22,
                        holes: 1.25,
                        bumpiness: 0.35,
                        lines: -2.8,
                    },
                },
                WeightStage {
                    below_max_height: Some(14),
                    weights: HeuristicWeights {
                        height: 0.28,
                        holes: 1.25,
                        bumpiness: 0.55,
                        lines: -2.2,
                    },
                },
                WeightStage {
                    below_max_height: None,
                    weights: HeuristicWeights {
                        height: 0.38,
                        holes: 1.5,
                        bumpiness: 0.6,
                        lines: -3.2,
                    },
                },
            ],
        }
    }
}

impl StageWeights {
    pub fn new(stages: Vec<WeightStage>) -> Result<Self, SearchConfigError> {
        let Some((last, bounded)) = stages.split_last() else {
            return Err(SearchConfigError::EmptyWeightTable);
        };

        let mut previous = None;
        for (index, stage) in bounded.iter().enumerate() {
            let Some(threshold) = stage.below_max_height else {
                return Err(SearchConfigError::UnboundedStageNotLast { index });
            };
            if let Some(previous) = previous
                && threshold <= previous
            {
                return Err(SearchConfigError::NonIncreasingThreshold {
                    previous,
                    threshold,
                });
            }
            previous = Some(threshold);
        }
        if last.below_max_height.is_some() {
            return Err(SearchConfigError::MissingUnboundedStage);
        }

        for (index, stage) in stages.iter().enumerate() {
            for (name, value) in stage.weights.named_values() {
                if !value.is_finite() {
                    return Err(SearchConfigError::NonFiniteWeight { index, name });
                }
            }
        }

        Ok(Self { stages })
    }

    /// A table with a single stage that applies at every height.
    pub fn fixed(weights: HeuristicWeights) -> Result<Self, SearchConfigError> {
        Self::new(vec![WeightStage {
            below_max_height: None,
            weights,
        }])
    }

    #[must_use]
    pub fn stages(&self) -> &[WeightStage] {
        &self.stages
    }

    /// Returns the weights of the first stage whose threshold is above `max_height`.
    #[must_use]
    pub fn select(&self, max_height: usize) -> &HeuristicWeights {
        let index = self
            .stages
            .iter()
            .position(|stage| stage.applies_to(max_height))
            .unwrap_or(self.stages.len() - 1);
        &self.stages[index].weights
    }

    /// Scores `features` with the weights selected by their max height.
    #[must_use]
    pub fn score(&self, features: &BoardFeatures) -> f32 {
        self.select(features.max_height).score(features)
    }
}

impl TryFrom<Vec<WeightStage>> for StageWeights {
    type Error = SearchConfigError;

    fn try_from(stages: Vec<WeightStage>) -> Result<Self, Self::Error> {
        Self::new(stages)
    }
}

impl From<StageWeights> for Vec<WeightStage> {
    fn from(weights: StageWeights) -> Self {
        weights.stages
    }
}
