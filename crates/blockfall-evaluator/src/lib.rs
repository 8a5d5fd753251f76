//! Automated player for blockfall: board heuristics, placement scoring, and move search.
//!
//! The evaluator is layered, each level built on the one below:
//!
//! ```text
//! Automated play (decide and apply, per-game statistics)
//!     ↓ uses
//! Move search (enumerate placements, pick the best, optional 2-ply lookahead)
//!     ↓ uses
//! Placement evaluation (heuristic score of one placement, plus adjustments)
//!     ↓ uses
//! Board analysis (heights, holes, bumpiness, complete lines)
//! ```
//!
//! # Modules
//!
//! - [`board_analysis`] - Lazily computed board metrics and the [`BoardFeatures`](board_analysis::BoardFeatures) value
//! - [`placement_analysis`] - A placement together with the analysis of the board it produces
//! - [`weights`] - Stage-adaptive weight tables selected by the height of the stack
//! - [`placement_evaluator`] - The [`PlacementEvaluator`](placement_evaluator::PlacementEvaluator)
//!   seam, the heuristic evaluator, and named score adjustments
//! - [`move_search`] - Exhaustive placement search and the 2-ply expectation
//! - [`auto_player`] - Decide-and-apply driver for a [`GameSession`](blockfall_engine::GameSession)
//!
//! Scores follow one convention throughout: lower is better.
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameConfig, GameSession, PieceSeed, RandomPieceGenerator};
//! use blockfall_evaluator::{SearchConfig, auto_player::AutoPlayer};
//!
//! let generator = RandomPieceGenerator::with_seed(PieceSeed::from_u64(3));
//! let mut session = GameSession::new(GameConfig::default(), Box::new(generator));
//! let mut player = AutoPlayer::new(&SearchConfig::default()).unwrap();
//!
//! let stats = player.play(&mut session, 50);
//! assert_eq!(stats.pieces_placed, session.stats().completed_pieces());
//! ```

pub use self::search_config::SearchConfig;

pub mod auto_player;
pub mod board_analysis;
pub mod move_search;
pub mod placement_analysis;
pub mod placement_evaluator;
mod search_config;
pub mod weights;

/// Invalid search configuration, reported when the configuration is built or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SearchConfigError {
    #[display("weight table must have at least one stage")]
    EmptyWeightTable,
    #[display("weight stage {index} is unbounded but is not the last stage")]
    UnboundedStageNotLast { index: usize },
    #[display("last weight stage must be unbounded")]
    MissingUnboundedStage,
    #[display("weight stage thresholds must increase, got {previous} then {threshold}")]
    NonIncreasingThreshold { previous: usize, threshold: usize },
    #[display("weight `{name}` of stage {index} is not finite")]
    NonFiniteWeight { index: usize, name: &'static str },
    #[display("`{name}` must be finite")]
    NonFiniteValue { name: &'static str },
}
