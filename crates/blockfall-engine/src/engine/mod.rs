//! Game rules on top of the core board and piece types.
//!
//! - [`GameSession`] - One game: locked board, falling piece, score, and game-over state
//! - [`GameConfig`] - Board size and scoring constants of a session
//! - [`GameStats`] - Score, locked pieces, and line clear counts
//! - [`PieceGenerator`] - Source of spawned piece kinds ([`RandomPieceGenerator`],
//!   [`SequencePieceGenerator`])
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] with a config and a piece generator
//! 2. Move, rotate, and drop the falling piece (by hand, by a gravity timer, or
//!    through [`GameSession::apply_placement`] for automated players)
//! 3. The piece locks, full rows are cleared and scored, and the next piece spawns
//! 4. Repeat until a spawned piece does not fit
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameConfig, GameSession, PieceSeed, RandomPieceGenerator};
//!
//! let generator = RandomPieceGenerator::with_seed(PieceSeed::from_u64(1));
//! let mut session = GameSession::new(GameConfig::default(), Box::new(generator));
//!
//! while !session.is_game_over() {
//!     session.hard_drop().unwrap();
//! }
//! assert!(session.stats().completed_pieces() > 0);
//! ```

pub use self::{game_config::*, game_session::*, game_stats::*, piece_generator::*};

mod game_config;
mod game_session;
mod game_stats;
mod piece_generator;
