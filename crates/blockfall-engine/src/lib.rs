pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reason a falling-piece command was refused.
///
/// Refusals never change the session; callers are free to ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveRejected {
    #[display("piece would collide or leave the board")]
    Collision,
    #[display("game is over")]
    GameOver,
}

/// Invalid configuration, reported when the configuration is built or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must be at least 6 wide and 4 high, got {width}x{height}")]
    BoardTooSmall { width: usize, height: usize },
}
