use serde::{Deserialize, Serialize};

use crate::core::BoardSize;

/// Engine-side settings of a [`GameSession`](super::GameSession).
///
/// The defaults reproduce the classic rules: a 10×20 board, 100 points per cleared
/// line, and 2 points per row of hard drop.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "points_per_line": 40 }"#).unwrap();
/// assert_eq!(config.points_per_line, 40);
/// assert_eq!(config.board_size.width(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: BoardSize,
    pub points_per_line: u64,
    pub hard_drop_bonus_per_row: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: BoardSize::STANDARD,
            points_per_line: 100,
            hard_drop_bonus_per_row: 2,
        }
    }
}
