use serde::{Deserialize, Serialize};

/// Game statistics tracking score, lines cleared, and piece count.
///
/// # Scoring
///
/// - Each cleared line is worth a flat `points_per_line` (no multi-line bonus)
/// - A hard drop adds `hard_drop_bonus_per_row` for every row the piece fell
///
/// Both rates come from [`GameConfig`](super::GameConfig).
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4, 400);
/// stats.add_drop_bonus(30);
///
/// assert_eq!(stats.score(), 430);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: u64,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of line clears by count.
    ///
    /// Index `n` is the number of locks that cleared exactly `n` lines. Clears of more
    /// than four lines (only possible on custom board shapes) are counted in the total
    /// but not in the histogram.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece lock.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize, points: u64) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if cleared_lines < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_lines] += 1;
        }
        self.score += points;
    }

    pub const fn add_drop_bonus(&mut self, points: u64) {
        self.score += points;
    }
}
