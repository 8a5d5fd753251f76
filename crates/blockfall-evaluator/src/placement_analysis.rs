//! Analysis of the board right after a piece is locked.
//!
//! [`PlacementAnalysis`] pairs a placement with the [`BoardAnalysis`] of the board it
//! produces. Full rows are left in place: the evaluator counts them as a feature, so a
//! placement that would clear lines can be rewarded for it. [`PlacementAnalysis::cleared_board`]
//! gives the board as the game would continue from it.
//!
//! ```
//! use blockfall_engine::{Board, Piece, PieceKind};
//! use blockfall_evaluator::placement_analysis::PlacementAnalysis;
//!
//! let board = Board::from_ascii(
//!     "
//!     #####.#####
//!     ",
//! );
//! // Vertical I dropped into the gap
//! let placement = Piece::new(PieceKind::I, 1, 4, 16);
//! let analysis = PlacementAnalysis::from_board(&board, placement);
//!
//! assert_eq!(analysis.board_analysis().complete_lines(), 1);
//! let (cleared, lines) = analysis.cleared_board();
//! assert_eq!(lines, 1);
//! assert_eq!(cleared.occupied_count(), 3);
//! ```

use blockfall_engine::{Board, Piece};

use crate::board_analysis::BoardAnalysis;

#[derive(Debug)]
pub struct PlacementAnalysis {
    placement: Piece,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    /// Locks `placement` onto a copy of `before_placement`.
    ///
    /// `placement` is expected to be a resting position, as found by
    /// [`Board::resting_y`].
    #[must_use]
    pub fn from_board(before_placement: &Board, placement: Piece) -> Self {
        Self {
            placement,
            board_analysis: BoardAnalysis::from_board(before_placement.lock(&placement)),
        }
    }

    #[must_use]
    pub fn placement(&self) -> &Piece {
        &self.placement
    }

    /// Metrics of the locked board, full rows included.
    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }

    /// The locked board with its full rows removed, and the number of rows removed.
    #[must_use]
    pub fn cleared_board(&self) -> (Board, usize) {
        self.board_analysis.board().clear_lines()
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.board_analysis.into_board()
    }
}
