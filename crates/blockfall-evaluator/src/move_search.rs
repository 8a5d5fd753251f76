//! Move search: choosing where to drop the current piece.
//!
//! # How It Works
//!
//! 1. **Enumerate** - For every rotation of the piece and every column `x` in
//!    `[0, width)`, drop the piece straight down from its current row. Pairs that have
//!    no resting row (the shape sticks out of the board at that column, or is blocked
//!    from the start) are discarded.
//! 2. **Score** - Lock each resting piece onto a copy of the board and score the result
//!    with the [`PlacementEvaluator`].
//! 3. **Select** - Take the candidate with the lowest score. Ties go to the earliest
//!    candidate in enumeration order (rotation first, then column).
//!
//! # Two-ply lookahead
//!
//! The next piece is not known when a decision is made, so
//! [`MoveSearch::find_best_move_with_lookahead`] ranks each first-ply candidate by the
//! expected best score of the following piece instead of its own score: the first-ply
//! board has its full rows cleared, every piece kind is spawned on it and searched, and
//! the seven best scores are averaged. A kind with no legal placement contributes
//! [`SearchConfig::no_move_penalty`].
//!
//! Enumeration is at most 4 rotations × width columns, so the lookahead stays within a
//! few hundred evaluations per decision on the standard board.
//!
//! # Usage
//!
//! ```
//! use blockfall_engine::{Board, Piece, PieceKind};
//! use blockfall_evaluator::{SearchConfig, move_search::MoveSearch};
//!
//! let search = MoveSearch::new(&SearchConfig::default()).unwrap();
//! let board = Board::from_ascii(
//!     "
//!     ###.#######
//!     ###.#######
//!     ###.#######
//!     ###.#######
//!     ",
//! );
//! let piece = Piece::spawn(PieceKind::I, board.width());
//!
//! let best = search.find_best_move(&board, &piece).unwrap();
//! assert_eq!((best.rotation(), best.x()), (1, 2));
//! assert_eq!(best.board().occupied_count(), 40);
//! ```

use blockfall_engine::{Board, Piece, PieceKind};
use tracing::{debug, trace};

use crate::{
    SearchConfig, SearchConfigError,
    placement_analysis::PlacementAnalysis,
    placement_evaluator::{HeuristicEvaluator, PlacementEvaluator},
};

/// One legal placement of a piece and the score of the board it produces.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCandidate {
    rotation: usize,
    x: i32,
    y: i32,
    board: Board,
    score: f32,
}

impl MoveCandidate {
    #[must_use]
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    /// Column of the piece's anchor.
    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Row of the piece's anchor once it rests.
    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// The board with the piece locked in, full rows not yet cleared.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Heuristic score of [`Self::board`] (lower is better).
    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }
}

/// Exhaustive placement search over a [`PlacementEvaluator`].
#[derive(Debug)]
pub struct MoveSearch {
    evaluator: Box<dyn PlacementEvaluator>,
    lookahead: bool,
    no_move_penalty: f32,
}

impl MoveSearch {
    /// Creates a search that scores with the [`HeuristicEvaluator`] described by `config`.
    ///
    /// Fails when `config` does not validate.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchConfigError> {
        Ok(Self {
            evaluator: Box::new(HeuristicEvaluator::from_config(config)?),
            lookahead: config.lookahead,
            no_move_penalty: config.no_move_penalty,
        })
    }

    /// Creates a single-ply search over an arbitrary evaluator.
    #[must_use]
    pub fn with_evaluator(evaluator: Box<dyn PlacementEvaluator>) -> Self {
        let defaults = SearchConfig::default();
        Self {
            evaluator,
            lookahead: defaults.lookahead,
            no_move_penalty: defaults.no_move_penalty,
        }
    }

    #[must_use]
    pub fn with_lookahead(mut self, lookahead: bool) -> Self {
        self.lookahead = lookahead;
        self
    }

    #[must_use]
    pub fn lookahead(&self) -> bool {
        self.lookahead
    }

    /// Lists every legal resting placement of `piece`, in rotation-then-column order.
    ///
    /// Each placement is dropped from the piece's current row, which is the spawn row for
    /// a freshly spawned piece. The position and rotation `piece` has are otherwise
    /// ignored; only its kind matters.
    #[must_use]
    pub fn enumerate_moves(&self, board: &Board, piece: &Piece) -> Vec<MoveCandidate> {
        let width = i32::try_from(board.width()).unwrap_or(i32::MAX);

        let mut candidates = Vec::new();
        for rotated in piece.all_rotations() {
            for x in 0..width {
                let Some(y) = board.resting_y(rotated.shape(), x, rotated.y()) else {
                    continue;
                };
                let analysis = PlacementAnalysis::from_board(board, rotated.with_x(x).with_y(y));
                let score = self.evaluator.evaluate_placement(&analysis);
                candidates.push(MoveCandidate {
                    rotation: rotated.rotation(),
                    x,
                    y,
                    board: analysis.into_board(),
                    score,
                });
            }
        }
        trace!(kind = %piece.kind(), candidates = candidates.len(), "enumerated moves");
        candidates
    }

    /// Returns the lowest-scoring placement, or `None` when `piece` has no legal placement.
    #[must_use]
    pub fn find_best_move(&self, board: &Board, piece: &Piece) -> Option<MoveCandidate> {
        self.enumerate_moves(board, piece)
            .into_iter()
            .min_by(|a, b| a.score.total_cmp(&b.score))
    }

    /// Returns the placement whose board gives the best expected score for the next piece.
    ///
    /// The returned candidate keeps its own single-ply score.
    #[must_use]
    pub fn find_best_move_with_lookahead(
        &self,
        board: &Board,
        piece: &Piece,
    ) -> Option<MoveCandidate> {
        self.enumerate_moves(board, piece)
            .into_iter()
            .map(|candidate| (self.expected_next_score(&candidate.board), candidate))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(expected, candidate)| {
                trace!(expected, "lookahead selected candidate");
                candidate
            })
    }

    /// Finds the move to play, with or without lookahead as configured.
    #[must_use]
    pub fn decide(&self, board: &Board, piece: &Piece) -> Option<MoveCandidate> {
        let best = if self.lookahead {
            self.find_best_move_with_lookahead(board, piece)
        } else {
            self.find_best_move(board, piece)
        };
        match &best {
            Some(candidate) => debug!(
                kind = %piece.kind(),
                rotation = candidate.rotation,
                x = candidate.x,
                score = candidate.score,
                lookahead = self.lookahead,
                "decided move"
            ),
            None => debug!(kind = %piece.kind(), "no legal move"),
        }
        best
    }

    /// Average over all piece kinds of the best score reachable on `board` once its full
    /// rows are cleared.
    #[expect(clippy::cast_precision_loss)]
    fn expected_next_score(&self, board: &Board) -> f32 {
        let (cleared, _lines) = board.clear_lines();
        let total: f32 = PieceKind::ALL
            .iter()
            .map(|&kind| {
                let next = Piece::spawn(kind, cleared.width());
                self.enumerate_moves(&cleared, &next)
                    .iter()
                    .map(MoveCandidate::score)
                    .min_by(f32::total_cmp)
                    .unwrap_or(self.no_move_penalty)
            })
            .sum();
        total / PieceKind::LEN as f32
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write as _;

    use super::*;
    use crate::weights::{HeuristicWeights, StageWeights};

    fn default_search() -> MoveSearch {
        MoveSearch::new(&SearchConfig::default()).unwrap()
    }

    fn spawn(kind: PieceKind) -> Piece {
        Piece::spawn(kind, 10)
    }

    /// Every cell filled except a checkerboard of single gaps: no piece fits anywhere.
    fn checkerboard() -> Board {
        let mut art = String::new();
        for y in 0..20 {
            for x in 0..10 {
                art.push(if (x + y) % 2 == 0 { '.' } else { '#' });
            }
            writeln!(art).unwrap();
        }
        Board::from_ascii(&art)
    }

    /// Scores every placement the same, so selection falls back to enumeration order.
    #[derive(Debug)]
    struct ConstantEvaluator;

    impl PlacementEvaluator for ConstantEvaluator {
        fn evaluate_placement(&self, _analysis: &PlacementAnalysis) -> f32 {
            1.0
        }
    }

    #[test]
    fn test_enumerate_counts_on_empty_board() {
        let search = default_search();
        let board = Board::default();
        // Columns where the shape would stick out of the right wall are dropped
        let cases = [
            (PieceKind::I, 7 + 10),
            (PieceKind::O, 9),
            (PieceKind::T, 8 + 8 + 8 + 9),
            (PieceKind::S, 8 + 8),
            (PieceKind::Z, 8 + 8),
            (PieceKind::J, 8 + 8 + 8 + 9),
            (PieceKind::L, 8 + 8 + 8 + 9),
        ];
        for (kind, expected) in cases {
            let candidates = search.enumerate_moves(&board, &spawn(kind));
            assert_eq!(candidates.len(), expected, "{kind}");
            assert!(candidates.iter().all(|c| c.board().occupied_count() == 4));
        }
    }

    #[test]
    fn test_enumerate_rests_on_stack() {
        let search = default_search();
        let board = Board::from_ascii(
            "
            ####......
            ####......
            ",
        );
        let candidates = search.enumerate_moves(&board, &spawn(PieceKind::O));
        let y_at = |x| candidates.iter().find(|c| c.x() == x).unwrap().y();
        assert_eq!(y_at(0), 16);
        assert_eq!(y_at(3), 16);
        assert_eq!(y_at(4), 18);
    }

    #[test]
    fn test_find_best_move_is_minimum() {
        let search = default_search();
        let board = Board::from_ascii(
            "
            ...#......
            #.###..#..
            ###.####.#
            ",
        );
        for kind in PieceKind::ALL {
            let candidates = search.enumerate_moves(&board, &spawn(kind));
            let best = search.find_best_move(&board, &spawn(kind)).unwrap();
            assert!(candidates.iter().all(|c| best.score() <= c.score()), "{kind}");
            assert!(candidates.contains(&best));
        }
    }

    #[test]
    fn test_ties_go_to_first_candidate() {
        let search = MoveSearch::with_evaluator(Box::new(ConstantEvaluator));
        let best = search
            .find_best_move(&Board::default(), &spawn(PieceKind::T))
            .unwrap();
        assert_eq!((best.rotation(), best.x()), (0, 0));

        let best = search
            .with_lookahead(true)
            .find_best_move_with_lookahead(&Board::default(), &spawn(PieceKind::T))
            .unwrap();
        assert_eq!((best.rotation(), best.x()), (0, 0));
    }

    #[test]
    fn test_no_legal_move() {
        let search = default_search();
        let board = checkerboard();
        for kind in PieceKind::ALL {
            assert!(search.enumerate_moves(&board, &spawn(kind)).is_empty());
            assert!(search.find_best_move(&board, &spawn(kind)).is_none());
            assert!(search.find_best_move_with_lookahead(&board, &spawn(kind)).is_none());
        }
    }

    #[test]
    fn test_best_move_prefers_line_clear() {
        let search = default_search();
        let board = Board::from_ascii(
            "
            #########.
            #########.
            #########.
            #########.
            ",
        );
        let best = search.find_best_move(&board, &spawn(PieceKind::I)).unwrap();
        assert_eq!((best.rotation(), best.x(), best.y()), (1, 9, 16));
        let (cleared, lines) = best.board().clear_lines();
        assert_eq!(lines, 4);
        assert_eq!(cleared, Board::default());
    }

    #[test]
    fn test_expected_next_score_penalizes_missing_kinds() {
        let search = default_search();
        let expected = search.expected_next_score(&checkerboard());
        assert!((expected - 1000.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_expected_next_score_mixes_penalty_and_real_scores() {
        let search = default_search();
        // Only a vertical I fits the single open column; the other six kinds are blocked
        let well = Board::from_ascii(&".#########\n".repeat(20));
        for kind in PieceKind::ALL {
            let candidates = search.enumerate_moves(&well, &spawn(kind));
            let expected_len = usize::from(kind == PieceKind::I);
            assert_eq!(candidates.len(), expected_len, "{kind}");
        }

        let i_best = search
            .find_best_move(&well, &spawn(PieceKind::I))
            .unwrap()
            .score();
        assert!(i_best < 1000.0);
        let expected = search.expected_next_score(&well);
        assert!((expected - (i_best + 6.0 * 1000.0) / 7.0).abs() < 1e-3);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SearchConfig {
            no_move_penalty: f32::NAN,
            lookahead: true,
            ..SearchConfig::default()
        };
        assert_eq!(
            MoveSearch::new(&config).err(),
            Some(SearchConfigError::NonFiniteValue {
                name: "no_move_penalty"
            })
        );
    }

    #[test]
    fn test_expected_next_score_clears_lines_first() {
        let search = default_search();
        let full = Board::from_ascii(&"##########\n".repeat(20));
        let empty = Board::default();
        let expected_full = search.expected_next_score(&full);
        let expected_empty = search.expected_next_score(&empty);
        assert!((expected_full - expected_empty).abs() < f32::EPSILON);
        assert!(expected_empty < 1000.0);
    }

    #[test]
    fn test_lookahead_minimizes_expected_score() {
        let search = default_search().with_lookahead(true);
        let board = Board::from_ascii(
            "
            .....#....
            ##..###.##
            ###.####.#
            ",
        );
        let piece = spawn(PieceKind::S);
        let best = search.decide(&board, &piece).unwrap();

        let keys: Vec<_> = search
            .enumerate_moves(&board, &piece)
            .iter()
            .map(|c| search.expected_next_score(c.board()))
            .collect();
        let best_key = search.expected_next_score(best.board());
        assert!(keys.iter().all(|key| best_key <= *key));
    }

    #[test]
    fn test_decide_without_lookahead_matches_find_best_move() {
        let search = default_search();
        assert!(!search.lookahead());
        let board = Board::from_ascii(
            "
            #...##....
            ##.####.#.
            ",
        );
        for kind in PieceKind::ALL {
            assert_eq!(
                search.decide(&board, &spawn(kind)),
                search.find_best_move(&board, &spawn(kind))
            );
        }
    }

    #[test]
    fn test_fixed_weights_search() {
        // Only holes matter: any placement without a hole scores zero
        let weights = StageWeights::fixed(HeuristicWeights {
            height: 0.0,
            holes: 1.0,
            bumpiness: 0.0,
            lines: 0.0,
        })
        .unwrap();
        let search = MoveSearch::with_evaluator(Box::new(HeuristicEvaluator::new(weights)));
        let board = Board::from_ascii(
            "
            #.........
            ",
        );
        let best = search.find_best_move(&board, &spawn(PieceKind::O)).unwrap();
        assert!(best.score().abs() < f32::EPSILON);
        assert_eq!((best.rotation(), best.x()), (0, 1));
    }
}
