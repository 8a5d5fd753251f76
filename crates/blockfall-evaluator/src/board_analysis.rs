//! Lazily computed metrics of a locked board.
//!
//! [`BoardAnalysis`] owns a board and computes each metric on first access, so an
//! evaluator that only needs a subset of the metrics pays only for those.
//!
//! Heights are measured from the bottom: a column whose topmost block sits in row `y`
//! has height `board.height() - y`, and an empty column has height 0.

use std::{cell::OnceCell, iter};

use blockfall_engine::Board;
use serde::{Deserialize, Serialize};

/// The four heuristic features of a board, plus the danger level used to pick weights.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardFeatures {
    /// Sum of all column heights.
    pub aggregate_height: usize,
    /// Empty cells with at least one block above them in the same column.
    pub holes: usize,
    /// Surface unevenness; see [`BoardAnalysis::bumpiness`].
    pub bumpiness: f32,
    /// Rows that are completely filled.
    pub complete_lines: usize,
    /// Height of the tallest column.
    pub max_height: usize,
}

#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<Vec<usize>>,
    column_occupied_cells: OnceCell<Vec<usize>>,
    aggregate_height: OnceCell<usize>,
    max_height: OnceCell<usize>,
    num_holes: OnceCell<usize>,
    bumpiness: OnceCell<f32>,
    complete_lines: OnceCell<usize>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            aggregate_height: OnceCell::new(),
            max_height: OnceCell::new(),
            num_holes: OnceCell::new(),
            bumpiness: OnceCell::new(),
            complete_lines: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }

    #[must_use]
    pub fn column_heights(&self) -> &[usize] {
        self.column_heights.get_or_init(|| {
            let height = self.board.height();
            (0..self.board.width())
                .map(|x| {
                    (0..height)
                        .find(|&y| self.board.is_occupied(x, y))
                        .map_or(0, |top| height - top)
                })
                .collect()
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[usize] {
        self.column_occupied_cells.get_or_init(|| {
            (0..self.board.width())
                .map(|x| {
                    (0..self.board.height())
                        .filter(|&y| self.board.is_occupied(x, y))
                        .count()
                })
                .collect()
        })
    }

    #[must_use]
    pub fn aggregate_height(&self) -> usize {
        *self
            .aggregate_height
            .get_or_init(|| self.column_heights().iter().sum())
    }

    #[must_use]
    pub fn max_height(&self) -> usize {
        *self
            .max_height
            .get_or_init(|| self.column_heights().iter().copied().max().unwrap_or(0))
    }

    /// Every cell below a column's top block that is not itself a block is a hole.
    #[must_use]
    pub fn num_holes(&self) -> usize {
        *self.num_holes.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| h - occ)
                .sum()
        })
    }

    /// Sum of absolute height differences between adjacent columns.
    ///
    /// The two pairs that involve a wall column (leftmost and rightmost) count half,
    /// since an uneven edge is easier to fill than an uneven middle.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn bumpiness(&self) -> f32 {
        *self.bumpiness.get_or_init(|| {
            let heights = self.column_heights();
            let last_pair = heights.len().saturating_sub(2);
            heights
                .windows(2)
                .enumerate()
                .map(|(i, w)| {
                    let diff = w[0].abs_diff(w[1]) as f32;
                    if i == 0 || i == last_pair {
                        diff * 0.5
                    } else {
                        diff
                    }
                })
                .sum()
        })
    }

    #[must_use]
    pub fn complete_lines(&self) -> usize {
        *self.complete_lines.get_or_init(|| {
            (0..self.board.height())
                .filter(|&y| self.board.is_row_full(y))
                .count()
        })
    }

    #[must_use]
    pub fn features(&self) -> BoardFeatures {
        BoardFeatures {
            aggregate_height: self.aggregate_height(),
            holes: self.num_holes(),
            bumpiness: self.bumpiness(),
            complete_lines: self.complete_lines(),
            max_height: self.max_height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::BoardSize;

    use super::*;

    mod test_boards {
        use super::*;

        pub fn flat() -> Board {
            Board::from_ascii(
                "
                ##########
                ##########
                ",
            )
        }

        pub fn staircase() -> Board {
            Board::from_ascii(
                "
                #.........
                ##........
                ###.......
                ####......
                #####.....
                ",
            )
        }

        pub fn single_hole() -> Board {
            Board::from_ascii(
                "
                #.........
                ..........
                #.........
                ",
            )
        }

        pub fn right_tower() -> Board {
            Board::from_ascii(
                "
                .........#
                .........#
                .........#
                ",
            )
        }
    }

    fn analyze(board: Board) -> BoardAnalysis {
        BoardAnalysis::from_board(board)
    }

    #[test]
    fn test_empty_board() {
        let analysis = analyze(Board::default());
        assert_eq!(analysis.column_heights(), &[0; 10]);
        assert_eq!(analysis.features(), BoardFeatures::default());
    }

    #[test]
    fn test_flat_board() {
        let analysis = analyze(test_boards::flat());
        assert_eq!(analysis.column_heights(), &[2; 10]);
        assert_eq!(analysis.aggregate_height(), 20);
        assert_eq!(analysis.max_height(), 2);
        assert_eq!(analysis.num_holes(), 0);
        assert!(analysis.bumpiness().abs() < f32::EPSILON);
        assert_eq!(analysis.complete_lines(), 2);
    }

    #[test]
    fn test_staircase() {
        let analysis = analyze(test_boards::staircase());
        assert_eq!(analysis.column_heights(), &[5, 4, 3, 2, 1, 0, 0, 0, 0, 0]);
        assert_eq!(analysis.aggregate_height(), 15);
        assert_eq!(analysis.max_height(), 5);
        assert_eq!(analysis.num_holes(), 0);
        // Pair 0-1 counts half
        assert!((analysis.bumpiness() - 4.5).abs() < f32::EPSILON);
        assert_eq!(analysis.complete_lines(), 0);
    }

    #[test]
    fn test_right_edge_pair_counts_half() {
        let analysis = analyze(test_boards::right_tower());
        assert!((analysis.bumpiness() - 1.5).abs() < f32::EPSILON);
        assert_eq!(analysis.max_height(), 3);
    }

    #[test]
    fn test_middle_pairs_count_fully() {
        let analysis = analyze(Board::from_ascii(
            "
            ....#.....
            ....#.....
            ",
        ));
        assert!((analysis.bumpiness() - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_single_hole() {
        let analysis = analyze(test_boards::single_hole());
        assert_eq!(analysis.column_heights()[0], 3);
        assert_eq!(analysis.column_occupied_cells()[0], 2);
        assert_eq!(analysis.num_holes(), 1);
    }

    #[test]
    fn test_covered_cell_adds_exactly_one_hole() {
        let base = analyze(Board::from_ascii(
            "
            ...#......
            .#.#...##.
            ##.#.####.
            ",
        ));
        let covered = analyze(Board::from_ascii(
            "
            ...#.#....
            .#.#...##.
            ##.#.####.
            ",
        ));
        assert_eq!(covered.num_holes(), base.num_holes() + 1);
        for x in (0..10).filter(|&x| x != 5) {
            assert_eq!(covered.column_heights()[x], base.column_heights()[x], "column {x}");
        }
        assert_eq!(covered.complete_lines(), base.complete_lines());
    }

    #[test]
    fn test_holes_under_overhang_count_per_cell() {
        let analysis = analyze(Board::from_ascii(
            "
            ###.......
            ..........
            ..........
            ",
        ));
        assert_eq!(analysis.num_holes(), 6);
        assert_eq!(analysis.aggregate_height(), 9);
    }

    #[test]
    fn test_complete_lines_ignore_partial_rows() {
        let analysis = analyze(Board::from_ascii(
            "
            #########.
            ##########
            .#########
            ##########
            ",
        ));
        assert_eq!(analysis.complete_lines(), 2);
    }

    #[test]
    fn test_small_board() {
        let size = BoardSize::new(6, 4).unwrap();
        let analysis = analyze(Board::from_ascii_sized(
            size,
            "
            #.....
            #....#
            ######
            ",
        ));
        assert_eq!(analysis.column_heights(), &[3, 1, 1, 1, 1, 2]);
        // 0.5 * 2 + 0 + 0 + 0 + 0.5 * 1
        assert!((analysis.bumpiness() - 1.5).abs() < f32::EPSILON);
        assert_eq!(analysis.complete_lines(), 1);
    }

    #[test]
    fn test_into_board_returns_analyzed_board() {
        let board = test_boards::staircase();
        let analysis = analyze(board.clone());
        let _ = analysis.features();
        assert_eq!(analysis.into_board(), board);
    }
}
