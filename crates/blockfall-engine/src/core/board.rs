use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

use super::piece::{Piece, PieceColor, PieceKind, Shape};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Locked block carrying the color of the piece it came from.
    Filled(PieceColor),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }
}

/// Dimensions of a board.
///
/// The width must be at least [`BoardSize::MIN_WIDTH`] so that every piece fits at the
/// spawn column, and the height at least [`BoardSize::MIN_HEIGHT`] so that every shape
/// matrix fits vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoardSize")]
pub struct BoardSize {
    width: usize,
    height: usize,
}

#[derive(Deserialize)]
struct RawBoardSize {
    width: usize,
    height: usize,
}

impl TryFrom<RawBoardSize> for BoardSize {
    type Error = ConfigError;

    fn try_from(raw: RawBoardSize) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl BoardSize {
    /// The standard 10×20 playfield.
    pub const STANDARD: Self = Self {
        width: 10,
        height: 20,
    };

    pub const MIN_WIDTH: usize = 6;
    pub const MIN_HEIGHT: usize = 4;

    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        if width < Self::MIN_WIDTH || height < Self::MIN_HEIGHT {
            return Err(ConfigError::BoardTooSmall { width, height });
        }
        Ok(Self { width, height })
    }

    #[must_use]
    pub const fn width(self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(self) -> usize {
        self.height
    }
}

/// Grid of locked blocks.
///
/// Row 0 is the top, column 0 the left. The board never contains the falling piece;
/// [`Board::composite`] produces a separate copy for display.
///
/// Every transforming operation ([`Board::lock`], [`Board::clear_lines`]) returns a
/// new board and leaves `self` untouched. The `*_in_place` variants exist for callers
/// that own the board and want to avoid the copy.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceKind};
///
/// let board = Board::from_ascii(
///     "
///     #####.#####
///     ",
/// );
/// let piece = Piece::new(PieceKind::I, 1, 4, 16);
/// assert!(board.can_place_piece(&piece));
///
/// let (cleared, lines) = board.lock(&piece).clear_lines();
/// assert_eq!(lines, 1);
/// assert_eq!(cleared.occupied_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: BoardSize,
    cells: Vec<Block>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty(BoardSize::STANDARD)
    }
}

impl Board {
    #[must_use]
    pub fn empty(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![Block::Empty; size.width * size.height],
        }
    }

    #[must_use]
    pub fn size(&self) -> BoardSize {
        self.size
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.size.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Returns the block at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the board.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Block {
        assert!(x < self.width() && y < self.height(), "({x}, {y}) out of board");
        self.cells[y * self.width() + x]
    }

    /// Returns the block at signed coordinates, or `None` outside the board.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<Block> {
        let (x, y) = self.index_of(x, y)?;
        Some(self.cells[y * self.width() + x])
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        !self.cell(x, y).is_empty()
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &[Block] {
        &self.cells[y * self.width()..][..self.width()]
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> {
        self.cells.chunks_exact(self.width())
    }

    /// A row is full when every one of its cells is occupied.
    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).iter().all(|b| !b.is_empty())
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|b| !b.is_empty()).count()
    }

    /// Checks whether `shape` fits with its top-left corner at `(x, y)`.
    ///
    /// A cell left of column 0, right of the last column, or below the last row is a
    /// collision. A cell above row 0 is not: pieces may spawn and rotate partially
    /// above the visible grid. A position so far out that a cell coordinate overflows
    /// is a collision too.
    #[must_use]
    pub fn can_place(&self, shape: &Shape, x: i32, y: i32) -> bool {
        let width = i32::try_from(self.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(self.height()).unwrap_or(i32::MAX);
        shape.occupied_cells().all(|(dx, dy)| {
            let (Some(bx), Some(by)) = (x.checked_add(dx), y.checked_add(dy)) else {
                return false;
            };
            if bx < 0 || bx >= width || by >= height {
                return false;
            }
            by < 0 || self.get(bx, by).is_some_and(Block::is_empty)
        })
    }

    #[must_use]
    pub fn can_place_piece(&self, piece: &Piece) -> bool {
        self.can_place(piece.shape(), piece.x(), piece.y())
    }

    /// Finds the row where `shape` comes to rest when dropped in column `x` from `start_y`.
    ///
    /// The row advances while the shape still fits one row lower. Returns `None` when the
    /// shape does not fit at the row it stopped on.
    #[must_use]
    pub fn resting_y(&self, shape: &Shape, x: i32, start_y: i32) -> Option<i32> {
        let mut y = start_y;
        while let Some(below) = y.checked_add(1) {
            if !self.can_place(shape, x, below) {
                break;
            }
            y = below;
        }
        self.can_place(shape, x, y).then_some(y)
    }

    /// Returns a copy of this board with `piece` written into it.
    ///
    /// Cells of the piece that fall outside the board are ignored.
    #[must_use]
    pub fn lock(&self, piece: &Piece) -> Self {
        let mut board = self.clone();
        board.lock_in_place(piece);
        board
    }

    /// Writes `piece` into this board, ignoring cells outside the board.
    pub fn lock_in_place(&mut self, piece: &Piece) {
        let block = Block::Filled(piece.color());
        for (x, y) in piece.occupied_positions() {
            if let Some((x, y)) = self.index_of(x, y) {
                let width = self.width();
                self.cells[y * width + x] = block;
            }
        }
    }

    /// Returns a copy of this board with the falling piece drawn over it, for display.
    #[must_use]
    pub fn composite(&self, piece: &Piece) -> Self {
        self.lock(piece)
    }

    /// Returns a copy with all full rows removed and the number of rows removed.
    ///
    /// Remaining rows keep their relative order and empty rows are added at the top.
    #[must_use]
    pub fn clear_lines(&self) -> (Self, usize) {
        let mut board = self.clone();
        let count = board.clear_lines_in_place();
        (board, count)
    }

    /// Clears full rows in place and returns the number of rows removed.
    pub fn clear_lines_in_place(&mut self) -> usize {
        let width = self.width();
        let mut count = 0;

        for y in (0..self.height()).rev() {
            if self.is_row_full(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                let src = y * width;
                self.cells.copy_within(src..src + width, src + count * width);
            }
        }

        // Fill cleared lines at the top with empty rows
        self.cells[..count * width].fill(Block::Empty);
        count
    }

    /// Creates a standard 10×20 board from ASCII art for testing.
    ///
    /// `.` is an empty cell, `#` a gray block, and a piece letter (`I`, `O`, `T`, ...) a
    /// block of that piece's color. Whitespace is ignored. Rows are bottom-aligned: the
    /// last line of `art` becomes row 19, so only the interesting rows need to be given.
    ///
    /// # Panics
    ///
    /// Panics if a row is not exactly 10 cells wide or there are more than 20 rows.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        Self::from_ascii_sized(BoardSize::STANDARD, art)
    }

    /// Same as [`Board::from_ascii`] for an arbitrary board size.
    #[must_use]
    pub fn from_ascii_sized(size: BoardSize, art: &str) -> Self {
        let mut board = Self::empty(size);
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= size.height,
            "At most {} rows allowed, got {}",
            size.height,
            lines.len()
        );

        let offset = size.height - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let blocks: Vec<Block> = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| match c {
                    '.' => Block::Empty,
                    '#' => Block::Filled(ASCII_BLOCK_COLOR),
                    other => Block::Filled(
                        PieceKind::from_char(other)
                            .unwrap_or_else(|| panic!("Unknown cell character {other:?}"))
                            .color(),
                    ),
                })
                .collect();
            assert_eq!(
                blocks.len(),
                size.width,
                "Each row must have exactly {} cells, got {} at row {}",
                size.width,
                blocks.len(),
                i
            );
            let start = (offset + i) * size.width;
            board.cells[start..start + size.width].copy_from_slice(&blocks);
        }
        board
    }

    fn index_of(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width() && y < self.height()).then_some((x, y))
    }
}

const ASCII_BLOCK_COLOR: PieceColor = PieceColor::from_rgb(0x80_80_80);

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for block in row {
                f.write_str(if block.is_empty() { "." } else { "#" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
