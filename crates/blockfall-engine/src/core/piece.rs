use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// A falling piece with position, rotation, and type.
///
/// Pieces are immutable - movement and rotation operations return new `Piece` instances.
/// Whether the result actually fits on a board is decided by
/// [`Board::can_place`](super::board::Board::can_place); `Piece` itself knows nothing
/// about the board.
///
/// # Coordinate System
///
/// - `(x, y)` is the board position of the top-left corner of the shape matrix
/// - X increases rightward (columns), Y increases downward (rows)
/// - Both may be negative or past the board edge while a placement is being tested
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let piece = Piece::spawn(PieceKind::T, 10);
/// assert_eq!((piece.x(), piece.y()), (4, 0));
///
/// let moved = piece.right().rotated();
/// assert_eq!(moved.x(), 5);
/// assert_eq!(moved.rotation(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: usize,
    x: i32,
    y: i32,
}

impl Piece {
    /// Spawn row for every new piece.
    pub const SPAWN_Y: i32 = 0;

    /// Creates a piece of `kind` at its default spawn position for a board `board_width` wide.
    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        Self {
            kind,
            rotation: 0,
            x: spawn_x(board_width),
            y: Self::SPAWN_Y,
        }
    }

    #[must_use]
    pub const fn new(kind: PieceKind, rotation: usize, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation: rotation % kind.rotation_count(),
            x,
            y,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> usize {
        self.rotation
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn shape(&self) -> &'static Shape {
        self.kind.shape(self.rotation)
    }

    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.kind.color()
    }

    /// Board coordinates of every occupied cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape()
            .occupied_cells()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    #[must_use]
    pub const fn left(&self) -> Self {
        self.with_x(self.x - 1)
    }

    #[must_use]
    pub const fn right(&self) -> Self {
        self.with_x(self.x + 1)
    }

    #[must_use]
    pub const fn down(&self) -> Self {
        self.with_y(self.y + 1)
    }

    /// Advances to the next rotation state, wrapping modulo the rotation count.
    #[must_use]
    pub const fn rotated(&self) -> Self {
        self.with_rotation(self.rotation + 1)
    }

    #[must_use]
    pub const fn with_rotation(&self, rotation: usize) -> Self {
        Self::new(self.kind, rotation, self.x, self.y)
    }

    #[must_use]
    pub const fn with_x(&self, x: i32) -> Self {
        Self { x, ..*self }
    }

    #[must_use]
    pub const fn with_y(&self, y: i32) -> Self {
        Self { y, ..*self }
    }

    /// Returns this piece in every rotation state of its kind, starting from rotation 0.
    #[must_use]
    pub fn all_rotations(&self) -> ArrayVec<Self, 4> {
        (0..self.kind.rotation_count())
            .map(|rotation| self.with_rotation(rotation))
            .collect()
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn spawn_x(board_width: usize) -> i32 {
    (board_width / 2) as i32 - 1
}

/// Display color of a piece, stored as `0xRRGGBB`.
///
/// The engine never interprets the value; it is carried into locked cells so renderers
/// can draw them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceColor(u32);

impl PieceColor {
    #[must_use]
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00ff_ffff)
    }

    #[must_use]
    pub const fn rgb(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// Occupancy matrix of one rotation state of a piece.
///
/// Row 0 is the top of the matrix. A shape may contain empty rows or columns
/// (e.g. the horizontal I-piece occupies only row 1 of its 4×4 box), so the
/// anchor of a piece is not necessarily one of its occupied cells.
#[derive(Debug, PartialEq, Eq)]
pub struct Shape {
    rows: &'static [&'static [bool]],
}

impl Shape {
    /// Width of the bounding matrix (not of the occupied cells).
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    /// Iterates over the `(dx, dy)` offsets of every occupied cell, top to bottom.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_dx, cell)| **cell)
                .map(move |(dx, _cell)| (dx as i32, dy as i32))
        })
    }
}

/// The seven piece variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Number of distinct rotation states (1 for O, 2 for I/S/Z, 4 for T/J/L).
    #[must_use]
    pub const fn rotation_count(self) -> usize {
        PIECE_SHAPES[self as usize].len()
    }

    /// Shape of the given rotation state, wrapping modulo [`Self::rotation_count`].
    #[must_use]
    pub fn shape(self, rotation: usize) -> &'static Shape {
        let shapes = PIECE_SHAPES[self as usize];
        &shapes[rotation % shapes.len()]
    }

    #[must_use]
    pub const fn color(self) -> PieceColor {
        PIECE_COLORS[self as usize]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('S'), Some(PieceKind::S));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

const PIECE_COLORS: [PieceColor; PieceKind::LEN] = [
    PieceColor::from_rgb(0x00_f0_f0), // I: cyan
    PieceColor::from_rgb(0xf0_f0_00), // O: yellow
    PieceColor::from_rgb(0xa0_00_f0), // T: purple
    PieceColor::from_rgb(0x00_f0_00), // S: green
    PieceColor::from_rgb(0xf0_00_00), // Z: red
    PieceColor::from_rgb(0x00_00_f0), // J: blue
    PieceColor::from_rgb(0xf0_a0_00), // L: orange
];

const C: bool = true;
const E: bool = false;

const PIECE_SHAPES: [&[Shape]; PieceKind::LEN] = [
    // I-piece
    &[
        Shape {
            rows: &[&[E, E, E, E], &[C, C, C, C], &[E, E, E, E], &[E, E, E, E]],
        },
        Shape {
            rows: &[&[C, E, E, E], &[C, E, E, E], &[C, E, E, E], &[C, E, E, E]],
        },
    ],
    // O-piece
    &[Shape {
        rows: &[&[C, C], &[C, C]],
    }],
    // T-piece
    &[
        Shape {
            rows: &[&[E, C, E], &[C, C, C], &[E, E, E]],
        },
        Shape {
            rows: &[&[E, C, E], &[E, C, C], &[E, C, E]],
        },
        Shape {
            rows: &[&[E, E, E], &[C, C, C], &[E, C, E]],
        },
        Shape {
            rows: &[&[E, C, E], &[C, C, E], &[E, C, E]],
        },
    ],
    // S-piece
    &[
        Shape {
            rows: &[&[E, C, C], &[C, C, E], &[E, E, E]],
        },
        Shape {
            rows: &[&[E, C, E], &[E, C, C], &[E, E, C]],
        },
    ],
    // Z-piece
    &[
        Shape {
            rows: &[&[C, C, E], &[E, C, C], &[E, E, E]],
        },
        Shape {
            rows: &[&[E, E, C], &[E, C, C], &[E, C, E]],
        },
    ],
    // J-piece
    &[
        Shape {
            rows: &[&[C, E, E], &[C, C, C], &[E, E, E]],
        },
        Shape {
            rows: &[&[E, C, C], &[E, C, E], &[E, C, E]],
        },
        Shape {
            rows: &[&[E, E, E], &[C, C, C], &[E, E, C]],
        },
        Shape {
            rows: &[&[E, C, E], &[E, C, E], &[C, C, E]],
        },
    ],
    // L-piece
    &[
        Shape {
            rows: &[&[E, E, C], &[C, C, C], &[E, E, E]],
        },
        Shape {
            rows: &[&[E, C, E], &[E, C, E], &[E, C, C]],
        },
        Shape {
            rows: &[&[E, E, E], &[C, C, C], &[C, E, E]],
        },
        Shape {
            rows: &[&[C, C, E], &[E, C, E], &[E, C, E]],
        },
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_counts() {
        let counts = PieceKind::ALL.map(PieceKind::rotation_count);
        assert_eq!(counts, [2, 1, 4, 2, 2, 4, 4]);
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in PieceKind::ALL {
            for rotation in 0..kind.rotation_count() {
                let shape = kind.shape(rotation);
                assert_eq!(
                    shape.occupied_cells().count(),
                    4,
                    "{kind} rotation {rotation}"
                );
                assert!(shape.rows.iter().all(|row| row.len() == shape.width()));
            }
        }
    }

    #[test]
    fn test_shape_wraps_rotation_index() {
        assert_eq!(PieceKind::I.shape(2), PieceKind::I.shape(0));
        assert_eq!(PieceKind::T.shape(5), PieceKind::T.shape(1));
        assert_eq!(PieceKind::O.shape(3), PieceKind::O.shape(0));
    }

    #[test]
    fn test_occupied_cells_order() {
        let cells: Vec<_> = PieceKind::T.shape(0).occupied_cells().collect();
        assert_eq!(cells, vec![(1, 0), (0, 1), (1, 1), (2, 1)]);

        let cells: Vec<_> = PieceKind::I.shape(1).occupied_cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn test_spawn_position() {
        let piece = Piece::spawn(PieceKind::L, 10);
        assert_eq!(piece.x(), 4);
        assert_eq!(piece.y(), Piece::SPAWN_Y);
        assert_eq!(piece.rotation(), 0);
        assert_eq!(piece.color(), PieceKind::L.color());
    }

    #[test]
    fn test_rotated_wraps() {
        let piece = Piece::spawn(PieceKind::S, 10);
        assert_eq!(piece.rotated().rotation(), 1);
        assert_eq!(piece.rotated().rotated().rotation(), 0);

        let square = Piece::spawn(PieceKind::O, 10);
        assert_eq!(square.rotated(), square);
    }

    #[test]
    fn test_all_rotations() {
        let piece = Piece::spawn(PieceKind::J, 10).with_x(2);
        let rotations = piece.all_rotations();
        assert_eq!(rotations.len(), 4);
        for (i, p) in rotations.iter().enumerate() {
            assert_eq!(p.rotation(), i);
            assert_eq!(p.x(), 2);
        }
    }

    #[test]
    fn test_occupied_positions_follow_anchor() {
        let piece = Piece::new(PieceKind::O, 0, -1, 18);
        let cells: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(cells, vec![(-1, 18), (0, 18), (-1, 19), (0, 19)]);
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(PieceKind::I.color().to_string(), "#00f0f0");
        assert_eq!(PieceColor::from_rgb(0xff12_3456).rgb(), 0x12_3456);
    }
}
