use tracing::{debug, info};

use crate::{
    MoveRejected,
    core::{Board, Piece},
};

use super::{GameConfig, GameStats, PieceGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Active,
    /// Terminal: a freshly spawned piece did not fit, or no legal placement was left.
    GameOver,
}

/// Result of a single gravity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GravityOutcome {
    /// The piece moved one row down.
    Moved,
    /// The piece was resting and has been locked.
    Locked { cleared_lines: usize },
}

/// A single game: the locked board, the falling piece, and the score.
///
/// External drivers (input handlers, gravity timers, automated players) call the
/// commands below at their own cadence. A refused command returns [`MoveRejected`]
/// and leaves the session unchanged. Once the session is over every command is
/// refused with [`MoveRejected::GameOver`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameConfig, GameSession, PieceKind, SequencePieceGenerator};
///
/// let generator = SequencePieceGenerator::new([PieceKind::O]);
/// let mut session = GameSession::new(GameConfig::default(), Box::new(generator));
///
/// session.try_move_left().unwrap();
/// session.hard_drop().unwrap();
///
/// assert_eq!(session.stats().completed_pieces(), 1);
/// assert!(session.board().is_occupied(3, 19));
/// assert!(session.state().is_active());
/// ```
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    falling_piece: Piece,
    generator: Box<dyn PieceGenerator>,
    stats: GameStats,
    state: SessionState,
}

impl GameSession {
    #[must_use]
    pub fn new(config: GameConfig, mut generator: Box<dyn PieceGenerator>) -> Self {
        let board = Board::empty(config.board_size);
        let falling_piece = Piece::spawn(generator.next_kind(), board.width());
        let state = if board.can_place_piece(&falling_piece) {
            SessionState::Active
        } else {
            SessionState::GameOver
        };
        Self {
            config,
            board,
            falling_piece,
            generator,
            stats: GameStats::new(),
            state,
        }
    }

    /// The locked cells only, without the falling piece.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    /// The board with the falling piece drawn over it.
    ///
    /// Once the game is over only the locked cells are shown.
    #[must_use]
    pub fn display_board(&self) -> Board {
        match self.state {
            SessionState::Active => self.board.composite(&self.falling_piece),
            SessionState::GameOver => self.board.clone(),
        }
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn try_move_left(&mut self) -> Result<(), MoveRejected> {
        self.try_set_falling_piece(self.falling_piece.left())
    }

    pub fn try_move_right(&mut self) -> Result<(), MoveRejected> {
        self.try_set_falling_piece(self.falling_piece.right())
    }

    /// Advances to the next rotation state in place; no wall kicks are attempted.
    pub fn try_rotate(&mut self) -> Result<(), MoveRejected> {
        self.try_set_falling_piece(self.falling_piece.rotated())
    }

    /// Moves the piece one row down. Never locks.
    pub fn try_soft_drop(&mut self) -> Result<(), MoveRejected> {
        self.try_set_falling_piece(self.falling_piece.down())
    }

    /// One gravity tick: move down one row, or lock the piece if it is resting.
    pub fn gravity_step(&mut self) -> Result<GravityOutcome, MoveRejected> {
        self.ensure_active()?;
        let moved = self.falling_piece.down();
        if self.board.can_place_piece(&moved) {
            self.falling_piece = moved;
            return Ok(GravityOutcome::Moved);
        }
        let cleared_lines = self.lock_falling_piece(self.falling_piece, 0);
        Ok(GravityOutcome::Locked { cleared_lines })
    }

    /// Drops the piece as far as it goes and locks it. Returns the number of cleared lines.
    pub fn hard_drop(&mut self) -> Result<usize, MoveRejected> {
        self.ensure_active()?;
        let piece = self.falling_piece;
        let resting_y = self
            .board
            .resting_y(piece.shape(), piece.x(), piece.y())
            .unwrap_or(piece.y());
        Ok(self.lock_falling_piece(piece.with_y(resting_y), drop_distance(&piece, resting_y)))
    }

    /// Places the falling piece with the given rotation at column `x`, then hard-drops it.
    ///
    /// The piece is dropped from its current row, so a placement computed by a search
    /// that starts at the spawn row lands on the same cells. Returns the number of
    /// cleared lines, or [`MoveRejected::Collision`] when the piece has no resting row
    /// in that column.
    pub fn apply_placement(&mut self, rotation: usize, x: i32) -> Result<usize, MoveRejected> {
        self.ensure_active()?;
        let piece = self.falling_piece.with_rotation(rotation).with_x(x);
        let resting_y = self
            .board
            .resting_y(piece.shape(), piece.x(), piece.y())
            .ok_or(MoveRejected::Collision)?;
        Ok(self.lock_falling_piece(piece.with_y(resting_y), drop_distance(&piece, resting_y)))
    }

    /// Ends the game because the falling piece has no legal placement.
    pub fn top_out(&mut self) {
        if self.state.is_active() {
            info!(
                score = self.stats.score(),
                pieces = self.stats.completed_pieces(),
                "game over: no legal placement"
            );
            self.state = SessionState::GameOver;
        }
    }

    fn ensure_active(&self) -> Result<(), MoveRejected> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::GameOver => Err(MoveRejected::GameOver),
        }
    }

    fn try_set_falling_piece(&mut self, piece: Piece) -> Result<(), MoveRejected> {
        self.ensure_active()?;
        if !self.board.can_place_piece(&piece) {
            return Err(MoveRejected::Collision);
        }
        self.falling_piece = piece;
        Ok(())
    }

    fn lock_falling_piece(&mut self, piece: Piece, drop_rows: u64) -> usize {
        self.board.lock_in_place(&piece);
        let cleared_lines = self.board.clear_lines_in_place();
        let line_points = self.config.points_per_line * cleared_lines as u64;
        self.stats.complete_piece_drop(cleared_lines, line_points);
        self.stats
            .add_drop_bonus(drop_rows * self.config.hard_drop_bonus_per_row);
        debug!(
            kind = %piece.kind(),
            rotation = piece.rotation(),
            x = piece.x(),
            y = piece.y(),
            cleared_lines,
            "piece locked"
        );

        self.falling_piece = Piece::spawn(self.generator.next_kind(), self.board.width());
        if !self.board.can_place_piece(&self.falling_piece) {
            info!(
                score = self.stats.score(),
                pieces = self.stats.completed_pieces(),
                "game over: spawn blocked"
            );
            self.state = SessionState::GameOver;
        }
        cleared_lines
    }
}

fn drop_distance(piece: &Piece, resting_y: i32) -> u64 {
    u64::try_from(resting_y - piece.y()).unwrap_or(0)
}
