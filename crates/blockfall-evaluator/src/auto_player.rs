//! Automated play: decide a move and apply it to a running session.
//!
//! [`AutoPlayer::step`] is the decide-and-apply command an external scheduler calls at
//! its own cadence. It searches placements for the falling piece, applies the winner
//! with [`GameSession::apply_placement`], and tops the session out when no placement is
//! legal. Per-game diagnostics are collected in [`AutoPlayStats`] and never affect
//! decisions.

use blockfall_engine::{GameSession, MoveRejected};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    SearchConfig, SearchConfigError,
    board_analysis::BoardAnalysis,
    move_search::{MoveCandidate, MoveSearch},
};

/// Running counters of an automated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AutoPlayStats {
    pub pieces_placed: usize,
    pub lines_cleared: usize,
    /// Tallest column observed after any placement.
    pub max_height_seen: usize,
    /// Holes on the board after each placement, summed over all placements.
    pub cumulative_holes: usize,
}

impl AutoPlayStats {
    fn record_placement(&mut self, cleared_lines: usize, analysis: &BoardAnalysis) {
        self.pieces_placed += 1;
        self.lines_cleared += cleared_lines;
        self.max_height_seen = self.max_height_seen.max(analysis.max_height());
        self.cumulative_holes += analysis.num_holes();
    }
}

#[derive(Debug)]
pub struct AutoPlayer {
    search: MoveSearch,
    stats: AutoPlayStats,
}

impl AutoPlayer {
    /// Creates a player searching as `config` describes, or fails if it does not validate.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchConfigError> {
        Ok(Self::with_search(MoveSearch::new(config)?))
    }

    #[must_use]
    pub fn with_search(search: MoveSearch) -> Self {
        Self {
            search,
            stats: AutoPlayStats::default(),
        }
    }

    #[must_use]
    pub fn search(&self) -> &MoveSearch {
        &self.search
    }

    #[must_use]
    pub fn stats(&self) -> &AutoPlayStats {
        &self.stats
    }

    /// Decides a placement for the falling piece and applies it.
    ///
    /// Returns the applied move, or `None` when the piece had no legal placement and the
    /// session was topped out.
    pub fn step(
        &mut self,
        session: &mut GameSession,
    ) -> Result<Option<MoveCandidate>, MoveRejected> {
        if session.is_game_over() {
            return Err(MoveRejected::GameOver);
        }

        let Some(candidate) = self.search.decide(session.board(), session.falling_piece()) else {
            session.top_out();
            return Ok(None);
        };
        let cleared_lines = session.apply_placement(candidate.rotation(), candidate.x())?;

        let analysis = BoardAnalysis::from_board(session.board().clone());
        self.stats.record_placement(cleared_lines, &analysis);
        Ok(Some(candidate))
    }

    /// Plays until the game is over or `piece_limit` pieces have been placed.
    ///
    /// Returns the statistics accumulated by this player, including earlier calls.
    pub fn play(&mut self, session: &mut GameSession, piece_limit: usize) -> AutoPlayStats {
        for _ in 0..piece_limit {
            match self.step(session) {
                Ok(Some(_)) if !session.is_game_over() => {}
                Ok(_) | Err(_) => break,
            }
        }
        info!(
            score = session.score(),
            pieces = self.stats.pieces_placed,
            lines = self.stats.lines_cleared,
            game_over = session.is_game_over(),
            "auto play finished"
        );
        self.stats
    }
}
