use std::path::PathBuf;

use blockfall_engine::{GameConfig, GameSession, PieceSeed, RandomPieceGenerator};
use blockfall_evaluator::{SearchConfig, auto_player::AutoPlayer};
use serde::Serialize;
use tracing::info;

use crate::{config::BlockfallConfig, util::JsonOutput};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Seed of the first game; each following game uses the next integer. Random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of pieces placed per game
    #[arg(long, default_value_t = 1000)]
    max_pieces: usize,
    /// Rank moves by the expected score of the next piece
    #[arg(long)]
    lookahead: bool,
    /// Configuration file (JSON, see `default-config`)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Include the final board in each summary
    #[arg(long)]
    show_board: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Result of one automated game, printed as one JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct GameSummary {
    game: usize,
    seed: u64,
    score: u64,
    pieces: usize,
    lines: usize,
    line_clears: [usize; 5],
    max_height: usize,
    holes: usize,
    game_over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<Vec<String>>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        games,
        seed,
        max_pieces,
        lookahead,
        config,
        show_board,
        output,
    } = arg;

    let BlockfallConfig { game, mut search } = BlockfallConfig::load(config.as_deref())?;
    search.lookahead |= *lookahead;
    let first_seed = seed.unwrap_or_else(rand::random);
    info!(games, first_seed, lookahead = search.lookahead, "starting auto play");

    let mut output = JsonOutput::create(output.as_deref())?;
    for game_index in 0..*games {
        let seed = first_seed.wrapping_add(game_index as u64);
        let summary = play_game(&game, &search, game_index, seed, *max_pieces, *show_board)?;
        output.write_line(&summary)?;
    }
    Ok(())
}

fn play_game(
    game_config: &GameConfig,
    search_config: &SearchConfig,
    game: usize,
    seed: u64,
    max_pieces: usize,
    show_board: bool,
) -> anyhow::Result<GameSummary> {
    let mut player = AutoPlayer::new(search_config)?;
    let generator = RandomPieceGenerator::with_seed(PieceSeed::from_u64(seed));
    let mut session = GameSession::new(*game_config, Box::new(generator));
    let stats = player.play(&mut session, max_pieces);

    Ok(GameSummary {
        game,
        seed,
        score: session.score(),
        pieces: stats.pieces_placed,
        lines: stats.lines_cleared,
        line_clears: *session.stats().line_cleared_counter(),
        max_height: stats.max_height_seen,
        holes: stats.cumulative_holes,
        game_over: session.is_game_over(),
        board: show_board.then(|| {
            session
                .display_board()
                .to_string()
                .lines()
                .map(str::to_owned)
                .collect()
        }),
    })
}
