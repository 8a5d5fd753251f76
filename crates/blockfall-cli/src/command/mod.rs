use std::io;

use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, prelude::*};

use self::{auto_play::AutoPlayArg, default_config::DefaultConfigArg};

mod auto_play;
mod default_config;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play games with the automated player and print one JSON summary per game
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Print the default configuration as JSON
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // Summaries go to stdout, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(LevelFilter::from_level(level))
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_auto_play() {
        let args = CommandArgs::try_parse_from([
            "blockfall",
            "-vv",
            "auto-play",
            "--games",
            "3",
            "--seed",
            "42",
            "--lookahead",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        assert!(matches!(args.mode, Mode::AutoPlay(_)));
    }

    #[test]
    fn test_mode_is_required() {
        assert!(CommandArgs::try_parse_from(["blockfall"]).is_err());
    }
}
