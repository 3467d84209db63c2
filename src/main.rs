mod config;
mod engine;
mod game;
mod snake;
mod term;
mod timer;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use simplelog::{Config, LevelFilter, WriteLogger};

pub type TermInt = u16;
pub type Coords = (u16, u16);

#[derive(Parser)]
#[command(name = "arena-snake")]
#[command(version, about = "Snake in a fixed arena, in your terminal")]
struct Cli {
    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log. The screen is taken by the game.
    #[arg(long, default_value = "arena-snake.log")]
    log_file: PathBuf,

    /// One of off, error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse().map_err(|_| format!("unknown log level '{}'", s))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(cli.log_level, Config::default(), log_file).context("Failed to initialize logger")?;

    info!("Starting arena-snake");

    let mut game = game::SnakeGame::new(cli.seed)?;
    game.initialize()?;

    // Always give the terminal back, even if the game failed
    let res = game.run();
    game.shutdown()?;

    if let Err(e) = &res {
        error!("{:#}", e);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let cli = Cli::parse_from(["arena-snake"]);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.log_file, PathBuf::from("arena-snake.log"));
        assert_eq!(cli.log_level, LevelFilter::Info);
    }

    #[test]
    fn parses_options() {
        let cli = Cli::parse_from(["arena-snake", "--seed", "42", "--log-level", "debug"]);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.log_level, LevelFilter::Debug);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(Cli::try_parse_from(["arena-snake", "--log-level", "loud"]).is_err());
    }
}
