//! Bot-versus-bot games from the command line.

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use xiangqi_core::engine::config::EngineConfig;
use xiangqi_core::engine::search::AlphaBetaEngine;
use xiangqi_core::engine::Searcher;
use xiangqi_core::logic::board::{Board, Color};
use xiangqi_core::logic::game::{GameState, GameStatus};

#[derive(Parser)]
#[command(name = "selfplay")]
#[command(about = "Let the xiangqi bot play against itself", long_about = None)]
struct Cli {
    /// Starting position; the standard opening when absent
    #[arg(long)]
    fen: Option<String>,

    /// Search depth for Red
    #[arg(long, default_value = "3")]
    red_depth: u8,

    /// Search depth for Black
    #[arg(long, default_value = "3")]
    black_depth: u8,

    /// Stop after this many plies
    #[arg(long, default_value = "200")]
    max_plies: usize,

    /// Seed for reproducible deviations
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config JSON (piece values as multipliers)
    #[arg(long)]
    config: Option<String>,

    /// Print the final game as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load_from_json(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    let config = Arc::new(config);
    let mut engine = match cli.seed {
        Some(seed) => AlphaBetaEngine::with_seed(config, seed),
        None => AlphaBetaEngine::new(config),
    };

    let mut game = match &cli.fen {
        Some(fen) => {
            let (board, turn) = Board::from_fen(fen)?;
            GameState::from_position(board, turn)
        }
        None => GameState::new(),
    };

    while game.move_history.len() < cli.max_plies {
        let depth = match game.current_turn {
            Color::Red => cli.red_depth,
            Color::Black => cli.black_depth,
        };
        let Some((mv, stats)) = engine.search(&game, depth) else {
            break;
        };
        let side = game.current_turn;
        game.try_move(mv)?;
        println!(
            "{:>3}. {side:<5} {mv}  score {:>7}  nodes {:>8}  {}ms{}",
            game.move_history.len(),
            stats.score,
            stats.nodes,
            stats.time_ms,
            if game.in_check { "  check" } else { "" }
        );
    }

    match game.status() {
        GameStatus::Over { winner, reason } => println!("{winner} wins ({reason:?})"),
        GameStatus::InProgress => println!(
            "no result after {} plies, {} to move",
            game.move_history.len(),
            game.current_turn
        ),
    }
    println!("final position: {}", game.board.to_fen(game.current_turn));

    if cli.json {
        println!("{}", game.to_json()?);
    }
    Ok(())
}
