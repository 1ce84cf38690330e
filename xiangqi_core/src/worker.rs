use crate::engine::config::EngineConfig;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::task::PositionStamp;
use crate::engine::{Move, SearchStats, Searcher};
use crate::logic::game::GameState;
use gloo_worker::{HandlerId, Worker, WorkerScope};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The browser has no threads to spare, so the bot runs in a web worker.
/// Requests carry the position's turn and ply so the page can drop answers
/// to positions it has already left.
#[derive(Serialize, Deserialize)]
pub enum Input {
    ComputeMove {
        game_state: GameState,
        config: EngineConfig,
    },
}

#[derive(Serialize, Deserialize)]
pub enum Output {
    MoveFound {
        mv: Move,
        stats: SearchStats,
        ply: usize,
    },
    /// The side to move has no legal move.
    NoMove { ply: usize },
}

pub struct BotWorker {
    engine: Option<AlphaBetaEngine>,
}

impl Worker for BotWorker {
    type Input = Input;
    type Message = ();
    type Output = Output;

    fn create(_scope: &WorkerScope<Self>) -> Self {
        Self { engine: None }
    }

    fn update(&mut self, _scope: &WorkerScope<Self>, _msg: Self::Message) {}

    fn received(&mut self, scope: &WorkerScope<Self>, msg: Self::Input, id: HandlerId) {
        match msg {
            Input::ComputeMove { game_state, config } => {
                let config = Arc::new(config);
                let depth = config.depth;
                let engine = self
                    .engine
                    .get_or_insert_with(|| AlphaBetaEngine::new(config.clone()));
                engine.update_config(config);

                let ply = PositionStamp::of(&game_state).ply;
                let output = match engine.search(&game_state, depth) {
                    Some((mv, stats)) => Output::MoveFound { mv, stats, ply },
                    None => Output::NoMove { ply },
                };
                scope.respond(id, output);
            }
        }
    }
}
