//! Running the bot off the caller's thread.
//!
//! A [`SearchTask`] owns a private copy of the game, so the live game may
//! keep changing while it runs. Whoever applies the result must first check
//! [`SearchTask::is_current`]; a stale answer is simply dropped.

use crate::engine::config::EngineConfig;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{Move, SearchStats};
use crate::logic::board::Color;
use crate::logic::game::GameState;
use futures::channel::oneshot;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

pub type SearchResult = Option<(Move, SearchStats)>;

/// Identifies the position a search was started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionStamp {
    pub turn: Color,
    pub ply: usize,
    pub last_move: Option<Move>,
}

impl PositionStamp {
    pub fn of(game: &GameState) -> Self {
        Self {
            turn: game.current_turn,
            ply: game.move_history.len(),
            last_move: game.last_move,
        }
    }
}

pub struct SearchTask {
    stamp: PositionStamp,
    receiver: oneshot::Receiver<SearchResult>,
}

impl SearchTask {
    pub fn spawn(game: &GameState, config: Arc<EngineConfig>) -> std::io::Result<Self> {
        Self::spawn_with(game, AlphaBetaEngine::new(config))
    }

    /// Like [`SearchTask::spawn`] with a caller-built engine, e.g. a seeded one.
    pub fn spawn_with(game: &GameState, mut engine: AlphaBetaEngine) -> std::io::Result<Self> {
        let (sender, receiver) = oneshot::channel();
        let snapshot = game.clone();
        std::thread::Builder::new()
            .name("xiangqi-search".into())
            .spawn(move || {
                let result = engine.choose_move(&snapshot);
                // The receiver is gone when the caller lost interest.
                let _ = sender.send(result);
            })?;
        Ok(Self {
            stamp: PositionStamp::of(game),
            receiver,
        })
    }

    /// Whether `live` is still the position this task is searching.
    pub fn is_current(&self, live: &GameState) -> bool {
        self.stamp == PositionStamp::of(live)
    }

    /// Blocks until the search finishes.
    pub fn wait(self) -> SearchResult {
        futures::executor::block_on(self)
    }
}

impl Future for SearchTask {
    type Output = SearchResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.ok().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shallow() -> Arc<EngineConfig> {
        Arc::new(EngineConfig {
            depth: 2,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn test_background_search_returns_legal_move() {
        let game = GameState::new();
        let task = SearchTask::spawn(&game, shallow()).unwrap();
        assert!(task.is_current(&game));
        let (mv, stats) = task.wait().unwrap();
        assert!(game.all_legal_moves().contains(&mv));
        assert_eq!(stats.depth, 2);
    }

    #[test]
    fn test_result_goes_stale_when_game_moves_on() {
        let mut game = GameState::new();
        let task = SearchTask::spawn(&game, shallow()).unwrap();
        assert!(game.execute_move(6, 4, 5, 4));
        assert!(!task.is_current(&game));

        // Undo brings the stamp back to the searched position.
        assert!(game.undo_move());
        assert!(task.is_current(&game));
        assert!(futures::executor::block_on(task).is_some());
    }

    #[test]
    fn test_stamp_tracks_last_move() {
        let mut a = GameState::new();
        let mut b = GameState::new();
        assert!(a.execute_move(6, 0, 5, 0));
        assert!(b.execute_move(6, 2, 5, 2));
        assert_eq!(PositionStamp::of(&a).ply, PositionStamp::of(&b).ply);
        assert_ne!(PositionStamp::of(&a), PositionStamp::of(&b));
    }
}
