use crate::engine::config::EngineConfig;
use crate::engine::eval::MaterialEvaluator;
use crate::engine::{Evaluator, Move, SearchStats, Searcher};
use crate::logic::board::Board;
use crate::logic::game::GameState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Reverse;
use std::sync::Arc;

const INFINITY: i32 = i32::MAX / 2;

/// Fixed-depth negamax with alpha-beta pruning. Every node is reached through
/// `GameState::try_move`, so the bot only ever sees legal moves.
pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: MaterialEvaluator,
    rng: StdRng,
    nodes_searched: u32,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible deviations.
    pub fn with_seed(config: Arc<EngineConfig>, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: Arc<EngineConfig>, rng: StdRng) -> Self {
        Self {
            evaluator: MaterialEvaluator::new(config.clone()),
            config,
            rng,
            nodes_searched: 0,
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = MaterialEvaluator::new(config.clone());
        self.config = config;
    }

    /// Searches at the configured depth.
    pub fn choose_move(&mut self, game_state: &GameState) -> Option<(Move, SearchStats)> {
        let depth = self.config.depth;
        self.search(game_state, depth)
    }

    fn now() -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            if let Some(window) = web_sys::window() {
                return window.performance().map_or(0.0, |p| p.now());
            }
            let global = js_sys::global();
            if let Ok(worker) = global.dyn_into::<web_sys::WorkerGlobalScope>() {
                return worker.performance().map_or(0.0, |p| p.now());
            }
            0.0
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::time::{SystemTime, UNIX_EPOCH};
            let since_the_epoch = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default();
            #[allow(clippy::cast_precision_loss)]
            let time_ms = (since_the_epoch.as_secs() as f64).mul_add(
                1000.0,
                f64::from(since_the_epoch.subsec_nanos()) / 1_000_000.0,
            );
            time_ms
        }
    }

    /// Most valuable victim first; quiet moves keep generation order.
    fn order_moves(&self, board: &Board, moves: &mut [Move]) {
        moves.sort_by_key(|mv| {
            Reverse(
                board
                    .get(mv.to())
                    .map_or(0, |victim| self.config.value_of(victim.piece_type)),
            )
        });
    }

    /// Score of the position for the side to move.
    fn negamax(&mut self, game: &mut GameState, depth: u8, mut alpha: i32, beta: i32) -> i32 {
        self.nodes_searched += 1;

        if game.game_over {
            // The side to move has nothing left; sooner is worse.
            return -(self.config.mate_score + i32::from(depth));
        }
        if depth == 0 {
            return self.evaluator.evaluate(&game.board, game.current_turn);
        }

        let mut moves = game.all_legal_moves();
        self.order_moves(&game.board, &mut moves);

        let mut best = -INFINITY;
        for mv in moves {
            if game.try_move(mv).is_err() {
                continue;
            }
            let score = -self.negamax(game, depth - 1, -beta, -alpha);
            game.undo_move();

            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }
        best
    }

    /// Picks uniformly among the `pool` moves ranked right after the best.
    fn deviate(&mut self, mut scored: Vec<(Move, i32)>) -> Option<(Move, i32)> {
        scored.sort_by_key(|&(_, score)| Reverse(score));
        let pool = self.config.deviation_pool.min(scored.len().saturating_sub(1));
        if pool == 0 {
            return scored.first().copied();
        }
        let pick = self.rng.gen_range(1..=pool);
        scored.get(pick).copied()
    }
}

impl Searcher for AlphaBetaEngine {
    fn search(&mut self, game_state: &GameState, depth: u8) -> Option<(Move, SearchStats)> {
        let start_time = Self::now();
        self.nodes_searched = 0;
        let depth = depth.max(1);

        let mut game = game_state.clone();
        let mut moves = game.all_legal_moves();
        if moves.is_empty() {
            return None;
        }
        self.order_moves(&game.board, &mut moves);

        // Decided up front: a deviating root needs exact scores for every move.
        let chance = self.config.deviation_chance.clamp(0.0, 1.0);
        let deviating = moves.len() > 1 && chance > 0.0 && self.rng.gen_bool(chance);

        let mut alpha = -INFINITY;
        let mut best: Option<(Move, i32)> = None;
        let mut scored = Vec::with_capacity(moves.len());
        for mv in moves {
            if game.try_move(mv).is_err() {
                continue;
            }
            let beta = if deviating { INFINITY } else { -alpha };
            let score = -self.negamax(&mut game, depth - 1, -INFINITY, beta);
            game.undo_move();

            if best.map_or(true, |(_, s)| score > s) {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
            scored.push((mv, score));
        }

        let (chosen, score) = if deviating {
            self.deviate(scored)?
        } else {
            best?
        };

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let time_ms = (Self::now() - start_time).max(0.0) as u64;
        let stats = SearchStats {
            depth,
            nodes: self.nodes_searched,
            score,
            time_ms,
        };
        log::debug!(
            "depth {} nodes {} score {} time {}ms move {} deviated {}",
            stats.depth,
            stats.nodes,
            stats.score,
            stats.time_ms,
            chosen,
            deviating
        );
        Some((chosen, stats))
    }
}
