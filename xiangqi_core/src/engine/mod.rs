use crate::logic::board::{Board, Color, Position};
use crate::logic::game::GameState;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod eval;
pub mod search;
pub mod task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub from_row: u8,
    pub from_col: u8,
    pub to_row: u8,
    pub to_col: u8,
}

impl Move {
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(from: Position, to: Position) -> Self {
        Self {
            from_row: from.row as u8,
            from_col: from.col as u8,
            to_row: to.row as u8,
            to_col: to.col as u8,
        }
    }

    pub const fn from(self) -> Position {
        Position {
            row: self.from_row as usize,
            col: self.from_col as usize,
        }
    }

    pub const fn to(self) -> Position {
        Position {
            row: self.to_row as usize,
            col: self.to_col as usize,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from(), self.to())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub score: i32,
    pub time_ms: u64,
}

pub trait Evaluator {
    /// Static score of `board` seen from `perspective`.
    fn evaluate(&self, board: &Board, perspective: Color) -> i32;
}

pub trait Searcher {
    fn search(&mut self, game_state: &GameState, depth: u8) -> Option<(Move, SearchStats)>;
}
