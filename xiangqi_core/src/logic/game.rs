use crate::engine::Move;
use crate::logic::board::{Board, BySide, Color, Piece, Position};
use crate::logic::legality::{
    has_any_legal_move, legal_moves, legal_moves_for_side, validate_move, CheckPattern, MoveError,
    PerpetualGuard, PERPETUAL_CHECK_LIMIT,
};
use crate::logic::rules::is_in_check;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoseReason {
    /// No legal move left, in check or not.
    Checkmate,
    /// The only moves left would repeat a forbidden check.
    PerpetualCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Over { winner: Color, reason: LoseReason },
}

/// Everything needed to take a move back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    #[serde(rename = "move")]
    pub mv: Move,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub board_before: Board,
    pub last_move_before: Option<Move>,
    pub consecutive_checks_before: BySide<u32>,
    pub check_history_before: BySide<Vec<CheckPattern>>,
    pub check_limit_reached_before: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,
    pub current_turn: Color,
    pub move_history: Vec<MoveRecord>,
    pub last_move: Option<Move>,
    pub game_over: bool,
    pub winner: Option<Color>,
    pub lose_reason: Option<LoseReason>,
    pub in_check: bool,
    pub consecutive_checks: BySide<u32>,
    pub check_history: BySide<Vec<CheckPattern>>,
    pub check_limit_reached: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(Board::new(), Color::Red)
    }

    pub(crate) fn from_parts(board: Board, current_turn: Color) -> Self {
        Self {
            board,
            current_turn,
            move_history: Vec::new(),
            last_move: None,
            game_over: false,
            winner: None,
            lose_reason: None,
            in_check: false,
            consecutive_checks: BySide::default(),
            check_history: BySide::default(),
            check_limit_reached: false,
        }
    }

    /// A game starting from an arbitrary position. Check and terminal status
    /// are computed for `turn`.
    #[must_use]
    pub fn from_position(board: Board, turn: Color) -> Self {
        let mut game = Self::from_parts(board, turn);
        game.in_check = is_in_check(&game.board, turn);
        game.update_status(turn.opposite());
        game
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn status(&self) -> GameStatus {
        match (self.game_over, self.winner, self.lose_reason) {
            (true, Some(winner), Some(reason)) => GameStatus::Over { winner, reason },
            _ => GameStatus::InProgress,
        }
    }

    /// The perpetual-check restriction that currently applies to `color`.
    pub fn guard(&self, color: Color) -> PerpetualGuard<'_> {
        PerpetualGuard {
            streak: self.consecutive_checks[color],
            history: &self.check_history[color],
        }
    }

    /// Legal destinations of the piece on `from`, whichever side owns it.
    pub fn legal_moves(&self, from: Position) -> Vec<Position> {
        match self.board.get(from) {
            Some(piece) => legal_moves(&self.board, from, &self.guard(piece.color)),
            None => Vec::new(),
        }
    }

    pub fn legal_moves_at(&self, row: usize, col: usize) -> Vec<Position> {
        Position::new(row, col).map_or_else(Vec::new, |from| self.legal_moves(from))
    }

    /// Every legal move of the side to move; empty once the game is over.
    pub fn all_legal_moves(&self) -> Vec<Move> {
        if self.game_over {
            return Vec::new();
        }
        let turn = self.current_turn;
        legal_moves_for_side(&self.board, turn, &self.guard(turn))
    }

    /// Boolean form of [`GameState::try_move`].
    pub fn execute_move(&mut self, from_row: usize, from_col: usize, to_row: usize, to_col: usize) -> bool {
        let (Some(from), Some(to)) = (Position::new(from_row, from_col), Position::new(to_row, to_col)) else {
            return false;
        };
        self.try_move(Move::new(from, to)).is_ok()
    }

    /// Plays `mv` for the side to move and returns the captured piece.
    /// On error nothing is modified.
    pub fn try_move(&mut self, mv: Move) -> Result<Option<Piece>, MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        let (from, to) = (mv.from(), mv.to());
        let mover = self.current_turn;
        let piece = self.board.get(from).ok_or(MoveError::NoPieceAtSource)?;
        if piece.color != mover {
            return Err(MoveError::NotYourTurn);
        }
        validate_move(&self.board, from, to, &self.guard(mover))?;

        self.move_history.push(MoveRecord {
            mv,
            piece,
            captured: self.board.get(to),
            board_before: self.board.clone(),
            last_move_before: self.last_move,
            consecutive_checks_before: self.consecutive_checks,
            check_history_before: self.check_history.clone(),
            check_limit_reached_before: self.check_limit_reached,
        });

        let captured = self.board.move_piece(from, to);
        self.current_turn = mover.opposite();
        self.last_move = Some(mv);
        self.in_check = is_in_check(&self.board, self.current_turn);

        if self.in_check {
            self.consecutive_checks[mover] += 1;
            self.check_history[mover].push(CheckPattern { piece, from, to });
        } else {
            self.consecutive_checks[mover] = 0;
            self.check_history[mover].clear();
        }

        self.update_status(mover);
        Ok(captured)
    }

    /// Recomputes the repeat-check flag and game-over fields for the side to
    /// move, `mover` being the side that produced the position.
    pub(crate) fn update_status(&mut self, mover: Color) {
        let turn = self.current_turn;
        self.check_limit_reached = self.consecutive_checks[turn] >= PERPETUAL_CHECK_LIMIT;

        let guard = self.guard(turn);
        if has_any_legal_move(&self.board, turn, &guard) {
            return;
        }
        let reason = if guard.is_active() && has_any_legal_move(&self.board, turn, &PerpetualGuard::NONE) {
            LoseReason::PerpetualCheck
        } else {
            LoseReason::Checkmate
        };
        self.game_over = true;
        self.winner = Some(mover);
        self.lose_reason = Some(reason);
        log::info!("game over: {mover} wins by {reason:?} after {} plies", self.move_history.len());
    }

    /// Takes back the last move. Returns `false` when there is nothing to undo.
    pub fn undo_move(&mut self) -> bool {
        let Some(record) = self.move_history.pop() else {
            return false;
        };
        self.board = record.board_before;
        self.current_turn = record.piece.color;
        self.last_move = record.last_move_before;
        self.consecutive_checks = record.consecutive_checks_before;
        self.check_history = record.check_history_before;
        self.check_limit_reached = record.check_limit_reached_before;
        self.game_over = false;
        self.winner = None;
        self.lose_reason = None;
        self.in_check = is_in_check(&self.board, self.current_turn);
        true
    }
}
