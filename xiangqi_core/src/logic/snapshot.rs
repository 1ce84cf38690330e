//! JSON save/load of a [`GameState`].
//!
//! Loading is lenient: only `board` and `currentTurn` are required. Any
//! other field that is missing or unreadable is replaced by a default
//! derived from what did load, with a warning.

use crate::engine::Move;
use crate::logic::board::{Board, BySide, Color, Piece, PieceType};
use crate::logic::game::{GameState, LoseReason, MoveRecord};
use crate::logic::legality::{CheckPattern, PERPETUAL_CHECK_LIMIT};
use crate::logic::rules::is_in_check;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    NotAnObject,
    MissingField(&'static str),
    CorruptField(&'static str),
    /// More than one general for a side.
    InvalidBoard,
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "snapshot is not valid JSON: {e}"),
            Self::NotAnObject => f.write_str("snapshot is not a JSON object"),
            Self::MissingField(name) => write!(f, "snapshot has no `{name}`"),
            Self::CorruptField(name) => write!(f, "snapshot field `{name}` is unreadable"),
            Self::InvalidBoard => f.write_str("snapshot board has more than one general per side"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

fn required<T: DeserializeOwned>(map: &Map<String, Value>, key: &'static str) -> Result<T, SnapshotError> {
    let value = map.get(key).ok_or(SnapshotError::MissingField(key))?;
    serde_json::from_value(value.clone()).map_err(|_| SnapshotError::CorruptField(key))
}

/// `None` when the field is absent or does not parse; both are logged.
fn optional<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    let Some(value) = map.get(key) else {
        log::warn!("snapshot field `{key}` missing, using default");
        return None;
    };
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("snapshot field `{key}` unreadable ({e}), using default");
            None
        }
    }
}

impl GameState {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a game saved by [`GameState::to_json`] or by an older
    /// version that wrote fewer fields.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(SnapshotError::NotAnObject);
        };

        let board: Board = required(&map, "board")?;
        let current_turn: Color = required(&map, "currentTurn")?;
        for color in [Color::Red, Color::Black] {
            if board.count(Piece::new(PieceType::General, color)) > 1 {
                return Err(SnapshotError::InvalidBoard);
            }
        }

        let mut game = Self::from_parts(board, current_turn);
        game.move_history = optional::<Vec<MoveRecord>>(&map, "moveHistory").unwrap_or_default();
        game.last_move = optional::<Option<Move>>(&map, "lastMove")
            .unwrap_or_else(|| game.move_history.last().map(|record| record.mv));
        game.in_check = optional(&map, "inCheck")
            .unwrap_or_else(|| is_in_check(&game.board, current_turn));
        game.consecutive_checks = optional::<BySide<u32>>(&map, "consecutiveChecks").unwrap_or_default();
        game.check_history =
            optional::<BySide<Vec<CheckPattern>>>(&map, "checkHistory").unwrap_or_default();
        game.check_limit_reached = optional(&map, "checkLimitReached")
            .unwrap_or(game.consecutive_checks[current_turn] >= PERPETUAL_CHECK_LIMIT);

        let game_over = optional::<bool>(&map, "gameOver");
        let winner = optional::<Option<Color>>(&map, "winner");
        let lose_reason = optional::<Option<LoseReason>>(&map, "loseReason");
        match (game_over, winner, lose_reason) {
            (Some(game_over), Some(winner), Some(lose_reason))
                if game_over == (winner.is_some() && lose_reason.is_some()) =>
            {
                game.game_over = game_over;
                game.winner = winner;
                game.lose_reason = lose_reason;
            }
            (Some(_), Some(_), Some(_)) => {
                log::warn!("snapshot game-over fields disagree, recomputing from the board");
                game.update_status(current_turn.opposite());
            }
            _ => game.update_status(current_turn.opposite()),
        }

        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mid_game() -> GameState {
        let mut game = GameState::new();
        for (fr, fc, tr, tc) in [(7, 1, 7, 4), (0, 1, 2, 2), (6, 4, 5, 4), (3, 4, 4, 4), (5, 4, 4, 4)] {
            assert!(game.execute_move(fr, fc, tr, tc), "({fr},{fc}) -> ({tr},{tc})");
        }
        game
    }

    fn strip(game: &GameState, keys: &[&str]) -> String {
        let mut value = serde_json::to_value(game).unwrap();
        let obj = value.as_object_mut().unwrap();
        for key in keys {
            obj.remove(*key);
        }
        value.to_string()
    }

    #[test]
    fn test_round_trip_mid_game() {
        let game = mid_game();
        assert!(game.in_check);
        assert_eq!(game.consecutive_checks[Color::Red], 1);

        let restored = GameState::from_json(&game.to_json().unwrap()).unwrap();
        assert_eq!(restored, game);
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = GameState::new().to_json().unwrap();
        for key in ["currentTurn", "moveHistory", "consecutiveChecks", "checkLimitReached"] {
            assert!(json.contains(key), "{key} missing from {json}");
        }
    }

    #[test]
    fn test_legacy_snapshot_gets_defaults() {
        let game = mid_game();
        let json = strip(
            &game,
            &["lastMove", "inCheck", "consecutiveChecks", "checkHistory", "checkLimitReached"],
        );
        let mut restored = GameState::from_json(&json).unwrap();

        assert_eq!(restored.board, game.board);
        assert_eq!(restored.move_history, game.move_history);
        assert_eq!(restored.last_move, game.last_move);
        assert!(restored.in_check);
        assert_eq!(restored.consecutive_checks, BySide::default());
        assert!(!restored.check_limit_reached);
        assert!(restored.undo_move());
        assert!(!restored.in_check);
    }

    #[test]
    fn test_corrupt_optional_field_is_replaced() {
        let game = mid_game();
        let mut value = serde_json::to_value(&game).unwrap();
        value["consecutiveChecks"] = Value::String("lots".into());
        value["moveHistory"] = Value::Bool(true);
        let restored = GameState::from_json(&value.to_string()).unwrap();
        assert_eq!(restored.consecutive_checks, BySide::default());
        assert!(restored.move_history.is_empty());
        assert_eq!(restored.last_move, game.last_move);
    }

    #[test]
    fn test_core_fields_are_required() {
        let game = mid_game();
        assert!(matches!(
            GameState::from_json(&strip(&game, &["board"])),
            Err(SnapshotError::MissingField("board"))
        ));
        assert!(matches!(
            GameState::from_json(&strip(&game, &["currentTurn"])),
            Err(SnapshotError::MissingField("currentTurn"))
        ));

        let mut value = serde_json::to_value(&game).unwrap();
        value["currentTurn"] = Value::String("green".into());
        assert!(matches!(
            GameState::from_json(&value.to_string()),
            Err(SnapshotError::CorruptField("currentTurn"))
        ));

        assert!(matches!(GameState::from_json("[1, 2]"), Err(SnapshotError::NotAnObject)));
        assert!(matches!(GameState::from_json("{"), Err(SnapshotError::Json(_))));
    }

    fn mated() -> GameState {
        let (board, turn) = Board::from_fen("3k5/R8/9/9/9/8R/9/9/9/5K3 w").unwrap();
        let mut game = GameState::from_position(board, turn);
        assert!(game.execute_move(5, 8, 0, 8));
        assert!(game.game_over);
        game
    }

    #[test]
    fn test_missing_result_fields_are_recomputed() {
        let game = mated();
        for key in ["gameOver", "winner", "loseReason"] {
            let restored = GameState::from_json(&strip(&game, &[key])).unwrap();
            assert!(restored.game_over, "{key}");
            assert_eq!(restored.winner, Some(Color::Red));
            assert_eq!(restored.lose_reason, Some(LoseReason::Checkmate));
            assert!(restored.all_legal_moves().is_empty());
        }
    }

    #[test]
    fn test_contradictory_result_fields_are_repaired() {
        let game = mated();
        let mut value = serde_json::to_value(&game).unwrap();
        value["winner"] = Value::Null;
        let restored = GameState::from_json(&value.to_string()).unwrap();
        assert_eq!(restored.status(), game.status());

        // A live game wrongly flagged as over stays playable.
        let live = mid_game();
        let mut value = serde_json::to_value(&live).unwrap();
        value["gameOver"] = Value::Bool(true);
        let mut restored = GameState::from_json(&value.to_string()).unwrap();
        assert!(!restored.game_over);
        assert_eq!(restored.winner, None);
        let reply = restored.all_legal_moves()[0];
        assert!(restored.try_move(reply).is_ok());
    }

    #[test]
    fn test_two_generals_rejected() {
        let mut board = Board::new();
        board.place(4, 0, Piece::new(PieceType::General, Color::Black));
        let game = GameState::from_position(board, Color::Red);
        assert!(matches!(
            GameState::from_json(&game.to_json().unwrap()),
            Err(SnapshotError::InvalidBoard)
        ));
    }
}
