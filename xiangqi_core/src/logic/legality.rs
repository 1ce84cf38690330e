use crate::engine::Move;
use crate::logic::board::{Board, Color, Piece, Position};
use crate::logic::generator::pseudo_legal_moves;
use crate::logic::rules::{is_flying_general, is_in_check};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Consecutive checks after which a side may no longer repeat a check it
/// has already given.
pub const PERPETUAL_CHECK_LIMIT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    GameOver,
    NoPieceAtSource,
    NotYourTurn,
    InvalidMovePattern,
    SelfCheck,
    FlyingGeneral,
    PerpetualCheck,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::GameOver => "the game is already over",
            Self::NoPieceAtSource => "no piece on the source square",
            Self::NotYourTurn => "that piece does not belong to the side to move",
            Self::InvalidMovePattern => "the piece cannot reach that square",
            Self::SelfCheck => "the move leaves the general in check",
            Self::FlyingGeneral => "the move leaves the generals facing each other",
            Self::PerpetualCheck => "repeating this check is forbidden",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for MoveError {}

/// A check that was delivered by moving `piece` from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckPattern {
    pub piece: Piece,
    pub from: Position,
    pub to: Position,
}

/// The mover's side of the perpetual-check rule: how many checks in a row it
/// has given and which ones.
#[derive(Debug, Clone, Copy)]
pub struct PerpetualGuard<'a> {
    pub streak: u32,
    pub history: &'a [CheckPattern],
}

impl PerpetualGuard<'_> {
    /// No restriction at all.
    pub const NONE: PerpetualGuard<'static> = PerpetualGuard {
        streak: 0,
        history: &[],
    };

    pub const fn is_active(&self) -> bool {
        self.streak >= PERPETUAL_CHECK_LIMIT
    }

    fn repeats(&self, from: Position, to: Position) -> bool {
        self.history.iter().any(|p| p.from == from && p.to == to)
    }
}

/// Full legality test for moving the piece on `from` to `to`.
///
/// The move is tried on a scratch copy of the board; the live board is
/// never touched.
pub fn validate_move(
    board: &Board,
    from: Position,
    to: Position,
    guard: &PerpetualGuard<'_>,
) -> Result<(), MoveError> {
    let piece = board.get(from).ok_or(MoveError::NoPieceAtSource)?;
    if !pseudo_legal_moves(board, from).contains(&to) {
        return Err(MoveError::InvalidMovePattern);
    }
    check_resulting_position(board, from, to, piece.color, guard)
}

fn check_resulting_position(
    board: &Board,
    from: Position,
    to: Position,
    mover: Color,
    guard: &PerpetualGuard<'_>,
) -> Result<(), MoveError> {
    let mut scratch = board.clone();
    scratch.move_piece(from, to);

    if is_flying_general(&scratch) {
        return Err(MoveError::FlyingGeneral);
    }
    if is_in_check(&scratch, mover) {
        return Err(MoveError::SelfCheck);
    }
    if guard.is_active() && guard.repeats(from, to) && is_in_check(&scratch, mover.opposite()) {
        return Err(MoveError::PerpetualCheck);
    }
    Ok(())
}

/// Destinations of the piece on `from` that pass every legality rule.
pub fn legal_moves(board: &Board, from: Position, guard: &PerpetualGuard<'_>) -> Vec<Position> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    pseudo_legal_moves(board, from)
        .into_iter()
        .filter(|&to| check_resulting_position(board, from, to, piece.color, guard).is_ok())
        .collect()
}

/// All legal moves of `color`.
pub fn legal_moves_for_side(board: &Board, color: Color, guard: &PerpetualGuard<'_>) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for (from, _) in board.pieces(color) {
        moves.extend(
            legal_moves(board, from, guard)
                .into_iter()
                .map(|to| Move::new(from, to)),
        );
    }
    moves
}

/// Checks if `color` has at least one legal move, stopping at the first one.
pub fn has_any_legal_move(board: &Board, color: Color, guard: &PerpetualGuard<'_>) -> bool {
    board.pieces(color).any(|(from, _)| {
        pseudo_legal_moves(board, from)
            .into_iter()
            .any(|to| check_resulting_position(board, from, to, color, guard).is_ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::PieceType;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn put(board: &mut Board, row: usize, col: usize, pt: PieceType, color: Color) {
        board.place(row, col, Piece::new(pt, color));
    }

    #[test]
    fn test_opening_has_44_legal_moves() {
        let moves = legal_moves_for_side(&Board::new(), Color::Red, &PerpetualGuard::NONE);
        assert_eq!(moves.len(), 44);
    }

    #[test]
    fn test_pinned_piece_cannot_leave_file() {
        let mut board = Board::empty();
        put(&mut board, 0, 4, PieceType::General, Color::Black);
        put(&mut board, 9, 4, PieceType::General, Color::Red);
        put(&mut board, 5, 4, PieceType::Horse, Color::Red);
        // The horse is the only thing keeping the generals apart.
        assert!(legal_moves(&board, pos(5, 4), &PerpetualGuard::NONE).is_empty());
        assert_eq!(
            validate_move(&board, pos(5, 4), pos(3, 3), &PerpetualGuard::NONE),
            Err(MoveError::FlyingGeneral)
        );
    }

    #[test]
    fn test_general_cannot_step_into_check() {
        let mut board = Board::empty();
        put(&mut board, 0, 3, PieceType::General, Color::Black);
        put(&mut board, 9, 4, PieceType::General, Color::Red);
        put(&mut board, 5, 5, PieceType::Chariot, Color::Black);
        let moves = legal_moves(&board, pos(9, 4), &PerpetualGuard::NONE);
        assert!(!moves.contains(&pos(9, 5)));
        assert!(moves.contains(&pos(8, 4)));
        // Stepping onto the black general's file is a flying-general violation.
        assert!(!moves.contains(&pos(9, 3)));
        assert_eq!(
            validate_move(&board, pos(9, 4), pos(9, 5), &PerpetualGuard::NONE),
            Err(MoveError::SelfCheck)
        );
    }

    #[test]
    fn test_must_answer_check() {
        let mut board = Board::empty();
        put(&mut board, 0, 4, PieceType::General, Color::Black);
        put(&mut board, 9, 3, PieceType::General, Color::Red);
        put(&mut board, 4, 4, PieceType::Chariot, Color::Red);
        put(&mut board, 3, 0, PieceType::Chariot, Color::Black);
        // Black chariot may only interpose or capture.
        let moves = legal_moves(&board, pos(3, 0), &PerpetualGuard::NONE);
        assert_eq!(moves, vec![pos(3, 4)]);
    }

    #[test]
    fn test_invalid_pattern_and_empty_source() {
        let board = Board::new();
        assert_eq!(
            validate_move(&board, pos(9, 0), pos(9, 4), &PerpetualGuard::NONE),
            Err(MoveError::InvalidMovePattern)
        );
        assert_eq!(
            validate_move(&board, pos(4, 4), pos(5, 4), &PerpetualGuard::NONE),
            Err(MoveError::NoPieceAtSource)
        );
    }

    #[test]
    fn test_guard_blocks_only_repeated_checking_moves() {
        let mut board = Board::empty();
        put(&mut board, 0, 3, PieceType::General, Color::Black);
        put(&mut board, 9, 5, PieceType::General, Color::Red);
        put(&mut board, 5, 4, PieceType::Chariot, Color::Red);
        let history = [CheckPattern {
            piece: Piece::new(PieceType::Chariot, Color::Red),
            from: pos(5, 4),
            to: pos(5, 3),
        }];

        let below_limit = PerpetualGuard {
            streak: 2,
            history: &history,
        };
        assert!(legal_moves(&board, pos(5, 4), &below_limit).contains(&pos(5, 3)));

        let at_limit = PerpetualGuard {
            streak: PERPETUAL_CHECK_LIMIT,
            history: &history,
        };
        let moves = legal_moves(&board, pos(5, 4), &at_limit);
        assert!(!moves.contains(&pos(5, 3)));
        // A different check is still allowed, and so are quiet moves.
        assert!(moves.contains(&pos(0, 4)));
        assert!(moves.contains(&pos(6, 4)));
        assert_eq!(
            validate_move(&board, pos(5, 4), pos(5, 3), &at_limit),
            Err(MoveError::PerpetualCheck)
        );
    }

    #[test]
    fn test_has_any_legal_move_stalemate() {
        let mut board = Board::empty();
        put(&mut board, 0, 3, PieceType::General, Color::Black);
        put(&mut board, 9, 4, PieceType::General, Color::Red);
        put(&mut board, 2, 4, PieceType::Chariot, Color::Red);
        put(&mut board, 1, 0, PieceType::Chariot, Color::Red);
        // (0,3): right is covered by file 4, down by rank 1; not in check.
        assert!(!is_in_check(&board, Color::Black));
        assert!(!has_any_legal_move(&board, Color::Black, &PerpetualGuard::NONE));
        assert!(has_any_legal_move(&board, Color::Red, &PerpetualGuard::NONE));
    }
}
