use crate::logic::board::{Board, Color, Piece, PieceType, Position};
use crate::logic::generator::{has_crossed_river, DIAGONAL, HORSE_JUMPS, ORTHOGONAL};

/// Checks if `color`'s general is attacked. A missing general counts as
/// check: that side has already lost.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    let Some(general) = board.find_general(color) else {
        return true;
    };
    is_attacked_by(board, general, color.opposite())
}

/// Whether `attacker` could capture on the occupied square `target`, found by
/// looking outward from the target instead of generating every move. Cannon
/// slides onto an empty square are not counted.
pub fn is_attacked_by(board: &Board, target: Position, attacker: Color) -> bool {
    let occupant = board.get(target);
    if occupant.is_some_and(|p| p.color == attacker) {
        return false;
    }
    let enemy = |pt: PieceType| Some(Piece::new(pt, attacker));
    let holds_general = occupant.is_some_and(|p| p.piece_type == PieceType::General);

    // 1. Lines: chariot or facing general on the first hit, cannon on the second.
    for (dr, dc) in ORTHOGONAL {
        let mut pos = target;
        let mut screens = 0;
        while let Some(next) = pos.offset(dr, dc) {
            pos = next;
            let Some(piece) = board.get(next) else {
                continue;
            };
            screens += 1;
            if screens == 1 {
                if piece == Piece::new(PieceType::Chariot, attacker) {
                    return true;
                }
                if holds_general && dc == 0 && piece == Piece::new(PieceType::General, attacker) {
                    return true;
                }
            } else {
                if occupant.is_some() && piece == Piece::new(PieceType::Cannon, attacker) {
                    return true;
                }
                break;
            }
        }
    }

    // 2. Horses: a horse standing at target - jump lands here unless its leg is taken.
    for ((leg_r, leg_c), (dr, dc)) in HORSE_JUMPS {
        let Some(horse) = target.offset(-dr, -dc) else {
            continue;
        };
        if board.get(horse) == enemy(PieceType::Horse)
            && horse.offset(leg_r, leg_c).is_some_and(|leg| board.is_empty_at(leg))
        {
            return true;
        }
    }

    // 3. Soldiers: one step forward, or sideways after crossing the river.
    if let Some(from) = target.offset(-attacker.forward(), 0) {
        if board.get(from) == enemy(PieceType::Soldier) {
            return true;
        }
    }
    for dc in [-1, 1] {
        if let Some(from) = target.offset(0, dc) {
            if board.get(from) == enemy(PieceType::Soldier) && has_crossed_river(attacker, from.row) {
                return true;
            }
        }
    }

    // 4. Short steps that stay inside the attacker's palace or half.
    for (dr, dc) in ORTHOGONAL {
        if let Some(from) = target.offset(dr, dc) {
            if board.get(from) == enemy(PieceType::General) && attacker.in_palace(target) {
                return true;
            }
        }
    }
    for (dr, dc) in DIAGONAL {
        if let Some(from) = target.offset(dr, dc) {
            if board.get(from) == enemy(PieceType::Advisor) && attacker.in_palace(target) {
                return true;
            }
        }
        if let (Some(eye), Some(from)) = (target.offset(dr, dc), target.offset(2 * dr, 2 * dc)) {
            if board.get(from) == enemy(PieceType::Elephant)
                && attacker.owns_row(target.row)
                && board.is_empty_at(eye)
            {
                return true;
            }
        }
    }

    false
}

/// Both generals on one file with nothing between them. Such a position is
/// illegal to move into.
pub fn is_flying_general(board: &Board) -> bool {
    let (Some(red), Some(black)) = (
        board.find_general(Color::Red),
        board.find_general(Color::Black),
    ) else {
        return false;
    };
    if red.col != black.col {
        return false;
    }
    let (top, bottom) = (red.row.min(black.row), red.row.max(black.row));
    ((top + 1)..bottom).all(|row| board.piece_at(row, red.col).is_none())
}
