//! Pseudo-legal destinations per piece type. Nothing here looks at whether
//! the mover's own general is left attacked; see `legality` for that.

#[cfg(test)]
use crate::engine::Move;
use crate::logic::board::{Board, Color, Piece, PieceType, Position};

pub const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// (leg, destination) offsets. The horse is blocked only by its leg.
pub const HORSE_JUMPS: [((isize, isize), (isize, isize)); 8] = [
    ((-1, 0), (-2, -1)),
    ((-1, 0), (-2, 1)),
    ((1, 0), (2, -1)),
    ((1, 0), (2, 1)),
    ((0, -1), (-1, -2)),
    ((0, -1), (1, -2)),
    ((0, 1), (-1, 2)),
    ((0, 1), (1, 2)),
];

/// Every square the piece on `from` could reach by its movement shape.
/// Returns nothing for an empty square.
pub fn pseudo_legal_moves(board: &Board, from: Position) -> Vec<Position> {
    let mut moves = Vec::with_capacity(17);
    if let Some(piece) = board.get(from) {
        generate_piece_moves(board, from, piece, &mut moves);
    }
    moves
}

/// Pseudo-legal moves for every piece of `color`.
#[cfg(test)]
pub(crate) fn generate_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    let mut targets = Vec::with_capacity(17);
    for (from, piece) in board.pieces(color) {
        targets.clear();
        generate_piece_moves(board, from, piece, &mut targets);
        moves.extend(targets.iter().map(|&to| Move::new(from, to)));
    }
    moves
}

fn generate_piece_moves(board: &Board, from: Position, piece: Piece, out: &mut Vec<Position>) {
    match piece.piece_type {
        PieceType::General => gen_general_moves(board, from, piece.color, out),
        PieceType::Advisor => gen_advisor_moves(board, from, piece.color, out),
        PieceType::Elephant => gen_elephant_moves(board, from, piece.color, out),
        PieceType::Horse => gen_horse_moves(board, from, piece.color, out),
        PieceType::Chariot => gen_chariot_moves(board, from, piece.color, out),
        PieceType::Cannon => gen_cannon_moves(board, from, piece.color, out),
        PieceType::Soldier => gen_soldier_moves(board, from, piece.color, out),
    }
}

fn can_land(board: &Board, to: Position, color: Color) -> bool {
    board.get(to).map_or(true, |target| target.color != color)
}

fn gen_general_moves(board: &Board, from: Position, color: Color, out: &mut Vec<Position>) {
    for (dr, dc) in ORTHOGONAL {
        if let Some(to) = from.offset(dr, dc) {
            if color.in_palace(to) && can_land(board, to, color) {
                out.push(to);
            }
        }
    }

    // Flying general: the opposing general is "reachable" down an open file.
    let mut pos = from;
    while let Some(next) = pos.offset(color.forward(), 0) {
        match board.get(next) {
            None => pos = next,
            Some(p) => {
                if p.piece_type == PieceType::General && p.color != color {
                    out.push(next);
                }
                break;
            }
        }
    }
}

fn gen_advisor_moves(board: &Board, from: Position, color: Color, out: &mut Vec<Position>) {
    for (dr, dc) in DIAGONAL {
        if let Some(to) = from.offset(dr, dc) {
            if color.in_palace(to) && can_land(board, to, color) {
                out.push(to);
            }
        }
    }
}

fn gen_elephant_moves(board: &Board, from: Position, color: Color, out: &mut Vec<Position>) {
    for (dr, dc) in DIAGONAL {
        let (Some(eye), Some(to)) = (from.offset(dr, dc), from.offset(2 * dr, 2 * dc)) else {
            continue;
        };
        if color.owns_row(to.row) && board.is_empty_at(eye) && can_land(board, to, color) {
            out.push(to);
        }
    }
}

fn gen_horse_moves(board: &Board, from: Position, color: Color, out: &mut Vec<Position>) {
    for ((leg_r, leg_c), (dr, dc)) in HORSE_JUMPS {
        let (Some(leg), Some(to)) = (from.offset(leg_r, leg_c), from.offset(dr, dc)) else {
            continue;
        };
        if board.is_empty_at(leg) && can_land(board, to, color) {
            out.push(to);
        }
    }
}

fn gen_chariot_moves(board: &Board, from: Position, color: Color, out: &mut Vec<Position>) {
    for (dr, dc) in ORTHOGONAL {
        let mut pos = from;
        while let Some(next) = pos.offset(dr, dc) {
            match board.get(next) {
                None => {
                    out.push(next);
                    pos = next;
                }
                Some(p) => {
                    if p.color != color {
                        out.push(next);
                    }
                    break;
                }
            }
        }
    }
}

fn gen_cannon_moves(board: &Board, from: Position, color: Color, out: &mut Vec<Position>) {
    for (dr, dc) in ORTHOGONAL {
        let mut pos = from;
        let mut jumped = false;
        while let Some(next) = pos.offset(dr, dc) {
            pos = next;
            match (board.get(next), jumped) {
                (None, false) => out.push(next),
                (None, true) => {}
                (Some(_), false) => jumped = true,
                (Some(p), true) => {
                    if p.color != color {
                        out.push(next);
                    }
                    break;
                }
            }
        }
    }
}

/// True once the soldier stands on the opponent's half.
pub const fn has_crossed_river(color: Color, row: usize) -> bool {
    !color.owns_row(row)
}

fn gen_soldier_moves(board: &Board, from: Position, color: Color, out: &mut Vec<Position>) {
    if let Some(to) = from.offset(color.forward(), 0) {
        if can_land(board, to, color) {
            out.push(to);
        }
    }
    if has_crossed_river(color, from.row) {
        for dc in [-1, 1] {
            if let Some(to) = from.offset(0, dc) {
                if can_land(board, to, color) {
                    out.push(to);
                }
            }
        }
    }
}
