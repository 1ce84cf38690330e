use crate::logic::board::{Color, Position};

// Piece Values
pub const VAL_SOLDIER: i32 = 100;
pub const VAL_ADVISOR: i32 = 200;
pub const VAL_ELEPHANT: i32 = 200;
pub const VAL_HORSE: i32 = 400;
pub const VAL_CANNON: i32 = 450;
pub const VAL_CHARIOT: i32 = 900;
pub const VAL_GENERAL: i32 = 10000;

/// Per step a soldier has advanced past the river.
pub const SOLDIER_ADVANCE_BONUS: i32 = 10;

/// Base score of a side with no legal move. The search adds the remaining
/// depth so that quicker mates rank higher.
pub const MATE_SCORE: i32 = 100_000;

// Piece-Square Tables, written from Red's side of the board:
// row 0 is Black's back rank, row 9 is Red's. Black reads them mirrored.

#[rustfmt::skip]
pub const PST_HORSE: [[i32; 9]; 10] = [
    [  4,   8,  16,  12,   4,  12,  16,   8,   4],
    [  4,  10,  28,  16,   8,  16,  28,  10,   4],
    [ 12,  14,  16,  20,  18,  20,  16,  14,  12],
    [  8,  24,  18,  24,  20,  24,  18,  24,   8],
    [  6,  16,  14,  18,  16,  18,  14,  16,   6],
    [  4,  12,  16,  14,  12,  14,  16,  12,   4],
    [  2,   6,   8,   6,  10,   6,   8,   6,   2],
    [  4,   2,   8,   8,   4,   8,   8,   2,   4],
    [  0,   2,   4,   4, -10,   4,   4,   2,   0],
    [  0,  -4,   0,   0,   0,   0,   0,  -4,   0],
];

#[rustfmt::skip]
pub const PST_CANNON: [[i32; 9]; 10] = [
    [  6,   4,   0, -10, -12, -10,   0,   4,   6],
    [  2,   2,   0,  -4, -14,  -4,   0,   2,   2],
    [  2,   2,   0, -10,  -8, -10,   0,   2,   2],
    [  0,   0,  -2,   4,  10,   4,  -2,   0,   0],
    [  0,   0,   0,   2,   8,   2,   0,   0,   0],
    [ -2,   0,   4,   2,   6,   2,   4,   0,  -2],
    [  0,   0,   0,   2,   4,   2,   0,   0,   0],
    [  4,   0,   8,   6,  10,   6,   8,   0,   4],
    [  0,   2,   4,   6,   6,   6,   4,   2,   0],
    [  0,   0,   2,   6,   6,   6,   2,   0,   0],
];

/// Reads `table` for a piece of `color` standing on `pos`.
pub fn pst_value(table: &[[i32; 9]; 10], color: Color, pos: Position) -> i32 {
    let row = match color {
        Color::Red => pos.row,
        Color::Black => 9 - pos.row,
    };
    table
        .get(row)
        .and_then(|r| r.get(pos.col))
        .copied()
        .unwrap_or(0)
}

/// How many rows past the river a soldier of `color` on `row` stands;
/// 0 while still on its own half.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub const fn steps_past_river(color: Color, row: usize) -> i32 {
    match color {
        Color::Red if row <= 4 => 5 - row as i32,
        Color::Black if row >= 5 => row as i32 - 4,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pst_is_mirrored_for_black() {
        let red = Position::new(2, 2).unwrap();
        let black = Position::new(7, 2).unwrap();
        assert_eq!(
            pst_value(&PST_HORSE, Color::Red, red),
            pst_value(&PST_HORSE, Color::Black, black)
        );
    }

    #[test]
    fn test_steps_past_river() {
        assert_eq!(steps_past_river(Color::Red, 6), 0);
        assert_eq!(steps_past_river(Color::Red, 5), 0);
        assert_eq!(steps_past_river(Color::Red, 4), 1);
        assert_eq!(steps_past_river(Color::Red, 0), 5);
        assert_eq!(steps_past_river(Color::Black, 4), 0);
        assert_eq!(steps_past_river(Color::Black, 5), 1);
        assert_eq!(steps_past_river(Color::Black, 9), 5);
    }
}
