use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::{Board, Color, Piece, PieceType, Position};
use crate::logic::eval_constants::{pst_value, steps_past_river, PST_CANNON, PST_HORSE};
use std::sync::Arc;

/// Material plus a few positional terms: horse and cannon placement tables
/// and a bonus for soldiers that have crossed the river.
pub struct MaterialEvaluator {
    config: Arc<EngineConfig>,
}

impl MaterialEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    fn piece_score(&self, piece: Piece, pos: Position) -> i32 {
        let base = self.config.value_of(piece.piece_type);
        let positional = match piece.piece_type {
            PieceType::Horse => pst_value(&PST_HORSE, piece.color, pos),
            PieceType::Cannon => pst_value(&PST_CANNON, piece.color, pos),
            PieceType::Soldier => {
                steps_past_river(piece.color, pos.row) * self.config.soldier_advance_bonus
            }
            _ => 0,
        };
        base + positional
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, board: &Board, perspective: Color) -> i32 {
        let own: i32 = board
            .pieces(perspective)
            .map(|(pos, piece)| self.piece_score(piece, pos))
            .sum();
        let theirs: i32 = board
            .pieces(perspective.opposite())
            .map(|(pos, piece)| self.piece_score(piece, pos))
            .sum();
        own - theirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> MaterialEvaluator {
        MaterialEvaluator::new(Arc::new(EngineConfig::default()))
    }

    #[test]
    fn test_opening_is_balanced() {
        let board = Board::new();
        assert_eq!(evaluator().evaluate(&board, Color::Red), 0);
        assert_eq!(evaluator().evaluate(&board, Color::Black), 0);
    }

    #[test]
    fn test_material_edge_is_antisymmetric() {
        let mut board = Board::new();
        // Red loses a chariot.
        board.set(Position::new(9, 0).unwrap(), None);
        let red = evaluator().evaluate(&board, Color::Red);
        let black = evaluator().evaluate(&board, Color::Black);
        assert_eq!(red, -black);
        assert!(red <= -EngineConfig::default().val_chariot + 50);
    }

    #[test]
    fn test_soldier_gains_value_past_river() {
        let e = evaluator();
        let soldier = Piece::new(PieceType::Soldier, Color::Red);
        let home = e.piece_score(soldier, Position::new(6, 4).unwrap());
        let crossed = e.piece_score(soldier, Position::new(3, 4).unwrap());
        assert_eq!(home, EngineConfig::default().val_soldier);
        assert_eq!(crossed - home, 2 * EngineConfig::default().soldier_advance_bonus);
    }
}
