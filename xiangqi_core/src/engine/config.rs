use crate::logic::board::PieceType;
use crate::logic::eval_constants::{
    MATE_SCORE, SOLDIER_ADVANCE_BONUS, VAL_ADVISOR, VAL_CANNON, VAL_CHARIOT, VAL_ELEPHANT,
    VAL_GENERAL, VAL_HORSE, VAL_SOLDIER,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub val_soldier: i32,
    pub val_advisor: i32,
    pub val_elephant: i32,
    pub val_horse: i32,
    pub val_cannon: i32,
    pub val_chariot: i32,
    pub val_general: i32,
    pub soldier_advance_bonus: i32,
    pub mate_score: i32,

    // Search Parameters
    pub depth: u8,
    /// Probability that the root picks a weaker move on purpose.
    pub deviation_chance: f64,
    /// How many of the next-best moves a deviation chooses from.
    pub deviation_pool: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_soldier: VAL_SOLDIER,
            val_advisor: VAL_ADVISOR,
            val_elephant: VAL_ELEPHANT,
            val_horse: VAL_HORSE,
            val_cannon: VAL_CANNON,
            val_chariot: VAL_CHARIOT,
            val_general: VAL_GENERAL,
            soldier_advance_bonus: SOLDIER_ADVANCE_BONUS,
            mate_score: MATE_SCORE,

            depth: 3,
            deviation_chance: 0.0,
            deviation_pool: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn depth(self) -> u8 {
        match self {
            Self::Easy => 2,
            Self::Medium => 3,
            Self::Hard => 4,
        }
    }

    pub const fn deviation_chance(self) -> f64 {
        match self {
            Self::Easy => 0.3,
            Self::Medium => 0.1,
            Self::Hard => 0.0,
        }
    }
}

#[derive(Deserialize)]
struct EngineConfigJson {
    val_soldier: Option<f32>,
    val_advisor: Option<f32>,
    val_elephant: Option<f32>,
    val_horse: Option<f32>,
    val_cannon: Option<f32>,
    val_chariot: Option<f32>,
    val_general: Option<f32>,

    soldier_advance_bonus: Option<i32>,
    mate_score: Option<i32>,
    depth: Option<u8>,
    deviation_chance: Option<f64>,
    deviation_pool: Option<usize>,
}

impl EngineConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            depth: difficulty.depth(),
            deviation_chance: difficulty.deviation_chance(),
            ..Self::default()
        }
    }

    /// Piece values in the JSON are multipliers of the defaults; everything
    /// else is taken as is.
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_soldier: apply_scale(default.val_soldier, json_config.val_soldier),
            val_advisor: apply_scale(default.val_advisor, json_config.val_advisor),
            val_elephant: apply_scale(default.val_elephant, json_config.val_elephant),
            val_horse: apply_scale(default.val_horse, json_config.val_horse),
            val_cannon: apply_scale(default.val_cannon, json_config.val_cannon),
            val_chariot: apply_scale(default.val_chariot, json_config.val_chariot),
            val_general: apply_scale(default.val_general, json_config.val_general),

            soldier_advance_bonus: json_config
                .soldier_advance_bonus
                .unwrap_or(default.soldier_advance_bonus),
            mate_score: json_config.mate_score.unwrap_or(default.mate_score),
            depth: json_config.depth.unwrap_or(default.depth),
            deviation_chance: json_config
                .deviation_chance
                .map_or(default.deviation_chance, |p| p.clamp(0.0, 1.0)),
            deviation_pool: json_config.deviation_pool.unwrap_or(default.deviation_pool),
        })
    }

    pub const fn value_of(&self, piece_type: PieceType) -> i32 {
        match piece_type {
            PieceType::General => self.val_general,
            PieceType::Advisor => self.val_advisor,
            PieceType::Elephant => self.val_elephant,
            PieceType::Horse => self.val_horse,
            PieceType::Chariot => self.val_chariot,
            PieceType::Cannon => self.val_cannon,
            PieceType::Soldier => self.val_soldier,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_default() {
        let config = EngineConfig::load_from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.val_soldier, VAL_SOLDIER);
    }

    #[test]
    fn test_load_config_scaled() {
        let json = r#"{
            "val_soldier": 1.5,
            "val_chariot": 0.5,
            "depth": 5
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config.val_soldier, 150);
        assert_eq!(config.val_chariot, 450);
        assert_eq!(config.depth, 5);
        // Others should be default
        assert_eq!(config.val_horse, VAL_HORSE);
        assert_eq!(config.mate_score, MATE_SCORE);
    }

    #[test]
    fn test_load_config_invalid_json() {
        assert!(EngineConfig::load_from_json("{ invalid json }").is_err());
    }

    #[test]
    fn test_deviation_chance_is_clamped() {
        let config = EngineConfig::load_from_json(r#"{ "deviation_chance": 4.0 }"#).unwrap();
        assert!((config.deviation_chance - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_absolute_config() {
        let json = r#"{
            "val_soldier": 123,
            "deviation_pool": 5
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.val_soldier, 123);
        assert_eq!(config.deviation_pool, 5);
        assert_eq!(config.val_chariot, VAL_CHARIOT);
    }

    #[test]
    fn test_difficulty_tiers() {
        let easy = EngineConfig::for_difficulty(Difficulty::Easy);
        assert_eq!(easy.depth, 2);
        assert!((easy.deviation_chance - 0.3).abs() < f64::EPSILON);
        let hard = EngineConfig::for_difficulty(Difficulty::Hard);
        assert_eq!(hard.depth, 4);
        assert!(hard.deviation_chance.abs() < f64::EPSILON);
        assert_eq!(Difficulty::Medium.depth(), 3);
    }
}
