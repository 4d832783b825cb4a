//! Rules configuration: tunable constants of the ruleset.
//!
//! Defaults follow the published rules. A table can be loaded from TOML to
//! house-rule the routine thresholds or learning speed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MechResult;

/// A band of the routine table: pools of at least `min_dice` dice may face
/// an obstacle up to `dice - spread` and still count as routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadBand {
    /// Smallest pool this band applies to.
    pub min_dice: i32,
    /// Margin the pool must exceed the obstacle by.
    pub spread: i32,
}

/// Thresholds used by the difficulty classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutineTable {
    /// Small pools facing exactly this obstacle are routine-or-difficult.
    pub ambiguous_obstacle: i32,
    /// Largest pool for which the ambiguous case applies.
    pub ambiguous_max_dice: i32,
    /// Spread bands, sorted by `min_dice`.
    pub bands: Vec<SpreadBand>,
}

impl Default for RoutineTable {
    fn default() -> Self {
        Self {
            ambiguous_obstacle: 1,
            ambiguous_max_dice: 2,
            bands: vec![
                SpreadBand {
                    min_dice: 0,
                    spread: 1,
                },
                SpreadBand {
                    min_dice: 4,
                    spread: 2,
                },
                SpreadBand {
                    min_dice: 7,
                    spread: 3,
                },
            ],
        }
    }
}

impl RoutineTable {
    /// The spread for a pool of `dice` dice. Pools below every band use 1.
    pub fn spread_for(&self, dice: i32) -> i32 {
        self.bands
            .iter()
            .filter(|band| band.min_dice <= dice)
            .max_by_key(|band| band.min_dice)
            .map_or(1, |band| band.spread)
    }
}

/// Tunable constants of the ruleset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Obstacle offered when the player does not set one.
    pub default_difficulty: u32,
    /// Routine / difficult thresholds.
    pub routine_table: RoutineTable,
    /// Skill exponent from which routine tests stop counting.
    pub routine_cutoff: u32,
    /// Learning tests needed when a skill has no aptitude set.
    pub default_learning_threshold: u32,
    /// Aptitude assumed for beginner's luck dice when none is set.
    pub beginners_luck_aptitude: u32,
    /// RNG seed for reproducible rolls; random when unset.
    pub seed: Option<u64>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            default_difficulty: 3,
            routine_table: RoutineTable::default(),
            routine_cutoff: 5,
            default_learning_threshold: 10,
            beginners_luck_aptitude: 1,
            seed: None,
        }
    }
}

impl RulesConfig {
    /// Parse a rules table from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> MechResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load a rules table from a TOML file.
    pub fn load(path: &Path) -> MechResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the default difficulty.
    pub fn with_default_difficulty(mut self, difficulty: u32) -> Self {
        self.default_difficulty = difficulty;
        self
    }

    /// Replace the routine table.
    pub fn with_routine_table(mut self, table: RoutineTable) -> Self {
        self.routine_table = table;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = RulesConfig::default();
        assert_eq!(cfg.default_difficulty, 3);
        assert_eq!(cfg.routine_cutoff, 5);
        assert_eq!(cfg.default_learning_threshold, 10);
        assert_eq!(cfg.beginners_luck_aptitude, 1);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn spread_bands() {
        let table = RoutineTable::default();
        assert_eq!(table.spread_for(1), 1);
        assert_eq!(table.spread_for(3), 1);
        assert_eq!(table.spread_for(4), 2);
        assert_eq!(table.spread_for(6), 2);
        assert_eq!(table.spread_for(7), 3);
        assert_eq!(table.spread_for(12), 3);
        assert_eq!(table.spread_for(-2), 1);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = RulesConfig::from_toml_str(
            r#"
default_difficulty = 2
seed = 7

[routine_table]
ambiguous_max_dice = 1
"#,
        )
        .unwrap();
        assert_eq!(cfg.default_difficulty, 2);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.routine_table.ambiguous_max_dice, 1);
        assert_eq!(cfg.routine_table.bands.len(), 3);
        assert_eq!(cfg.routine_cutoff, 5);
    }

    #[test]
    fn toml_bands_override() {
        let cfg = RulesConfig::from_toml_str(
            r#"
[[routine_table.bands]]
min_dice = 0
spread = 0
"#,
        )
        .unwrap();
        assert_eq!(cfg.routine_table.spread_for(5), 0);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(RulesConfig::from_toml_str("default_difficulty = \"three\"").is_err());
    }

    #[test]
    fn builder_methods() {
        let cfg = RulesConfig::default().with_seed(99).with_default_difficulty(4);
        assert_eq!(cfg.seed, Some(99));
        assert_eq!(cfg.default_difficulty, 4);
    }
}
