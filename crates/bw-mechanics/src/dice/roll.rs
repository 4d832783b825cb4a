//! Dice roll results and success counting.

use std::fmt;

use bw_core::Shade;
use serde::{Deserialize, Serialize};

use super::D6;

/// The result of rolling a single die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// The face rolled (1 to 6).
    pub face: u32,
    /// Whether the face met the success threshold.
    pub success: bool,
    /// True if this die was added by an exploding six.
    pub exploded: bool,
}

/// The result of rolling an entire pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// Individual die results, in the order rolled.
    pub dice: Vec<DieResult>,
}

impl DiceRoll {
    /// Build a roll from known faces. With `open`, every die after a six is
    /// marked as exploded.
    pub fn from_faces(faces: &[u32], open: bool, shade: Shade) -> Self {
        let threshold = shade.success_threshold();
        let mut chained = false;
        let dice = faces
            .iter()
            .map(|&face| {
                let result = DieResult {
                    face,
                    success: face >= threshold,
                    exploded: chained,
                };
                chained = open && face == D6;
                result
            })
            .collect();
        Self { dice }
    }

    /// Number of dice that succeeded.
    pub fn successes(&self) -> u32 {
        self.dice.iter().filter(|d| d.success).count() as u32
    }

    /// Number of dice that failed.
    pub fn failures(&self) -> usize {
        self.dice.iter().filter(|d| !d.success).count()
    }

    /// Number of dice rolled, including explosions.
    pub fn count(&self) -> usize {
        self.dice.len()
    }

    /// Number of dice added by exploding sixes.
    pub fn explosions(&self) -> usize {
        self.dice.iter().filter(|d| d.exploded).count()
    }

    /// The faces rolled, in order.
    pub fn faces(&self) -> Vec<u32> {
        self.dice.iter().map(|d| d.face).collect()
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self
            .dice
            .iter()
            .map(|d| {
                if d.exploded {
                    format!("{}*", d.face)
                } else {
                    d.face.to_string()
                }
            })
            .collect();
        write!(f, "[{}] = {}", values.join(", "), self.successes())
    }
}
