//! Difficulty tiers used to bucket tests for advancement.

use std::fmt;

use bw_core::TestBucket;
use serde::{Deserialize, Serialize};

use crate::config::RoutineTable;

/// How hard a test was relative to the dice brought to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyTier {
    /// The pool beats the obstacle by at least the table's spread.
    Routine,
    /// The pool covers the obstacle without the spread.
    Difficult,
    /// The obstacle is larger than the pool.
    Challenging,
    /// Tiny pool against the minimum obstacle; the player picks.
    RoutineOrDifficult,
}

impl DifficultyTier {
    /// The advancement bucket for a concrete tier, or `None` when the
    /// player has to choose.
    pub fn bucket(self) -> Option<TestBucket> {
        match self {
            Self::Routine => Some(TestBucket::Routine),
            Self::Difficult => Some(TestBucket::Difficult),
            Self::Challenging => Some(TestBucket::Challenging),
            Self::RoutineOrDifficult => None,
        }
    }
}

impl From<TestBucket> for DifficultyTier {
    fn from(bucket: TestBucket) -> Self {
        match bucket {
            TestBucket::Routine => Self::Routine,
            TestBucket::Difficult => Self::Difficult,
            TestBucket::Challenging => Self::Challenging,
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routine => write!(f, "Routine"),
            Self::Difficult => write!(f, "Difficult"),
            Self::Challenging => write!(f, "Challenging"),
            Self::RoutineOrDifficult => write!(f, "Routine/Difficult"),
        }
    }
}

/// Classify a test. `dice` is the effective pool without artha.
pub fn classify(dice: i32, obstacle: i32, table: &RoutineTable) -> DifficultyTier {
    if obstacle > dice {
        return DifficultyTier::Challenging;
    }
    if dice <= table.ambiguous_max_dice && obstacle == table.ambiguous_obstacle {
        return DifficultyTier::RoutineOrDifficult;
    }
    if dice - table.spread_for(dice) >= obstacle {
        DifficultyTier::Routine
    } else {
        DifficultyTier::Difficult
    }
}
