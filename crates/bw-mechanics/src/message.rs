//! Result artifacts handed to the presentation layer.

use std::fmt;

use bw_core::{Shade, TestBucket};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::advancement::TaxAssessment;
use crate::dice::{DiceRoll, DieResult};
use crate::difficulty::DifficultyTier;

/// Format a signed delta the way breakdowns show it: `+2`, `-1`, `+0`.
pub fn signed(n: i32) -> String {
    if n >= 0 { format!("+{n}") } else { n.to_string() }
}

/// One line of a breakdown: a source label and its formatted delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    /// Where the dice or obstacle came from.
    pub label: String,
    /// Formatted delta, e.g. `+2`.
    pub value: String,
}

/// Insertion-ordered label → delta map for audit display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceBreakdown(Vec<SourceLine>);

impl SourceBreakdown {
    /// Create an empty breakdown.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Set `label` to `value`, replacing an existing line with the same label.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.0.iter_mut().find(|line| line.label == label) {
            Some(line) => line.value = value,
            None => self.0.push(SourceLine { label, value }),
        }
    }

    /// Append every line of `other`.
    pub fn extend(&mut self, other: &SourceBreakdown) {
        for line in &other.0 {
            self.insert(line.label.clone(), line.value.clone());
        }
    }

    /// The formatted value for a label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|line| line.label == label)
            .map(|line| line.value.as_str())
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceLine> {
        self.0.iter()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything the chat message for a test needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollMessage {
    /// Title of the test, e.g. "Sword Test".
    pub name: String,
    /// Successes rolled.
    pub successes: u32,
    /// Nominal difficulty shown to the players.
    pub difficulty: i32,
    /// Obstacle after all penalties.
    pub obstacle_total: i32,
    /// Whether the test passed.
    pub success: bool,
    /// Individual dice.
    pub rolls: Vec<DieResult>,
    /// Difficulty tier the test was classified as.
    pub tier: DifficultyTier,
    /// Where the dice came from.
    pub die_sources: SourceBreakdown,
    /// Where obstacle penalties came from.
    pub penalty_sources: SourceBreakdown,
    /// Shade of the rolled trait.
    pub shade: Shade,
    /// Whether the rolled trait was open-ended.
    pub open: bool,
    /// Extra narrative line (tax results, sustained effect).
    pub extra_info: Option<String>,
    /// When the dice were rolled.
    pub rolled_at: DateTime<Utc>,
    /// Re-rolls the player can still spend on this test.
    #[serde(default)]
    pub rerolls: RerollOptions,
}

impl RollMessage {
    /// The dice as a roll, for re-rolling.
    pub fn dice_roll(&self) -> DiceRoll {
        DiceRoll {
            dice: self.rolls.clone(),
        }
    }
}

/// Re-rolls open to the player after a test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerollOptions {
    /// A Fate point can be spent.
    pub fate: bool,
    /// Call-on traits that apply to the rolled trait.
    pub call_ons: Vec<String>,
}

impl RerollOptions {
    /// Returns true if no re-roll is available.
    pub fn is_empty(&self) -> bool {
        !self.fate && self.call_ons.is_empty()
    }
}

/// A change (or declined change) produced by recording a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AdvancementEvent {
    /// A test was logged in a bucket.
    TestLogged {
        /// Trait the test was logged on.
        target: String,
        /// Bucket it went into.
        bucket: TestBucket,
        /// Whether the test passed.
        success: bool,
    },
    /// The test did not count for this trait.
    NotLogged {
        /// Trait the test would have been logged on.
        target: String,
        /// Why it was not logged.
        reason: String,
    },
    /// The trait's exponent went up.
    Advanced {
        /// Trait that advanced.
        target: String,
        /// New exponent.
        exponent: u32,
    },
    /// The trait was ready to advance but the player declined.
    AdvancementDeclined {
        /// Trait that could have advanced.
        target: String,
    },
    /// A beginner's luck test counted towards learning a skill.
    LearningProgress {
        /// Skill being learned.
        skill: String,
        /// Tests counted so far.
        progress: u32,
        /// Tests needed.
        required: u32,
    },
    /// A learning skill became a full skill.
    Graduated {
        /// Skill that was learned.
        skill: String,
        /// Its starting exponent.
        exponent: u32,
    },
    /// Graduation was offered but declined.
    GraduationDeclined {
        /// Skill that could have graduated.
        skill: String,
    },
    /// A relationship being built gained progress.
    RelationshipProgress {
        /// Relationship name.
        name: String,
        /// New progress value.
        progress: u32,
    },
    /// Tax was written to a stat.
    TaxCommitted {
        /// Taxed stat.
        target: String,
        /// New tax value.
        tax: u32,
    },
    /// The player skipped applying tax.
    TaxDeclined {
        /// Stat that would have been taxed.
        target: String,
    },
}

impl fmt::Display for AdvancementEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TestLogged {
                target,
                bucket,
                success,
            } => {
                let result = if *success { "passed" } else { "failed" };
                write!(f, "{target}: logged {result} {bucket} test")
            }
            Self::NotLogged { target, reason } => write!(f, "{target}: not logged ({reason})"),
            Self::Advanced { target, exponent } => write!(f, "{target} advanced to {exponent}"),
            Self::AdvancementDeclined { target } => write!(f, "{target}: advancement declined"),
            Self::LearningProgress {
                skill,
                progress,
                required,
            } => write!(f, "{skill}: learning {progress}/{required}"),
            Self::Graduated { skill, exponent } => {
                write!(f, "{skill} learned at exponent {exponent}")
            }
            Self::GraduationDeclined { skill } => write!(f, "{skill}: training not finished"),
            Self::RelationshipProgress { name, progress } => {
                write!(f, "{name}: relationship progress {progress}")
            }
            Self::TaxCommitted { target, tax } => write!(f, "{target} tax is now {tax}"),
            Self::TaxDeclined { target } => write!(f, "{target}: tax not applied"),
        }
    }
}

/// The complete outcome of one test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollReport {
    /// The chat message data.
    pub message: RollMessage,
    /// Bookkeeping that followed the roll, in order.
    pub events: Vec<AdvancementEvent>,
    /// Tax assessment for a failed tax test.
    pub tax: Option<TaxAssessment>,
}
