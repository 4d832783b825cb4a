use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shade::Shade;

/// A testable trait: the exponent, shade and open-ended flag of a stat,
/// attribute or skill, plus its advancement bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ability {
    /// Base number of dice rolled for this trait.
    pub exponent: u32,
    /// Whether sixes explode into additional dice.
    #[serde(default)]
    pub open: bool,
    /// Shade of the trait's dice.
    #[serde(default)]
    pub shade: Shade,
    /// Tests logged towards the next advancement.
    #[serde(default)]
    pub record: AdvancementRecord,
}

impl Ability {
    /// Create a black-shaded, closed trait with the given exponent.
    pub fn new(exponent: u32) -> Self {
        Self {
            exponent,
            ..Self::default()
        }
    }

    /// Set the shade.
    pub fn with_shade(mut self, shade: Shade) -> Self {
        self.shade = shade;
        self
    }

    /// Make the trait open-ended.
    pub fn open_ended(mut self) -> Self {
        self.open = true;
        self
    }

    /// Exponent dice left after subtracting the accumulated tax.
    pub fn untaxed(&self) -> u32 {
        self.exponent.saturating_sub(self.record.tax)
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.shade.letter(), self.exponent)?;
        if self.open {
            write!(f, " (open)")?;
        }
        Ok(())
    }
}

/// One of the three concrete difficulty buckets tests are logged under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestBucket {
    /// Comfortably within the trait's reach.
    Routine,
    /// At the edge of the trait's reach.
    Difficult,
    /// Beyond the trait's dice.
    Challenging,
}

impl fmt::Display for TestBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routine => write!(f, "Routine"),
            Self::Difficult => write!(f, "Difficult"),
            Self::Challenging => write!(f, "Challenging"),
        }
    }
}

/// Passed and failed tests logged in one difficulty bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TierTally {
    /// Successful tests.
    #[serde(default)]
    pub passed: u32,
    /// Failed tests.
    #[serde(default)]
    pub failed: u32,
}

impl TierTally {
    /// All tests logged in this bucket.
    pub fn total(&self) -> u32 {
        self.passed + self.failed
    }
}

/// Advancement bookkeeping embedded in every trait.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdvancementRecord {
    /// Routine tests since the last advancement.
    #[serde(default)]
    pub routine: TierTally,
    /// Difficult tests since the last advancement.
    #[serde(default)]
    pub difficult: TierTally,
    /// Challenging tests since the last advancement.
    #[serde(default)]
    pub challenging: TierTally,
    /// Beginner's luck tests counted towards learning the skill.
    #[serde(default)]
    pub learning_progress: u32,
    /// Dice currently lost to tax (Will or Forte).
    #[serde(default)]
    pub tax: u32,
}

impl AdvancementRecord {
    /// The tally for a bucket.
    pub fn tally(&self, bucket: TestBucket) -> TierTally {
        match bucket {
            TestBucket::Routine => self.routine,
            TestBucket::Difficult => self.difficult,
            TestBucket::Challenging => self.challenging,
        }
    }

    /// Mutable access to the tally for a bucket.
    pub fn tally_mut(&mut self, bucket: TestBucket) -> &mut TierTally {
        match bucket {
            TestBucket::Routine => &mut self.routine,
            TestBucket::Difficult => &mut self.difficult,
            TestBucket::Challenging => &mut self.challenging,
        }
    }

    /// Clear the three difficulty tallies. Tax and learning progress are kept.
    pub fn reset_tallies(&mut self) {
        self.routine = TierTally::default();
        self.difficult = TierTally::default();
        self.challenging = TierTally::default();
    }
}
