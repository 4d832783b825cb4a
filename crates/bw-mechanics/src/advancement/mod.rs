//! Advancement bookkeeping: test requirements, eligibility, and logging.
//!
//! Every logged test lands in exactly one of the three difficulty tallies of
//! a trait. Once the tallies meet the requirements for the current exponent
//! the trait is eligible, and advancing bumps the exponent and clears the
//! tallies.

pub mod learning;
pub mod ledger;
pub mod tax;

use bw_core::{Ability, AdvancementRecord, AttributeName, TestBucket};
use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::difficulty::DifficultyTier;

pub use learning::{beginners_luck_exponent, graduation_exponent, learning_threshold};
pub use ledger::Ledger;
pub use tax::{TaxAssessment, assess_tax};

/// What kind of trait is being advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitKind {
    /// A skill. Uses routine tests at low exponents.
    Skill,
    /// A stat. Never uses routine tests.
    Stat,
    /// An attribute. Never uses routine tests.
    Attribute(AttributeName),
}

impl TraitKind {
    /// Whether routine tests count towards advancing this trait.
    pub fn uses_routine(self) -> bool {
        matches!(self, Self::Skill)
    }

    /// Which logged tests count for this trait.
    pub fn counting_rule(self) -> CountingRule {
        match self {
            Self::Attribute(AttributeName::Resources) => CountingRule::SuccessesOnly,
            _ => CountingRule::AllTests,
        }
    }
}

/// Whether failed tests are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CountingRule {
    /// Passed and failed tests both count.
    #[default]
    AllTests,
    /// Only passed tests count.
    SuccessesOnly,
}

/// Tests needed in each bucket to advance from the current exponent.
/// A zero entry means the bucket is not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    /// Routine tests needed.
    pub routine: u32,
    /// Difficult tests needed.
    pub difficult: u32,
    /// Challenging tests needed.
    pub challenging: u32,
}

/// Requirements to advance a trait of `kind` at `exponent`.
pub fn requirements(exponent: u32, kind: TraitKind, rules: &RulesConfig) -> Requirements {
    let routine = if kind.uses_routine() && exponent < rules.routine_cutoff {
        exponent.max(1)
    } else {
        0
    };
    Requirements {
        routine,
        difficult: exponent.div_ceil(2).max(1),
        challenging: (exponent.saturating_sub(2) / 2).max(1),
    }
}

/// Whether the logged tests of `ability` make it eligible to advance.
pub fn can_advance(ability: &Ability, kind: TraitKind, rules: &RulesConfig) -> bool {
    let req = requirements(ability.exponent, kind, rules);
    let record = &ability.record;
    let routine = req.routine > 0 && record.routine.total() >= req.routine;
    let difficult = record.difficult.total() >= req.difficult;
    let challenging = record.challenging.total() >= req.challenging;

    if ability.exponent == 0 {
        return routine || difficult || challenging;
    }
    if req.routine > 0 {
        [routine, difficult, challenging].iter().filter(|met| **met).count() >= 2
    } else {
        difficult && challenging
    }
}

/// Log one test in `bucket`. Returns false when the counting rule drops it.
pub fn add_test(
    record: &mut AdvancementRecord,
    bucket: TestBucket,
    success: bool,
    rule: CountingRule,
) -> bool {
    if rule == CountingRule::SuccessesOnly && !success {
        return false;
    }
    let tally = record.tally_mut(bucket);
    if success {
        tally.passed += 1;
    } else {
        tally.failed += 1;
    }
    true
}

/// The bucket a stat or attribute test lands in. Routine tests do not count
/// and the ambiguous tier counts as difficult.
pub fn stat_bucket(tier: DifficultyTier) -> Option<TestBucket> {
    match tier {
        DifficultyTier::Routine => None,
        DifficultyTier::RoutineOrDifficult | DifficultyTier::Difficult => {
            Some(TestBucket::Difficult)
        }
        DifficultyTier::Challenging => Some(TestBucket::Challenging),
    }
}

/// Raise the exponent by one and clear the tallies.
pub fn advance(ability: &mut Ability) {
    ability.exponent += 1;
    ability.record.reset_tallies();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bw_core::TierTally;

    fn rules() -> RulesConfig {
        RulesConfig::default()
    }

    fn with_tallies(exponent: u32, routine: u32, difficult: u32, challenging: u32) -> Ability {
        let mut ability = Ability::new(exponent);
        ability.record.routine = TierTally {
            passed: routine,
            failed: 0,
        };
        ability.record.difficult = TierTally {
            passed: 0,
            failed: difficult,
        };
        ability.record.challenging = TierTally {
            passed: challenging,
            failed: 0,
        };
        ability
    }

    #[test]
    fn skill_requirements() {
        let req = requirements(4, TraitKind::Skill, &rules());
        assert_eq!(
            req,
            Requirements {
                routine: 4,
                difficult: 2,
                challenging: 1,
            }
        );
        let req = requirements(6, TraitKind::Skill, &rules());
        assert_eq!(req.routine, 0);
        assert_eq!(req.difficult, 3);
        assert_eq!(req.challenging, 2);
    }

    #[test]
    fn zero_exponent_requirements() {
        let req = requirements(0, TraitKind::Skill, &rules());
        assert_eq!(req.routine, 1);
        assert_eq!(req.difficult, 1);
        assert_eq!(req.challenging, 1);
    }

    #[test]
    fn stats_ignore_routine() {
        let req = requirements(3, TraitKind::Stat, &rules());
        assert_eq!(req.routine, 0);
        let req = requirements(3, TraitKind::Attribute(AttributeName::Health), &rules());
        assert_eq!(req.routine, 0);
    }

    #[test]
    fn routine_cutoff_is_configurable() {
        let rules = RulesConfig {
            routine_cutoff: 3,
            ..RulesConfig::default()
        };
        assert_eq!(requirements(3, TraitKind::Skill, &rules).routine, 0);
        assert_eq!(requirements(2, TraitKind::Skill, &rules).routine, 2);
    }

    #[test]
    fn skill_needs_two_of_three() {
        let rules = rules();
        assert!(!can_advance(&with_tallies(3, 3, 0, 0), TraitKind::Skill, &rules));
        assert!(can_advance(&with_tallies(3, 3, 2, 0), TraitKind::Skill, &rules));
        assert!(can_advance(&with_tallies(3, 3, 0, 1), TraitKind::Skill, &rules));
        assert!(can_advance(&with_tallies(3, 0, 2, 1), TraitKind::Skill, &rules));
    }

    #[test]
    fn stat_needs_difficult_and_challenging() {
        let rules = rules();
        assert!(!can_advance(&with_tallies(4, 9, 2, 0), TraitKind::Stat, &rules));
        assert!(can_advance(&with_tallies(4, 0, 2, 1), TraitKind::Stat, &rules));
    }

    #[test]
    fn high_skill_behaves_like_stat() {
        let rules = rules();
        assert!(!can_advance(&with_tallies(6, 9, 3, 0), TraitKind::Skill, &rules));
        assert!(can_advance(&with_tallies(6, 0, 3, 2), TraitKind::Skill, &rules));
    }

    #[test]
    fn zero_exponent_needs_any_one() {
        let rules = rules();
        assert!(!can_advance(&with_tallies(0, 0, 0, 0), TraitKind::Stat, &rules));
        assert!(can_advance(&with_tallies(0, 0, 1, 0), TraitKind::Stat, &rules));
        assert!(can_advance(&with_tallies(0, 1, 0, 0), TraitKind::Skill, &rules));
    }

    #[test]
    fn add_test_increments_one_tally() {
        let mut record = AdvancementRecord::default();
        assert!(add_test(
            &mut record,
            TestBucket::Difficult,
            false,
            CountingRule::AllTests
        ));
        assert_eq!(record.difficult.failed, 1);
        assert_eq!(record.routine.total() + record.challenging.total(), 0);
    }

    #[test]
    fn successes_only_drops_failures() {
        let mut record = AdvancementRecord::default();
        assert!(!add_test(
            &mut record,
            TestBucket::Challenging,
            false,
            CountingRule::SuccessesOnly
        ));
        assert_eq!(record.challenging.total(), 0);
        assert!(add_test(
            &mut record,
            TestBucket::Challenging,
            true,
            CountingRule::SuccessesOnly
        ));
        assert_eq!(record.challenging.passed, 1);
    }

    #[test]
    fn resources_counts_successes_only() {
        assert_eq!(
            TraitKind::Attribute(AttributeName::Resources).counting_rule(),
            CountingRule::SuccessesOnly
        );
        assert_eq!(
            TraitKind::Attribute(AttributeName::Steel).counting_rule(),
            CountingRule::AllTests
        );
    }

    #[test]
    fn stat_bucket_folding() {
        assert_eq!(stat_bucket(DifficultyTier::Routine), None);
        assert_eq!(
            stat_bucket(DifficultyTier::RoutineOrDifficult),
            Some(TestBucket::Difficult)
        );
        assert_eq!(
            stat_bucket(DifficultyTier::Challenging),
            Some(TestBucket::Challenging)
        );
    }

    #[test]
    fn advance_resets_tallies_keeps_tax() {
        let mut ability = with_tallies(3, 3, 2, 1);
        ability.record.tax = 1;
        advance(&mut ability);
        assert_eq!(ability.exponent, 4);
        assert_eq!(ability.record.routine.total(), 0);
        assert_eq!(ability.record.difficult.total(), 0);
        assert_eq!(ability.record.challenging.total(), 0);
        assert_eq!(ability.record.tax, 1);
    }
}
