//! Recording tests against a character and committing advancement.
//!
//! The ledger owns the decide-then-commit step of a roll: every change it
//! makes is written through the [`CharacterStore`], and every change that
//! needs the player's consent waits on the [`Prompt`] first.

use bw_core::{AttributeName, RelationshipId, Skill, SkillId, StatName, TestBucket, TraitRef};
use tracing::{debug, info};

use super::learning::{graduation_exponent, learning_threshold};
use super::tax::TaxAssessment;
use super::{TraitKind, add_test, advance, can_advance, stat_bucket};
use crate::config::RulesConfig;
use crate::difficulty::DifficultyTier;
use crate::error::MechResult;
use crate::message::AdvancementEvent;
use crate::prompt::Prompt;
use crate::store::{CharacterStore, TraitUpdate};

/// Commits the bookkeeping of a single roll.
pub struct Ledger<'a> {
    store: &'a mut dyn CharacterStore,
    prompt: &'a mut dyn Prompt,
    rules: &'a RulesConfig,
    events: Vec<AdvancementEvent>,
}

impl<'a> Ledger<'a> {
    /// Create a ledger writing to `store` and asking `prompt`.
    pub fn new(
        store: &'a mut dyn CharacterStore,
        prompt: &'a mut dyn Prompt,
        rules: &'a RulesConfig,
    ) -> Self {
        Self {
            store,
            prompt,
            rules,
            events: Vec::new(),
        }
    }

    /// Events committed (or declined) so far, in order.
    pub fn events(&self) -> &[AdvancementEvent] {
        &self.events
    }

    /// Consume the ledger and return its events.
    pub fn into_events(self) -> Vec<AdvancementEvent> {
        self.events
    }

    /// Log a stat test and offer advancement.
    pub fn log_stat_test(
        &mut self,
        stat: StatName,
        tier: DifficultyTier,
        success: bool,
    ) -> MechResult<()> {
        self.log_folded(TraitRef::Stat(stat), TraitKind::Stat, tier, success)
    }

    /// Log an attribute test and offer advancement.
    pub fn log_attribute_test(
        &mut self,
        attribute: AttributeName,
        tier: DifficultyTier,
        success: bool,
    ) -> MechResult<()> {
        self.log_folded(
            TraitRef::Attribute(attribute),
            TraitKind::Attribute(attribute),
            tier,
            success,
        )
    }

    /// Log a skill test. The ambiguous tier asks the player for a bucket.
    pub fn log_skill_test(
        &mut self,
        skill: SkillId,
        tier: DifficultyTier,
        success: bool,
    ) -> MechResult<()> {
        let target = TraitRef::Skill(skill);
        let name = self.store.character().trait_name(target)?;
        let bucket = match tier.bucket() {
            Some(bucket) => bucket,
            None => {
                let options = [TestBucket::Routine, TestBucket::Difficult];
                let labels: Vec<String> = options.iter().map(ToString::to_string).collect();
                let picked = self.prompt.choose(
                    "Routine or Difficult?",
                    "This test can count as routine or difficult for advancement. \
                     Pick which one you'd prefer.",
                    &labels,
                );
                match picked.and_then(|i| options.get(i)) {
                    Some(bucket) => *bucket,
                    None => {
                        self.not_logged(name, "no bucket chosen");
                        return Ok(());
                    }
                }
            }
        };
        self.log_in_bucket(target, TraitKind::Skill, name, bucket, success)
    }

    /// Log a beginner's luck test on a learning skill.
    ///
    /// Routine tests count towards learning the skill. Difficult and
    /// challenging tests are credited to a root stat instead, and the
    /// ambiguous tier lets the player pick one path.
    pub fn log_learning_test(
        &mut self,
        skill: SkillId,
        tier: DifficultyTier,
        success: bool,
    ) -> MechResult<()> {
        let skill = self.store.character().skill(skill)?.clone();
        match tier {
            DifficultyTier::Routine => self.add_learning_progress(&skill),
            DifficultyTier::RoutineOrDifficult => {
                let options = vec![
                    "Apply as Routine".to_string(),
                    "Apply as Difficult".to_string(),
                ];
                let picked = self.prompt.choose(
                    "Pick where to assign the test",
                    &format!(
                        "This test can count towards learning {} or towards its root stat.",
                        skill.name
                    ),
                    &options,
                );
                match picked {
                    Some(0) => self.add_learning_progress(&skill),
                    Some(1) => self.credit_root(&skill, DifficultyTier::Difficult, success),
                    _ => {
                        self.not_logged(skill.name, "no path chosen");
                        Ok(())
                    }
                }
            }
            DifficultyTier::Difficult | DifficultyTier::Challenging => {
                self.credit_root(&skill, tier, success)
            }
        }
    }

    /// Advance a relationship that is still being built by one step.
    pub fn build_relationship(&mut self, relationship: RelationshipId) -> MechResult<()> {
        let rel = self.store.character().relationship(relationship)?;
        if !rel.building {
            return Ok(());
        }
        let name = rel.name.clone();
        let progress = rel.building_progress + 1;
        self.store
            .update_relationship_progress(relationship, progress)?;
        info!(relationship = %name, progress, "relationship progress");
        self.events
            .push(AdvancementEvent::RelationshipProgress { name, progress });
        Ok(())
    }

    /// Ask the player to accept a tax assessment and write it if they do.
    pub fn settle_tax(&mut self, assessment: &mut TaxAssessment) -> MechResult<()> {
        let target = assessment.stat.to_string();
        if !self
            .prompt
            .confirm(assessment.prompt_title(), &assessment.prompt_body())
        {
            debug!(stat = %target, "tax declined");
            self.events.push(AdvancementEvent::TaxDeclined { target });
            return Ok(());
        }
        self.store.update_tax(assessment.stat, assessment.new_tax)?;
        assessment.committed = true;
        info!(
            stat = %target,
            tax = assessment.new_tax,
            overtaxed = assessment.overtaxed,
            "tax committed"
        );
        self.events.push(AdvancementEvent::TaxCommitted {
            target,
            tax: assessment.new_tax,
        });
        Ok(())
    }

    fn log_folded(
        &mut self,
        target: TraitRef,
        kind: TraitKind,
        tier: DifficultyTier,
        success: bool,
    ) -> MechResult<()> {
        let name = self.store.character().trait_name(target)?;
        match stat_bucket(tier) {
            Some(bucket) => self.log_in_bucket(target, kind, name, bucket, success),
            None => {
                self.not_logged(name, "routine tests do not count");
                Ok(())
            }
        }
    }

    fn log_in_bucket(
        &mut self,
        target: TraitRef,
        kind: TraitKind,
        name: String,
        bucket: TestBucket,
        success: bool,
    ) -> MechResult<()> {
        let mut ability = self.store.character().ability(target)?.clone();
        if !add_test(&mut ability.record, bucket, success, kind.counting_rule()) {
            self.not_logged(name, "failed tests do not count");
            return Ok(());
        }
        self.store
            .update_trait(target, TraitUpdate::from_ability(&ability))?;
        info!(%target, %bucket, success, "test logged");
        self.events.push(AdvancementEvent::TestLogged {
            target: name.clone(),
            bucket,
            success,
        });

        if !can_advance(&ability, kind, self.rules) {
            return Ok(());
        }
        let confirmed = self.prompt.confirm(
            &format!("Advance {name}?"),
            &format!("{name} is ready to advance. Go ahead?"),
        );
        if !confirmed {
            self.events
                .push(AdvancementEvent::AdvancementDeclined { target: name });
            return Ok(());
        }
        advance(&mut ability);
        self.store
            .update_trait(target, TraitUpdate::from_ability(&ability))?;
        info!(%target, exponent = ability.exponent, "trait advanced");
        self.events.push(AdvancementEvent::Advanced {
            target: name,
            exponent: ability.exponent,
        });
        Ok(())
    }

    fn credit_root(
        &mut self,
        skill: &Skill,
        tier: DifficultyTier,
        success: bool,
    ) -> MechResult<()> {
        let roots = skill.roots();
        let root = match roots.as_slice() {
            [only] => *only,
            _ => {
                let labels: Vec<String> = roots.iter().map(ToString::to_string).collect();
                let picked = self.prompt.choose(
                    "Pick root stat to advance",
                    &format!(
                        "This test can count towards advancing {}. Which one?",
                        labels.join(" or ")
                    ),
                    &labels,
                );
                match picked.and_then(|i| roots.get(i)) {
                    Some(root) => *root,
                    None => {
                        self.not_logged(skill.name.clone(), "no root stat chosen");
                        return Ok(());
                    }
                }
            }
        };
        self.log_stat_test(root, tier, success)
    }

    fn add_learning_progress(&mut self, skill: &Skill) -> MechResult<()> {
        let required = learning_threshold(skill, self.rules);
        let progress = skill.ability.record.learning_progress + 1;
        self.store.update_learning_progress(skill.id, progress)?;
        info!(skill = %skill.name, progress, required, "learning progress");
        self.events.push(AdvancementEvent::LearningProgress {
            skill: skill.name.clone(),
            progress,
            required,
        });
        if progress < required {
            return Ok(());
        }

        let confirmed = self.prompt.confirm(
            &format!("Finish Training {}?", skill.name),
            &format!("{} is ready to become a full skill. Go ahead?", skill.name),
        );
        if !confirmed {
            self.events.push(AdvancementEvent::GraduationDeclined {
                skill: skill.name.clone(),
            });
            return Ok(());
        }
        let exponent = graduation_exponent(required);
        let mut record = skill.ability.record.clone();
        record.reset_tallies();
        record.learning_progress = 0;
        self.store.update_trait(
            TraitRef::Skill(skill.id),
            TraitUpdate {
                exponent,
                record,
                learning: Some(false),
            },
        )?;
        info!(skill = %skill.name, exponent, "skill learned");
        self.events.push(AdvancementEvent::Graduated {
            skill: skill.name.clone(),
            exponent,
        });
        Ok(())
    }

    fn not_logged(&mut self, target: String, reason: &str) {
        debug!(%target, reason, "test not logged");
        self.events.push(AdvancementEvent::NotLogged {
            target,
            reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advancement::tax::assess_tax;
    use crate::prompt::{Answer, AutoPrompt, ScriptedPrompt};
    use bw_core::{Ability, AttributeName, Character, Relationship, TierTally};

    fn tasha() -> Character {
        Character::new("Tasha")
            .with_stat(StatName::Will, Ability::new(4))
            .with_stat(StatName::Perception, Ability::new(5))
            .with_stat(StatName::Agility, Ability::new(3))
            .with_stat(StatName::Forte, Ability::new(4))
            .with_attribute(AttributeName::Resources, Ability::new(2))
    }

    #[test]
    fn stat_routine_not_logged() {
        let mut c = tasha();
        let rules = RulesConfig::default();
        let mut prompt = AutoPrompt::yes();
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_stat_test(StatName::Will, DifficultyTier::Routine, true)
            .unwrap();
        assert!(matches!(
            ledger.events()[0],
            AdvancementEvent::NotLogged { .. }
        ));
        drop(ledger);
        assert_eq!(c.stat(StatName::Will).unwrap().record.difficult.total(), 0);
    }

    #[test]
    fn stat_ambiguous_counts_as_difficult() {
        let mut c = tasha();
        let rules = RulesConfig::default();
        let mut prompt = ScriptedPrompt::default();
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_stat_test(StatName::Will, DifficultyTier::RoutineOrDifficult, false)
            .unwrap();
        drop(ledger);
        assert_eq!(c.stat(StatName::Will).unwrap().record.difficult.failed, 1);
        assert!(prompt.asked().is_empty());
    }

    #[test]
    fn resources_failure_not_logged() {
        let mut c = tasha();
        let rules = RulesConfig::default();
        let mut prompt = AutoPrompt::yes();
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_attribute_test(AttributeName::Resources, DifficultyTier::Difficult, false)
            .unwrap();
        drop(ledger);
        let record = &c.attribute(AttributeName::Resources).unwrap().record;
        assert_eq!(record.difficult.total(), 0);
    }

    #[test]
    fn eligible_stat_advances_on_confirm() {
        let mut c = tasha();
        c.stats.get_mut(&StatName::Will).unwrap().record.difficult = TierTally {
            passed: 2,
            failed: 0,
        };
        let rules = RulesConfig::default();
        let mut prompt = ScriptedPrompt::new([Answer::Yes]);
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_stat_test(StatName::Will, DifficultyTier::Challenging, true)
            .unwrap();
        let events = ledger.into_events();
        assert!(events.contains(&AdvancementEvent::Advanced {
            target: "Will".to_string(),
            exponent: 5,
        }));
        assert_eq!(prompt.asked(), ["Advance Will?"]);
        let will = c.stat(StatName::Will).unwrap();
        assert_eq!(will.exponent, 5);
        assert_eq!(will.record.challenging.total(), 0);
    }

    #[test]
    fn declined_advancement_keeps_log() {
        let mut c = tasha();
        c.stats.get_mut(&StatName::Will).unwrap().record.difficult = TierTally {
            passed: 2,
            failed: 0,
        };
        let rules = RulesConfig::default();
        let mut prompt = ScriptedPrompt::new([Answer::No]);
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_stat_test(StatName::Will, DifficultyTier::Challenging, true)
            .unwrap();
        drop(ledger);
        let will = c.stat(StatName::Will).unwrap();
        assert_eq!(will.exponent, 4);
        assert_eq!(will.record.challenging.passed, 1);
        assert_eq!(will.record.difficult.passed, 2);
    }

    #[test]
    fn skill_ambiguous_tier_asks_for_bucket() {
        let mut c = tasha();
        let sword = c.add_skill(Skill::new("Sword", StatName::Agility, 3));
        let rules = RulesConfig::default();
        let mut prompt = ScriptedPrompt::new([Answer::Pick(0)]);
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_skill_test(sword, DifficultyTier::RoutineOrDifficult, true)
            .unwrap();
        drop(ledger);
        assert_eq!(prompt.asked(), ["Routine or Difficult?"]);
        assert_eq!(c.skill(sword).unwrap().ability.record.routine.passed, 1);
    }

    #[test]
    fn skill_dismissed_bucket_logs_nothing() {
        let mut c = tasha();
        let sword = c.add_skill(Skill::new("Sword", StatName::Agility, 3));
        let before = c.clone();
        let rules = RulesConfig::default();
        let mut prompt = ScriptedPrompt::default();
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_skill_test(sword, DifficultyTier::RoutineOrDifficult, true)
            .unwrap();
        drop(ledger);
        assert_eq!(c, before);
    }

    #[test]
    fn learning_routine_progress_and_graduation() {
        let mut c = tasha();
        let mut skill = Skill::learning("Climbing", StatName::Agility, 4);
        skill.ability.record.learning_progress = 3;
        let id = c.add_skill(skill);
        let rules = RulesConfig::default();
        let mut prompt = ScriptedPrompt::new([Answer::Yes]);
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_learning_test(id, DifficultyTier::Routine, false)
            .unwrap();
        let events = ledger.into_events();
        assert_eq!(
            events.last(),
            Some(&AdvancementEvent::Graduated {
                skill: "Climbing".to_string(),
                exponent: 3,
            })
        );
        let skill = c.skill(id).unwrap();
        assert!(!skill.learning);
        assert_eq!(skill.ability.exponent, 3);
    }

    #[test]
    fn learning_graduation_declined() {
        let mut c = tasha();
        let mut skill = Skill::learning("Climbing", StatName::Agility, 2);
        skill.ability.record.learning_progress = 1;
        let id = c.add_skill(skill);
        let rules = RulesConfig::default();
        let mut prompt = ScriptedPrompt::new([Answer::No]);
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_learning_test(id, DifficultyTier::Routine, true)
            .unwrap();
        drop(ledger);
        let skill = c.skill(id).unwrap();
        assert!(skill.learning);
        assert_eq!(skill.ability.record.learning_progress, 2);
    }

    #[test]
    fn learning_difficult_credits_root() {
        let mut c = tasha();
        let id = c.add_skill(Skill::learning("Climbing", StatName::Agility, 4));
        let rules = RulesConfig::default();
        let mut prompt = AutoPrompt::no();
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_learning_test(id, DifficultyTier::Challenging, true)
            .unwrap();
        drop(ledger);
        let agility = c.stat(StatName::Agility).unwrap();
        assert_eq!(agility.record.challenging.passed, 1);
        assert_eq!(c.skill(id).unwrap().ability.record.learning_progress, 0);
    }

    #[test]
    fn learning_ambiguous_path_choice() {
        let mut c = tasha();
        let id = c.add_skill(Skill::learning("Climbing", StatName::Agility, 4));
        let rules = RulesConfig::default();

        let mut prompt = ScriptedPrompt::new([Answer::Pick(1)]);
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_learning_test(id, DifficultyTier::RoutineOrDifficult, true)
            .unwrap();
        drop(ledger);
        assert_eq!(c.stat(StatName::Agility).unwrap().record.difficult.passed, 1);
        assert_eq!(c.skill(id).unwrap().ability.record.learning_progress, 0);

        let mut prompt = ScriptedPrompt::new([Answer::Pick(0)]);
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_learning_test(id, DifficultyTier::RoutineOrDifficult, true)
            .unwrap();
        drop(ledger);
        assert_eq!(c.stat(StatName::Agility).unwrap().record.difficult.passed, 1);
        assert_eq!(c.skill(id).unwrap().ability.record.learning_progress, 1);
    }

    #[test]
    fn dual_root_choice() {
        let mut c = tasha();
        let id = c.add_skill(
            Skill::learning("Observation", StatName::Will, 4).with_second_root(StatName::Perception),
        );
        let rules = RulesConfig::default();
        let mut prompt = ScriptedPrompt::new([Answer::Pick(1)]);
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_learning_test(id, DifficultyTier::Difficult, true)
            .unwrap();
        drop(ledger);
        assert_eq!(prompt.asked(), ["Pick root stat to advance"]);
        assert_eq!(c.stat(StatName::Perception).unwrap().record.difficult.passed, 1);
        assert_eq!(c.stat(StatName::Will).unwrap().record.difficult.passed, 0);
    }

    #[test]
    fn dual_root_dismissed() {
        let mut c = tasha();
        let id = c.add_skill(
            Skill::learning("Observation", StatName::Will, 4).with_second_root(StatName::Perception),
        );
        let before = c.clone();
        let rules = RulesConfig::default();
        let mut prompt = ScriptedPrompt::default();
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger
            .log_learning_test(id, DifficultyTier::Difficult, true)
            .unwrap();
        drop(ledger);
        assert_eq!(c, before);
    }

    #[test]
    fn relationship_building_progress() {
        let mut c = tasha();
        let mara = c.add_relationship(Relationship::new("Old Mara").building());
        let jon = c.add_relationship(Relationship::new("Jon"));
        let rules = RulesConfig::default();
        let mut prompt = AutoPrompt::no();
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger.build_relationship(mara).unwrap();
        ledger.build_relationship(jon).unwrap();
        assert_eq!(ledger.events().len(), 1);
        drop(ledger);
        assert_eq!(c.relationship(mara).unwrap().building_progress, 1);
        assert_eq!(c.relationship(jon).unwrap().building_progress, 0);
    }

    #[test]
    fn tax_needs_confirmation() {
        let mut c = tasha();
        let rules = RulesConfig::default();
        let mut assessment = assess_tax(StatName::Forte, 4, 0, 3, 1).unwrap();

        let mut prompt = AutoPrompt::no();
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger.settle_tax(&mut assessment).unwrap();
        drop(ledger);
        assert!(!assessment.committed);
        assert_eq!(c.stat(StatName::Forte).unwrap().record.tax, 0);

        let mut prompt = AutoPrompt::yes();
        let mut ledger = Ledger::new(&mut c, &mut prompt, &rules);
        ledger.settle_tax(&mut assessment).unwrap();
        drop(ledger);
        assert!(assessment.committed);
        assert_eq!(c.stat(StatName::Forte).unwrap().record.tax, 2);
    }
}
