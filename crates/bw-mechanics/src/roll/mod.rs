//! Roll orchestration for each test category.
//!
//! Every test runs the same pipeline:
//!
//! 1. **prepare**: read the character, validate the request, and work out
//!    the pool, obstacle and breakdowns ([`PreparedRoll`]).
//! 2. **resolve**: roll the dice, count successes and classify the tier.
//! 3. **record**: hand the outcome to the [`Ledger`], which asks the player
//!    about anything that needs consent and commits the rest.
//!
//! Nothing is written to the store before the dice are rolled, so a rejected
//! request leaves the character untouched.
//!
//! Once a test is recorded, [`TestRunner::reroll`] can spend Fate or a
//! call-on on it. The logged outcome stays as first rolled.

mod circles;
mod learning;
mod skill;
mod stat;
mod tax;

pub use circles::CirclesTest;
pub use learning::LearningTest;
pub use skill::SkillTest;
pub use stat::{AttributeTest, StatTest};
pub use tax::TaxTest;

use bw_core::{AttributeName, Character, RelationshipId, Shade, SkillId, StatName};
use chrono::Utc;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::advancement::{Ledger, TaxAssessment, assess_tax};
use crate::config::RulesConfig;
use crate::dice::{Reroll, call_on_reroll, can_call_on, can_fate_reroll, fate_reroll, roll_dice};
use crate::difficulty::classify;
use crate::error::{MechError, MechResult};
use crate::extract::BaseRollData;
use crate::message::{RerollOptions, RollMessage, RollReport, SourceBreakdown, signed};
use crate::prompt::Prompt;
use crate::store::CharacterStore;

/// A request to roll one test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollRequest {
    /// Roll a stat.
    Stat(StatTest),
    /// Roll an attribute other than Circles.
    Attribute(AttributeTest),
    /// Roll a trained skill.
    Skill(SkillTest),
    /// Roll Circles to find a contact.
    Circles(CirclesTest),
    /// Roll beginner's luck for a skill still being learned.
    Learning(LearningTest),
    /// Roll a tax test on Will or Forte.
    Tax(TaxTest),
}

/// How to pay for a re-roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RerollChoice {
    /// Spend a Fate point.
    Fate,
    /// Call on the named trait.
    CallOn(String),
}

/// Runs tests against a character.
pub struct TestRunner<'a> {
    store: &'a mut dyn CharacterStore,
    prompt: &'a mut dyn Prompt,
    rules: &'a RulesConfig,
    rng: &'a mut StdRng,
}

impl<'a> TestRunner<'a> {
    /// Create a runner.
    pub fn new(
        store: &'a mut dyn CharacterStore,
        prompt: &'a mut dyn Prompt,
        rules: &'a RulesConfig,
        rng: &'a mut StdRng,
    ) -> Self {
        Self {
            store,
            prompt,
            rules,
            rng,
        }
    }

    /// Roll a test and record it.
    pub fn run(&mut self, request: &RollRequest) -> MechResult<RollReport> {
        let prepared = self
            .prepare(request)
            .inspect_err(|e| warn!(error = %e, "roll rejected"))?;
        debug!(
            test = %prepared.name,
            pool = prepared.pool,
            obstacle = prepared.obstacle,
            "prepared roll"
        );
        let mut message = prepared.resolve(self.rules, self.rng);
        message.rerolls = reroll_options(self.store.character(), &prepared.subject, &message);

        let mut ledger = Ledger::new(&mut *self.store, &mut *self.prompt, self.rules);
        let tax = record(&mut ledger, &prepared.recording, &mut message)?;
        Ok(RollReport {
            message,
            events: ledger.into_events(),
            tax,
        })
    }

    /// Re-roll part of a recorded test and update its message in place.
    ///
    /// Fate costs the character one point. Each kind of re-roll can be used
    /// once per test.
    pub fn reroll(
        &mut self,
        message: &mut RollMessage,
        choice: &RerollChoice,
    ) -> MechResult<Reroll> {
        let roll = message.dice_roll();
        let obstacle = message.obstacle_total;
        let (label, outcome) = match choice {
            RerollChoice::Fate => {
                let fate = self.store.character().fate;
                if !message.rerolls.fate || fate == 0 {
                    return Err(MechError::InvalidRequest(format!(
                        "no Fate re-roll available for {}",
                        message.name
                    )));
                }
                let outcome = fate_reroll(&roll, message.open, message.shade, obstacle, self.rng);
                if outcome.is_some() {
                    self.store.update_fate(fate - 1)?;
                }
                ("Fate".to_string(), outcome)
            }
            RerollChoice::CallOn(name) => {
                let label = message
                    .rerolls
                    .call_ons
                    .iter()
                    .find(|c| c.eq_ignore_ascii_case(name))
                    .cloned()
                    .ok_or_else(|| {
                        MechError::InvalidRequest(format!(
                            "{name} cannot be called on for {}",
                            message.name
                        ))
                    })?;
                let outcome =
                    call_on_reroll(&roll, message.open, message.shade, obstacle, self.rng);
                (label, outcome)
            }
        };
        let outcome = outcome
            .ok_or_else(|| MechError::InvalidRequest("no dice to re-roll".to_string()))?;

        info!(
            test = %message.name,
            by = %label,
            before = message.successes,
            after = outcome.successes,
            "re-rolled"
        );
        let note = format!(
            "{label} re-roll: {} -> {} successes.",
            message.successes, outcome.successes
        );
        message.extra_info = Some(match message.extra_info.take() {
            Some(info) => format!("{info} {note}"),
            None => note,
        });
        message.rolls = outcome.roll.dice.clone();
        message.successes = outcome.successes;
        message.success = outcome.success;
        match choice {
            RerollChoice::Fate => message.rerolls.fate = false,
            RerollChoice::CallOn(_) => message.rerolls.call_ons.clear(),
        }
        Ok(outcome)
    }

    fn prepare(&self, request: &RollRequest) -> MechResult<PreparedRoll> {
        let character = self.store.character();
        match request {
            RollRequest::Stat(test) => stat::prepare_stat(character, test),
            RollRequest::Attribute(test) => stat::prepare_attribute(character, test),
            RollRequest::Skill(test) => skill::prepare(character, test),
            RollRequest::Circles(test) => circles::prepare(character, test),
            RollRequest::Learning(test) => learning::prepare(character, self.rules, test),
            RollRequest::Tax(test) => tax::prepare(character, test),
        }
    }
}

/// Where a resolved test gets recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Recording {
    Stat(StatName),
    Attribute(AttributeName),
    Skill(SkillId),
    Learning(SkillId),
    Circles(Option<RelationshipId>),
    Tax {
        stat: StatName,
        exponent: u32,
        tax: u32,
    },
}

/// Everything needed to roll a test, computed before any dice are drawn.
#[derive(Debug, Clone)]
struct PreparedRoll {
    name: String,
    /// Trait name call-ons are matched against.
    subject: String,
    /// Dice actually rolled.
    pool: i32,
    /// Dice and obstacle the tier is classified on. Artha never counts.
    tier_dice: i32,
    tier_obstacle: i32,
    /// What successes are compared against.
    obstacle: i32,
    /// Difficulty shown in the message.
    difficulty: i32,
    open: bool,
    shade: Shade,
    die_sources: SourceBreakdown,
    penalty_sources: SourceBreakdown,
    extra_info: Option<String>,
    recording: Recording,
}

impl PreparedRoll {
    fn resolve(&self, rules: &RulesConfig, rng: &mut StdRng) -> RollMessage {
        let roll = roll_dice(self.pool, self.open, self.shade, rng);
        let successes = roll.successes();
        let tier = classify(self.tier_dice, self.tier_obstacle, &rules.routine_table);
        RollMessage {
            name: self.name.clone(),
            successes,
            difficulty: self.difficulty,
            obstacle_total: self.obstacle,
            success: i64::from(successes) >= i64::from(self.obstacle),
            rolls: roll.dice,
            tier,
            die_sources: self.die_sources.clone(),
            penalty_sources: self.penalty_sources.clone(),
            shade: self.shade,
            open: self.open,
            extra_info: self.extra_info.clone(),
            rolled_at: Utc::now(),
            rerolls: RerollOptions::default(),
        }
    }
}

/// Re-rolls the character could spend on a resolved test.
fn reroll_options(
    character: &Character,
    subject: &str,
    message: &RollMessage,
) -> RerollOptions {
    let roll = message.dice_roll();
    let call_ons = if can_call_on(&roll) {
        character
            .call_ons_for(subject)
            .into_iter()
            .map(|c| c.name.clone())
            .collect()
    } else {
        Vec::new()
    };
    RerollOptions {
        fate: character.fate > 0 && can_fate_reroll(&roll, message.open),
        call_ons,
    }
}

/// The die sources every test starts from. Zero entries other than the
/// exponent are left out.
fn base_die_sources(exponent: i32, base: &BaseRollData, tax: i32) -> SourceBreakdown {
    let mut sources = SourceBreakdown::new();
    sources.insert("Exponent", signed(exponent));
    for (label, value) in [
        ("Artha", base.artha_dice),
        ("Bonus", base.bonus_dice),
        ("Wound Penalty", -base.wound_dice),
        ("Tax", -tax),
    ] {
        if value != 0 {
            sources.insert(label, signed(value));
        }
    }
    sources.extend(&base.misc_dice.entries);
    sources
}

fn record(
    ledger: &mut Ledger<'_>,
    recording: &Recording,
    message: &mut RollMessage,
) -> MechResult<Option<TaxAssessment>> {
    let (tier, success) = (message.tier, message.success);
    match *recording {
        Recording::Stat(stat) => ledger.log_stat_test(stat, tier, success)?,
        Recording::Attribute(attribute) => ledger.log_attribute_test(attribute, tier, success)?,
        Recording::Skill(skill) => ledger.log_skill_test(skill, tier, success)?,
        Recording::Learning(skill) => ledger.log_learning_test(skill, tier, success)?,
        Recording::Circles(contact) => {
            if let Some(contact) = contact {
                ledger.build_relationship(contact)?;
            }
            ledger.log_attribute_test(AttributeName::Circles, tier, true)?;
        }
        Recording::Tax {
            stat,
            exponent,
            tax,
        } => {
            // Logged whatever the player answers about the tax.
            ledger.log_stat_test(stat, tier, success)?;
            let assessment = assess_tax(
                stat,
                exponent,
                tax,
                message.obstacle_total,
                message.successes,
            );
            if let Some(mut assessment) = assessment {
                let summary = assessment.summary();
                message.extra_info = Some(match message.extra_info.take() {
                    Some(info) => format!("{info} {summary}"),
                    None => summary,
                });
                ledger.settle_tax(&mut assessment)?;
                return Ok(Some(assessment));
            }
        }
    }
    Ok(None)
}
