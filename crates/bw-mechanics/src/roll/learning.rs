//! Beginner's luck tests for skills still being learned.

use bw_core::{Character, SkillId};

use super::{PreparedRoll, Recording, base_die_sources};
use crate::advancement::beginners_luck_exponent;
use crate::config::RulesConfig;
use crate::error::{MechError, MechResult};
use crate::extract::{RollInputs, clamp_count, extract_base_data};

/// Roll beginner's luck for a skill the character is learning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningTest {
    /// Skill being learned.
    pub skill: SkillId,
    /// Player inputs.
    pub inputs: RollInputs,
}

impl LearningTest {
    /// Create a beginner's luck test.
    pub fn new(skill: SkillId, inputs: RollInputs) -> Self {
        Self { skill, inputs }
    }
}

pub(super) fn prepare(
    character: &Character,
    rules: &RulesConfig,
    test: &LearningTest,
) -> MechResult<PreparedRoll> {
    let skill = character.skill(test.skill)?;
    if !skill.learning {
        return Err(MechError::InvalidRequest(format!(
            "{} is already trained",
            skill.name
        )));
    }

    let mut base = extract_base_data(
        &test.inputs,
        &character.condition,
        &character.roll_modifiers_for(&skill.name),
    );
    let doubled = base.difficulty;
    base.add_obstacle("Beginner's Luck", doubled);

    let exponent = clamp_count(beginners_luck_exponent(skill, rules));
    let tier_dice = exponent + base.bonus_dice + base.misc_dice.sum - base.wound_dice;
    Ok(PreparedRoll {
        name: format!("{} Test", skill.name),
        subject: skill.name.clone(),
        pool: tier_dice + base.artha_dice,
        tier_dice,
        tier_obstacle: base.difficulty,
        obstacle: base.obstacle_total,
        difficulty: base.difficulty,
        open: skill.ability.open,
        shade: skill.ability.shade,
        die_sources: base_die_sources(exponent, &base, 0),
        penalty_sources: base.penalty_sources,
        extra_info: Some("Beginner's Luck".to_string()),
        recording: Recording::Learning(skill.id),
    })
}
