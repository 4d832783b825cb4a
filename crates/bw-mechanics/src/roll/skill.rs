//! Skill tests with FoRKs.

use bw_core::{Character, SkillId};

use super::{PreparedRoll, Recording, base_die_sources};
use crate::error::{MechError, MechResult};
use crate::extract::{RollInputs, clamp_count, clamp_input, extract_base_data};
use crate::message::signed;

/// Roll a trained skill, optionally FoRKing in other skills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTest {
    /// Skill to roll.
    pub skill: SkillId,
    /// Player inputs.
    pub inputs: RollInputs,
    /// Names of the skills FoRKed in.
    pub forks: Vec<String>,
}

impl SkillTest {
    /// Create a skill test with no FoRKs.
    pub fn new(skill: SkillId, inputs: RollInputs) -> Self {
        Self {
            skill,
            inputs,
            forks: Vec::new(),
        }
    }

    /// FoRK in another skill by name.
    pub fn fork(mut self, name: impl Into<String>) -> Self {
        self.forks.push(name.into());
        self
    }
}

pub(super) fn prepare(character: &Character, test: &SkillTest) -> MechResult<PreparedRoll> {
    let skill = character.skill(test.skill)?;
    if skill.learning {
        return Err(MechError::InvalidRequest(format!(
            "{} is still being learned; roll beginner's luck",
            skill.name
        )));
    }

    let options = character.fork_options(skill.id);
    let mut forks = Vec::with_capacity(test.forks.len());
    for wanted in &test.forks {
        let fork = options
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                MechError::InvalidRequest(format!("{wanted} cannot be FoRKed into {}", skill.name))
            })?;
        forks.push(fork);
    }

    let base = extract_base_data(
        &test.inputs,
        &character.condition,
        &character.roll_modifiers_for(&skill.name),
    );
    let exponent = clamp_count(skill.ability.exponent);
    let fork_dice = forks
        .iter()
        .fold(0, |sum, f| clamp_input(sum + clamp_input(f.amount)));

    let mut die_sources = base_die_sources(exponent, &base, 0);
    for fork in &forks {
        die_sources.insert(format!("FoRK: {}", fork.name), signed(fork.amount));
    }

    let tier_dice = exponent + base.bonus_dice + fork_dice + base.misc_dice.sum - base.wound_dice;
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
        die_sources,
        penalty_sources: base.penalty_sources,
        extra_info: None,
        recording: Recording::Skill(skill.id),
    })
}
