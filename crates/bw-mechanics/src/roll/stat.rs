//! Stat and attribute tests.

use bw_core::{Ability, AttributeName, Character, ModifierTarget, RollModifier, StatName};

use super::{PreparedRoll, Recording, base_die_sources};
use crate::error::{MechError, MechResult};
use crate::extract::{RollInputs, clamp_count, extract_base_data};

/// Roll a stat against an obstacle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatTest {
    /// Stat to roll.
    pub stat: StatName,
    /// Player inputs.
    pub inputs: RollInputs,
}

impl StatTest {
    /// Create a stat test.
    pub fn new(stat: StatName, inputs: RollInputs) -> Self {
        Self { stat, inputs }
    }
}

/// Roll an attribute (Health, Steel, Resources, ...) against an obstacle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTest {
    /// Attribute to roll.
    pub attribute: AttributeName,
    /// Player inputs.
    pub inputs: RollInputs,
}

impl AttributeTest {
    /// Create an attribute test.
    pub fn new(attribute: AttributeName, inputs: RollInputs) -> Self {
        Self { attribute, inputs }
    }
}

pub(super) fn prepare_stat(character: &Character, test: &StatTest) -> MechResult<PreparedRoll> {
    let ability = character.stat(test.stat)?;
    Ok(prepare_plain(
        character,
        &test.stat.to_string(),
        ability,
        ability.record.tax,
        &test.inputs,
        Recording::Stat(test.stat),
    ))
}

pub(super) fn prepare_attribute(
    character: &Character,
    test: &AttributeTest,
) -> MechResult<PreparedRoll> {
    if test.attribute == AttributeName::Circles {
        return Err(MechError::InvalidRequest(
            "Circles is rolled with a circles test".to_string(),
        ));
    }
    let ability = character.attribute(test.attribute)?;
    Ok(prepare_plain(
        character,
        &test.attribute.to_string(),
        ability,
        0,
        &test.inputs,
        Recording::Attribute(test.attribute),
    ))
}

/// Stats and attributes ignore obstacle modifiers: only the difficulty and
/// the wound penalty stand against them.
fn prepare_plain(
    character: &Character,
    name: &str,
    ability: &Ability,
    tax: u32,
    inputs: &RollInputs,
    recording: Recording,
) -> PreparedRoll {
    let modifiers: Vec<&RollModifier> = character
        .roll_modifiers_for(name)
        .into_iter()
        .filter(|m| m.target == ModifierTarget::Dice)
        .collect();
    let base = extract_base_data(inputs, &character.condition, &modifiers);
    let exponent = clamp_count(ability.exponent);
    let tax = clamp_count(tax);

    let tier_dice = exponent + base.bonus_dice + base.misc_dice.sum - base.wound_dice - tax;
    let obstacle = base.difficulty + base.ob_penalty;
    PreparedRoll {
        name: format!("{name} Test"),
        subject: name.to_string(),
        pool: tier_dice + base.artha_dice,
        tier_dice,
        tier_obstacle: base.difficulty,
        obstacle,
        difficulty: obstacle,
        open: ability.open,
        shade: ability.shade,
        die_sources: base_die_sources(exponent, &base, tax),
        penalty_sources: base.penalty_sources,
        extra_info: None,
        recording,
    }
}
