//! Circles tests to find a contact.

use bw_core::{AttributeName, Character, NamedModifier, RelationshipId};

use super::{PreparedRoll, Recording, base_die_sources};
use crate::error::{MechError, MechResult};
use crate::extract::{RollInputs, clamp_count, clamp_input, extract_base_data};
use crate::message::signed;

/// Roll Circles, with checked reputations and enmities and an optional
/// named contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CirclesTest {
    /// Player inputs.
    pub inputs: RollInputs,
    /// Names of the circles bonuses that apply.
    pub bonuses: Vec<String>,
    /// Names of the circles maluses that apply.
    pub maluses: Vec<String>,
    /// A relationship being called on.
    pub contact: Option<RelationshipId>,
}

impl CirclesTest {
    /// Create a circles test.
    pub fn new(inputs: RollInputs) -> Self {
        Self {
            inputs,
            bonuses: Vec::new(),
            maluses: Vec::new(),
            contact: None,
        }
    }

    /// Check a circles bonus.
    pub fn bonus(mut self, name: impl Into<String>) -> Self {
        self.bonuses.push(name.into());
        self
    }

    /// Check a circles malus.
    pub fn malus(mut self, name: impl Into<String>) -> Self {
        self.maluses.push(name.into());
        self
    }

    /// Call on a relationship.
    pub fn contact(mut self, relationship: RelationshipId) -> Self {
        self.contact = Some(relationship);
        self
    }
}

fn pick<'c>(
    available: &'c [NamedModifier],
    wanted: &[String],
    kind: &str,
) -> MechResult<Vec<&'c NamedModifier>> {
    wanted
        .iter()
        .map(|name| {
            available
                .iter()
                .find(|m| m.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| MechError::InvalidRequest(format!("no circles {kind} named {name}")))
        })
        .collect()
}

pub(super) fn prepare(character: &Character, test: &CirclesTest) -> MechResult<PreparedRoll> {
    let ability = character.attribute(AttributeName::Circles)?;
    if let Some(contact) = test.contact {
        character.relationship(contact)?;
    }
    let bonuses = pick(&character.circles_bonus, &test.bonuses, "bonus")?;
    let maluses = pick(&character.circles_malus, &test.maluses, "malus")?;

    let name = AttributeName::Circles.to_string();
    let mut base = extract_base_data(
        &test.inputs,
        &character.condition,
        &character.roll_modifiers_for(&name),
    );
    let exponent = clamp_count(ability.exponent);

    let mut die_sources = base_die_sources(exponent, &base, 0);
    let mut bonus_dice = 0;
    for bonus in &bonuses {
        let amount = clamp_input(bonus.amount);
        bonus_dice = clamp_input(bonus_dice + amount);
        die_sources.insert(bonus.name.clone(), signed(amount));
    }
    let mut malus = 0;
    for m in &maluses {
        let amount = clamp_input(m.amount);
        malus = clamp_input(malus + amount);
        base.add_obstacle(&m.name, amount);
    }

    let tier_dice = exponent + base.bonus_dice + base.misc_dice.sum - base.wound_dice;
    let mut pool = tier_dice + base.artha_dice + bonus_dice;
    if test.contact.is_some() {
        pool += 1;
        die_sources.insert("Named Contact", signed(1));
    }

    Ok(PreparedRoll {
        name: format!("{name} Test"),
        subject: name.clone(),
        pool,
        tier_dice,
        tier_obstacle: base.difficulty + base.ob_penalty + malus,
        obstacle: base.obstacle_total,
        difficulty: base.difficulty,
        open: ability.open,
        shade: ability.shade,
        die_sources,
        penalty_sources: base.penalty_sources,
        extra_info: None,
        recording: Recording::Circles(test.contact),
    })
}
