//! Tax tests for sustaining effects on Will or Forte.

use bw_core::{Character, StatName};

use super::{PreparedRoll, Recording, base_die_sources};
use crate::error::{MechError, MechResult};
use crate::extract::{RollInputs, clamp_count, extract_base_data, parse_lenient};

/// Roll a tax test. The obstacle is the `difficulty` of the inputs.
///
/// The test is logged on the stat before the tax prompt, so declining the
/// tax still leaves the test in the stat's advancement record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTest {
    /// Stat paying the tax.
    pub stat: StatName,
    /// Effect being sustained.
    pub effect: String,
    /// Player inputs.
    pub inputs: RollInputs,
}

impl TaxTest {
    /// Tax test on Forte to sustain `effect` at `obstacle`.
    pub fn new(effect: impl Into<String>, obstacle: i32) -> Self {
        Self {
            stat: StatName::Forte,
            effect: effect.into(),
            inputs: RollInputs::new(obstacle),
        }
    }

    /// Pay the tax from another stat.
    pub fn with_stat(mut self, stat: StatName) -> Self {
        self.stat = stat;
        self
    }

    /// Replace the inputs.
    pub fn with_inputs(mut self, inputs: RollInputs) -> Self {
        self.inputs = inputs;
        self
    }
}

pub(super) fn prepare(character: &Character, test: &TaxTest) -> MechResult<PreparedRoll> {
    if !matches!(test.stat, StatName::Will | StatName::Forte) {
        return Err(MechError::InvalidRequest(format!(
            "{} cannot be taxed",
            test.stat
        )));
    }
    let effect = test.effect.trim();
    if effect.is_empty() && parse_lenient(&test.inputs.difficulty) == 0 {
        return Err(MechError::InvalidRequest(
            "a tax test needs an effect or an obstacle".to_string(),
        ));
    }

    let ability = character.stat(test.stat)?;
    let name = test.stat.to_string();
    let base = extract_base_data(
        &test.inputs,
        &character.condition,
        &character.roll_modifiers_for(&name),
    );
    let exponent = clamp_count(ability.exponent);
    let tax = clamp_count(ability.record.tax);

    let tier_dice = exponent + base.bonus_dice + base.misc_dice.sum - base.wound_dice - tax;
    Ok(PreparedRoll {
        name: format!("{name} Tax Test"),
        subject: name.clone(),
        pool: tier_dice + base.artha_dice,
        tier_dice,
        tier_obstacle: base.obstacle_total,
        obstacle: base.obstacle_total,
        difficulty: base.difficulty,
        open: ability.open,
        shade: ability.shade,
        die_sources: base_die_sources(exponent, &base, tax),
        penalty_sources: base.penalty_sources,
        extra_info: (!effect.is_empty()).then(|| format!("Attempting to sustain {effect}.")),
        recording: Recording::Tax {
            stat: test.stat,
            exponent: ability.exponent,
            tax: ability.record.tax,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bw_core::Ability;

    #[test]
    fn obstacle_alone_is_enough() {
        let c = Character::new("Tasha").with_stat(StatName::Will, Ability::new(5));
        let test = TaxTest::new("", 2).with_stat(StatName::Will);
        let prepared = prepare(&c, &test).unwrap();
        assert_eq!(prepared.obstacle, 2);
        assert_eq!(prepared.extra_info, None);
    }

    #[test]
    fn effect_alone_is_enough() {
        let c = Character::new("Tasha").with_stat(StatName::Forte, Ability::new(5));
        let prepared = prepare(&c, &TaxTest::new("Ward of Iron", 0)).unwrap();
        assert_eq!(
            prepared.extra_info.as_deref(),
            Some("Attempting to sustain Ward of Iron.")
        );
    }

    #[test]
    fn current_tax_reduces_pool_and_tier() {
        let mut forte = Ability::new(5);
        forte.record.tax = 2;
        let c = Character::new("Tasha").with_stat(StatName::Forte, forte);
        let prepared = prepare(&c, &TaxTest::new("Ward", 3)).unwrap();
        assert_eq!(prepared.pool, 3);
        assert_eq!(prepared.tier_dice, 3);
        assert_eq!(prepared.die_sources.get("Tax"), Some("-2"));
    }
}
