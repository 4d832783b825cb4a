use std::path::Path;

use bw_core::{
    Ability, AttributeName, CallOn, Character, NamedModifier, Relationship, RollModifier, Shade,
    Skill, StatName,
};

use crate::store;

/// A starting character with one of everything the roller knows about.
fn sample(name: &str) -> Character {
    let mut c = Character::new(name)
        .with_stat(StatName::Will, Ability::new(4))
        .with_stat(StatName::Perception, Ability::new(4))
        .with_stat(StatName::Power, Ability::new(4))
        .with_stat(StatName::Forte, Ability::new(5))
        .with_stat(StatName::Agility, Ability::new(4))
        .with_stat(StatName::Speed, Ability::new(3))
        .with_attribute(AttributeName::Health, Ability::new(5))
        .with_attribute(AttributeName::Steel, Ability::new(6).open_ended())
        .with_attribute(AttributeName::Circles, Ability::new(3))
        .with_attribute(AttributeName::Resources, Ability::new(2));

    c.add_skill(Skill::new("Sword", StatName::Agility, 4));
    c.add_skill(Skill::new("Brawling", StatName::Power, 3));
    c.add_skill(Skill::new("Observation", StatName::Perception, 3).with_second_root(StatName::Will));
    c.add_skill(Skill::learning("Climbing", StatName::Agility, 4));

    let mut faith = Skill::new("Faith", StatName::Will, 3);
    faith.ability = Ability::new(3).with_shade(Shade::Grey).open_ended();
    c.add_skill(faith);

    c.add_relationship(Relationship::new("Brother Anselm"));
    c.add_relationship(Relationship::new("Old Mara").building());
    c.circles_bonus.push(NamedModifier::new("Guild Member", 1));
    c.circles_malus.push(NamedModifier::new("Enmity: City Watch", 1));
    c.roll_modifiers
        .push(RollModifier::dice("Shield", 1).for_trait("Sword").optional());
    c.roll_modifiers.push(RollModifier::obstacle("Darkness", 1).for_trait("all").optional());
    c.call_ons.push(CallOn::new("Sword-Sworn").for_trait("Sword"));
    c.fate = 1;
    c
}

pub fn run(file: &Path, name: &str, force: bool) -> Result<(), String> {
    if file.exists() && !force {
        return Err(format!(
            "'{}' already exists (use --force to overwrite)",
            file.display()
        ));
    }

    store::save(file, &sample(name)).map_err(|e| format!("cannot write character: {e}"))?;

    println!("Created character '{name}' in {}", file.display());
    println!();
    println!("Get started:");
    println!("  bw show {}", file.display());
    println!("  bw roll {} stat will --ob 3", file.display());
    println!("  bw roll {} skill sword --ob 2 --fork brawling", file.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_character_round_trips() {
        let c = sample("Tasha");
        let json = c.to_json_pretty().unwrap();
        assert_eq!(Character::from_json(&json).unwrap(), c);
        assert!(c.find_skill("climbing").unwrap().learning);
        assert_eq!(c.call_ons_for("sword").len(), 1);
    }
}
