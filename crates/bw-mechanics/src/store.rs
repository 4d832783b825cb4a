//! The character store collaborator.
//!
//! The engine never mutates a character in place. It reads a copy through
//! [`CharacterStore::character`], computes the new state, and writes it back
//! through one of the update calls. Each update is accepted or rejected
//! wholesale.

use bw_core::{Ability, AdvancementRecord, Character, RelationshipId, SkillId, StatName, TraitRef};

use crate::error::{MechError, MechResult};

/// New state for a trait after logging or advancement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitUpdate {
    /// New exponent.
    pub exponent: u32,
    /// New advancement record.
    pub record: AdvancementRecord,
    /// For skills: set or clear the learning flag.
    pub learning: Option<bool>,
}

impl TraitUpdate {
    /// An update that writes back an ability's exponent and record.
    pub fn from_ability(ability: &Ability) -> Self {
        Self {
            exponent: ability.exponent,
            record: ability.record.clone(),
            learning: None,
        }
    }
}

/// Read and write access to the character document being rolled for.
pub trait CharacterStore {
    /// Current state of the character.
    fn character(&self) -> &Character;

    /// Replace a trait's exponent and advancement record.
    fn update_trait(&mut self, target: TraitRef, update: TraitUpdate) -> MechResult<()>;

    /// Set the tax carried by a stat.
    fn update_tax(&mut self, stat: StatName, tax: u32) -> MechResult<()>;

    /// Set the learning progress of a skill.
    fn update_learning_progress(&mut self, skill: SkillId, progress: u32) -> MechResult<()>;

    /// Set the building progress of a relationship.
    fn update_relationship_progress(
        &mut self,
        relationship: RelationshipId,
        progress: u32,
    ) -> MechResult<()>;

    /// Set the character's unspent Fate.
    fn update_fate(&mut self, fate: u32) -> MechResult<()>;
}

/// An in-memory character is its own store.
impl CharacterStore for Character {
    fn character(&self) -> &Character {
        self
    }

    fn update_trait(&mut self, target: TraitRef, update: TraitUpdate) -> MechResult<()> {
        if update.learning.is_some() && !matches!(target, TraitRef::Skill(_)) {
            return Err(MechError::UpdateRejected(format!(
                "{target} cannot change learning state"
            )));
        }
        if let (Some(learning), TraitRef::Skill(id)) = (update.learning, target) {
            self.skill_mut(id)?.learning = learning;
        }
        let ability = self.ability_mut(target)?;
        ability.exponent = update.exponent;
        ability.record = update.record;
        Ok(())
    }

    fn update_tax(&mut self, stat: StatName, tax: u32) -> MechResult<()> {
        self.ability_mut(TraitRef::Stat(stat))?.record.tax = tax;
        Ok(())
    }

    fn update_learning_progress(&mut self, skill: SkillId, progress: u32) -> MechResult<()> {
        self.skill_mut(skill)?.ability.record.learning_progress = progress;
        Ok(())
    }

    fn update_relationship_progress(
        &mut self,
        relationship: RelationshipId,
        progress: u32,
    ) -> MechResult<()> {
        self.relationship_mut(relationship)?.building_progress = progress;
        Ok(())
    }

    fn update_fate(&mut self, fate: u32) -> MechResult<()> {
        self.fate = fate;
        Ok(())
    }
}
