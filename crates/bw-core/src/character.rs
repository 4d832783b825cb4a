use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ability::Ability;
use crate::error::{CoreError, CoreResult};
use crate::modifier::{CallOn, NamedModifier, RollModifier};

/// The six stats every character has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatName {
    /// Mental stat; carries Will tax.
    Will,
    /// Mental stat.
    Perception,
    /// Physical stat.
    Power,
    /// Physical stat; carries Forte tax from sustained spells.
    Forte,
    /// Physical stat.
    Agility,
    /// Physical stat.
    Speed,
}

impl StatName {
    /// Every stat, in sheet order.
    pub const ALL: [StatName; 6] = [
        Self::Will,
        Self::Perception,
        Self::Power,
        Self::Forte,
        Self::Agility,
        Self::Speed,
    ];
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Will => write!(f, "Will"),
            Self::Perception => write!(f, "Perception"),
            Self::Power => write!(f, "Power"),
            Self::Forte => write!(f, "Forte"),
            Self::Agility => write!(f, "Agility"),
            Self::Speed => write!(f, "Speed"),
        }
    }
}

impl FromStr for StatName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|stat| stat.to_string().to_lowercase() == lower)
            .ok_or(CoreError::Unknown {
                kind: "stat",
                value: s.to_string(),
            })
    }
}

/// Rollable attributes derived from stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeName {
    /// Resisting injury and sickness.
    Health,
    /// Keeping one's nerve.
    Steel,
    /// Finding people through social connections.
    Circles,
    /// Paying for things; failed tests do not count toward advancement.
    Resources,
}

impl AttributeName {
    /// Every attribute, in sheet order.
    pub const ALL: [AttributeName; 4] = [Self::Health, Self::Steel, Self::Circles, Self::Resources];
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Health => write!(f, "Health"),
            Self::Steel => write!(f, "Steel"),
            Self::Circles => write!(f, "Circles"),
            Self::Resources => write!(f, "Resources"),
        }
    }
}

impl FromStr for AttributeName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|attr| attr.to_string().to_lowercase() == lower)
            .ok_or(CoreError::Unknown {
                kind: "attribute",
                value: s.to_string(),
            })
    }
}

/// Unique identifier for a skill on a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillId(pub Uuid);

impl SkillId {
    /// Generates a new random skill identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SkillId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Unique identifier for a relationship on a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipId(pub Uuid);

impl RelationshipId {
    /// Generates a new random relationship identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RelationshipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// A trained or learning skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Unique identifier.
    pub id: SkillId,
    /// Display name.
    pub name: String,
    /// Exponent, shade and advancement record.
    pub ability: Ability,
    /// The stat this skill is rooted in.
    pub root: StatName,
    /// A second root stat, if the skill averages two.
    #[serde(default)]
    pub second_root: Option<StatName>,
    /// Tests needed to learn the skill from scratch.
    #[serde(default)]
    pub aptitude: Option<u32>,
    /// True while the skill is still being learned via beginner's luck.
    #[serde(default)]
    pub learning: bool,
}

impl Skill {
    /// Create an open skill with the given exponent.
    pub fn new(name: impl Into<String>, root: StatName, exponent: u32) -> Self {
        Self {
            id: SkillId::new(),
            name: name.into(),
            ability: Ability::new(exponent),
            root,
            second_root: None,
            aptitude: None,
            learning: false,
        }
    }

    /// Create a skill the character is still learning.
    pub fn learning(name: impl Into<String>, root: StatName, aptitude: u32) -> Self {
        Self {
            aptitude: Some(aptitude),
            learning: true,
            ..Self::new(name, root, 0)
        }
    }

    /// Add a second root stat.
    pub fn with_second_root(mut self, root: StatName) -> Self {
        self.second_root = Some(root);
        self
    }

    /// All root stats of the skill.
    pub fn roots(&self) -> Vec<StatName> {
        std::iter::once(self.root).chain(self.second_root).collect()
    }
}

/// A relationship with a named NPC, usable as a circles contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique identifier.
    pub id: RelationshipId,
    /// Who the relationship is with.
    pub name: String,
    /// True while the relationship is still being built up.
    #[serde(default)]
    pub building: bool,
    /// Progress towards establishing the relationship.
    #[serde(default)]
    pub building_progress: u32,
}

impl Relationship {
    /// Create an established relationship.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RelationshipId::new(),
            name: name.into(),
            building: false,
            building_progress: 0,
        }
    }

    /// Mark the relationship as still being built.
    pub fn building(mut self) -> Self {
        self.building = true;
        self
    }
}

/// Penalties from wounds, tiredness and sickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhysicalCondition {
    /// Dice subtracted from every pool.
    #[serde(default)]
    pub wound_dice: u32,
    /// Added to every obstacle.
    #[serde(default)]
    pub ob_penalty: u32,
}

/// Reference to a single testable trait of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum TraitRef {
    /// A stat.
    Stat(StatName),
    /// An attribute.
    Attribute(AttributeName),
    /// A skill by ID.
    Skill(SkillId),
}

impl fmt::Display for TraitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stat(s) => write!(f, "stat {s}"),
            Self::Attribute(a) => write!(f, "attribute {a}"),
            Self::Skill(id) => write!(f, "skill {id}"),
        }
    }
}

/// A character record as stored in a character document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Character {
    /// Character name.
    pub name: String,
    /// Stats by name.
    #[serde(default)]
    pub stats: BTreeMap<StatName, Ability>,
    /// Attributes by name.
    #[serde(default)]
    pub attributes: BTreeMap<AttributeName, Ability>,
    /// Skills, trained and learning.
    #[serde(default)]
    pub skills: Vec<Skill>,
    /// Relationships usable as circles contacts.
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    /// Current wound / tiredness penalties.
    #[serde(default)]
    pub condition: PhysicalCondition,
    /// Standing roll modifiers.
    #[serde(default)]
    pub roll_modifiers: Vec<RollModifier>,
    /// Checkable circles bonuses (reputations, affiliations).
    #[serde(default)]
    pub circles_bonus: Vec<NamedModifier>,
    /// Checkable circles maluses (enmity clauses, infamy).
    #[serde(default)]
    pub circles_malus: Vec<NamedModifier>,
    /// Unspent Fate points.
    #[serde(default)]
    pub fate: u32,
    /// Traits that can be called on to re-roll failed dice.
    #[serde(default)]
    pub call_ons: Vec<CallOn>,
}

impl Character {
    /// Create a character with no traits.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set a stat.
    pub fn with_stat(mut self, stat: StatName, ability: Ability) -> Self {
        self.stats.insert(stat, ability);
        self
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, attr: AttributeName, ability: Ability) -> Self {
        self.attributes.insert(attr, ability);
        self
    }

    /// Add a skill and return its ID.
    pub fn add_skill(&mut self, skill: Skill) -> SkillId {
        let id = skill.id;
        self.skills.push(skill);
        id
    }

    /// Add a relationship and return its ID.
    pub fn add_relationship(&mut self, relationship: Relationship) -> RelationshipId {
        let id = relationship.id;
        self.relationships.push(relationship);
        id
    }

    /// Look up a stat.
    pub fn stat(&self, stat: StatName) -> CoreResult<&Ability> {
        self.stats.get(&stat).ok_or(CoreError::StatNotFound(stat))
    }

    /// Look up an attribute.
    pub fn attribute(&self, attr: AttributeName) -> CoreResult<&Ability> {
        self.attributes
            .get(&attr)
            .ok_or(CoreError::AttributeNotFound(attr))
    }

    /// Look up a skill by ID.
    pub fn skill(&self, id: SkillId) -> CoreResult<&Skill> {
        self.skills
            .iter()
            .find(|s| s.id == id)
            .ok_or(CoreError::SkillNotFound(id))
    }

    /// Mutable lookup of a skill by ID.
    pub fn skill_mut(&mut self, id: SkillId) -> CoreResult<&mut Skill> {
        self.skills
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CoreError::SkillNotFound(id))
    }

    /// Find a skill by name (case-insensitive).
    pub fn find_skill(&self, name: &str) -> CoreResult<&Skill> {
        let lower = name.to_lowercase();
        self.skills
            .iter()
            .find(|s| s.name.to_lowercase() == lower)
            .ok_or_else(|| CoreError::SkillNameNotFound(name.to_string()))
    }

    /// Look up a relationship by ID.
    pub fn relationship(&self, id: RelationshipId) -> CoreResult<&Relationship> {
        self.relationships
            .iter()
            .find(|r| r.id == id)
            .ok_or(CoreError::RelationshipNotFound(id))
    }

    /// Mutable lookup of a relationship by ID.
    pub fn relationship_mut(&mut self, id: RelationshipId) -> CoreResult<&mut Relationship> {
        self.relationships
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(CoreError::RelationshipNotFound(id))
    }

    /// The ability behind any trait reference.
    pub fn ability(&self, target: TraitRef) -> CoreResult<&Ability> {
        match target {
            TraitRef::Stat(s) => self.stat(s),
            TraitRef::Attribute(a) => self.attribute(a),
            TraitRef::Skill(id) => self.skill(id).map(|s| &s.ability),
        }
    }

    /// Mutable access to the ability behind any trait reference.
    pub fn ability_mut(&mut self, target: TraitRef) -> CoreResult<&mut Ability> {
        match target {
            TraitRef::Stat(s) => self.stats.get_mut(&s).ok_or(CoreError::StatNotFound(s)),
            TraitRef::Attribute(a) => self
                .attributes
                .get_mut(&a)
                .ok_or(CoreError::AttributeNotFound(a)),
            TraitRef::Skill(id) => self.skill_mut(id).map(|s| &mut s.ability),
        }
    }

    /// Display name of a trait.
    pub fn trait_name(&self, target: TraitRef) -> CoreResult<String> {
        match target {
            TraitRef::Stat(s) => Ok(s.to_string()),
            TraitRef::Attribute(a) => Ok(a.to_string()),
            TraitRef::Skill(id) => self.skill(id).map(|s| s.name.clone()),
        }
    }

    /// Standing modifiers that apply to tests of the named trait.
    pub fn roll_modifiers_for(&self, name: &str) -> Vec<&RollModifier> {
        self.roll_modifiers
            .iter()
            .filter(|m| m.applies_to_trait(name))
            .collect()
    }

    /// Call-on traits usable on a test of the named trait.
    pub fn call_ons_for(&self, name: &str) -> Vec<&CallOn> {
        self.call_ons
            .iter()
            .filter(|c| c.applies_to_trait(name))
            .collect()
    }

    /// Skills that can be FoRKed into a test of `skill`: every other skill
    /// the character has already learned, for one die each.
    pub fn fork_options(&self, skill: SkillId) -> Vec<NamedModifier> {
        self.skills
            .iter()
            .filter(|s| s.id != skill && !s.learning)
            .map(|s| NamedModifier::new(s.name.clone(), 1))
            .collect()
    }

    /// Parse a character document.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a pretty-printed character document.
    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Character, SkillId, SkillId) {
        let mut c = Character::new("Tasha")
            .with_stat(StatName::Will, Ability::new(4))
            .with_stat(StatName::Agility, Ability::new(3))
            .with_attribute(AttributeName::Circles, Ability::new(2));
        let sword = c.add_skill(Skill::new("Sword", StatName::Agility, 4));
        let dagger = c.add_skill(Skill::new("Dagger", StatName::Agility, 3));
        c.add_skill(Skill::learning("Climbing", StatName::Agility, 4));
        (c, sword, dagger)
    }

    #[test]
    fn stat_from_str() {
        assert_eq!("will".parse::<StatName>().unwrap(), StatName::Will);
        assert_eq!(" FORTE ".parse::<StatName>().unwrap(), StatName::Forte);
        assert!("luck".parse::<StatName>().is_err());
        assert_eq!(
            "resources".parse::<AttributeName>().unwrap(),
            AttributeName::Resources
        );
    }

    #[test]
    fn lookups_by_reference() {
        let (c, sword, _) = sample();
        assert_eq!(c.ability(TraitRef::Stat(StatName::Will)).unwrap().exponent, 4);
        assert_eq!(c.ability(TraitRef::Skill(sword)).unwrap().exponent, 4);
        assert_eq!(c.trait_name(TraitRef::Skill(sword)).unwrap(), "Sword");
        assert!(matches!(
            c.ability(TraitRef::Stat(StatName::Speed)),
            Err(CoreError::StatNotFound(StatName::Speed))
        ));
        assert!(matches!(
            c.ability(TraitRef::Attribute(AttributeName::Steel)),
            Err(CoreError::AttributeNotFound(_))
        ));
    }

    #[test]
    fn find_skill_is_case_insensitive() {
        let (c, _, dagger) = sample();
        assert_eq!(c.find_skill("dagger").unwrap().id, dagger);
        assert!(c.find_skill("Bow").is_err());
    }

    #[test]
    fn fork_options_exclude_self_and_learning() {
        let (c, sword, _) = sample();
        let forks = c.fork_options(sword);
        assert_eq!(forks, vec![NamedModifier::new("Dagger", 1)]);
    }

    #[test]
    fn roots_include_second() {
        let skill = Skill::new("Etiquette", StatName::Will, 3).with_second_root(StatName::Perception);
        assert_eq!(skill.roots(), vec![StatName::Will, StatName::Perception]);
        let single = Skill::new("Sword", StatName::Agility, 3);
        assert_eq!(single.roots(), vec![StatName::Agility]);
    }

    #[test]
    fn json_round_trip_preserves_record() {
        let (mut c, sword, _) = sample();
        c.ability_mut(TraitRef::Skill(sword))
            .unwrap()
            .record
            .difficult
            .passed = 2;
        let json = c.to_json_pretty().unwrap();
        let back = Character::from_json(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn trait_ref_display() {
        insta::assert_snapshot!(TraitRef::Stat(StatName::Forte).to_string(), @"stat Forte");
    }

    #[test]
    fn minimal_document_parses() {
        let c = Character::from_json(r#"{"name": "Blank"}"#).unwrap();
        assert_eq!(c.name, "Blank");
        assert!(c.stats.is_empty());
        assert_eq!(c.condition, PhysicalCondition::default());
        assert_eq!(c.fate, 0);
        assert!(c.call_ons.is_empty());
    }

    #[test]
    fn call_ons_filtered_by_trait() {
        let mut c = Character::new("Tasha");
        c.call_ons.push(CallOn::new("Sword-Sworn").for_trait("sword"));
        c.call_ons.push(CallOn::new("Lucky").for_trait("all"));
        let names: Vec<&str> = c.call_ons_for("Sword").iter().map(|x| x.name.as_str()).collect();
        assert_eq!(names, ["Sword-Sworn", "Lucky"]);
        assert_eq!(c.call_ons_for("Will").len(), 1);
    }
}
