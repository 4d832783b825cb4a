use serde::{Deserialize, Serialize};

/// What a roll modifier adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierTarget {
    /// Adds or removes dice from the pool.
    Dice,
    /// Raises or lowers the obstacle.
    Obstacle,
}

/// A standing modifier on a character (gear, traits, conditions) that
/// applies to tests of particular traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollModifier {
    /// Label shown in the roll breakdown.
    pub label: String,
    /// Signed adjustment.
    pub amount: i32,
    /// Whether the adjustment applies to dice or to the obstacle.
    pub target: ModifierTarget,
    /// Optional modifiers only apply when the player selects them.
    #[serde(default)]
    pub optional: bool,
    /// Lowercase trait names this modifier applies to; `"all"` matches any.
    #[serde(default)]
    pub applies_to: Vec<String>,
}

impl RollModifier {
    /// Create an automatic dice modifier.
    pub fn dice(label: impl Into<String>, amount: i32) -> Self {
        Self {
            label: label.into(),
            amount,
            target: ModifierTarget::Dice,
            optional: false,
            applies_to: Vec::new(),
        }
    }

    /// Create an automatic obstacle modifier.
    pub fn obstacle(label: impl Into<String>, amount: i32) -> Self {
        Self {
            label: label.into(),
            amount,
            target: ModifierTarget::Obstacle,
            optional: false,
            applies_to: Vec::new(),
        }
    }

    /// Mark the modifier as player-selectable.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Restrict the modifier to a trait (case-insensitive).
    pub fn for_trait(mut self, name: &str) -> Self {
        self.applies_to.push(name.to_lowercase());
        self
    }

    /// Returns true if this modifier applies to tests of `name`.
    pub fn applies_to_trait(&self, name: &str) -> bool {
        matches_trait(&self.applies_to, name)
    }
}

fn matches_trait(applies_to: &[String], name: &str) -> bool {
    let lower = name.to_lowercase();
    applies_to.iter().any(|t| t == "all" || *t == lower)
}

/// A trait the player can call on to re-roll the failed dice of a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOn {
    /// Name of the calling trait, e.g. "Sword-Sworn".
    pub name: String,
    /// Lowercase trait names it can be called on for; `"all"` matches any.
    #[serde(default)]
    pub applies_to: Vec<String>,
}

impl CallOn {
    /// Create a call-on that applies to nothing yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            applies_to: Vec::new(),
        }
    }

    /// Allow calling on this trait for tests of `name` (case-insensitive).
    pub fn for_trait(mut self, name: &str) -> Self {
        self.applies_to.push(name.to_lowercase());
        self
    }

    /// Returns true if this can be called on for tests of `name`.
    pub fn applies_to_trait(&self, name: &str) -> bool {
        matches_trait(&self.applies_to, name)
    }
}

/// A checkable labelled bonus or malus, such as a circles modifier or a FoRK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedModifier {
    /// Label shown in the roll breakdown.
    pub name: String,
    /// Dice (or obstacle) added when checked.
    pub amount: i32,
}

impl NamedModifier {
    /// Create a named modifier.
    pub fn new(name: impl Into<String>, amount: i32) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}
