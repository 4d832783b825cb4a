//! Core types for the Burning Wheel test engine: characters, traits, and
//! advancement bookkeeping.
//!
//! This crate is the data model the mechanics engine reads and writes back.
//! It knows nothing about dice; you can construct a [`Character`]
//! programmatically or deserialize one from JSON.

/// Testable traits (stats, attributes, skills) and their advancement records.
pub mod ability;
/// The character record: stats, attributes, skills, relationships, condition.
pub mod character;
/// Error types used throughout the crate.
pub mod error;
/// Roll modifiers attached to a character.
pub mod modifier;
/// Shades shift the success threshold of a trait's dice.
pub mod shade;

/// Re-export trait types.
pub use ability::{Ability, AdvancementRecord, TestBucket, TierTally};
/// Re-export character types.
pub use character::{
    AttributeName, Character, PhysicalCondition, Relationship, RelationshipId, Skill, SkillId,
    StatName, TraitRef,
};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export modifier types.
pub use modifier::{CallOn, ModifierTarget, NamedModifier, RollModifier};
/// Re-export the shade enum.
pub use shade::Shade;
