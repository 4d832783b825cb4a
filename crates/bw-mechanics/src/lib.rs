//! Dice test resolution engine for Burning Wheel style rulesets.
//!
//! Turns a trait exponent plus situational modifiers into an open-ended d6
//! pool, counts successes against an obstacle, classifies the test as
//! routine, difficult or challenging, and logs it for advancement.
//!
//! A roll runs as a short pipeline: the [`TestRunner`] solicits inputs from
//! the character record, resolves the dice, asks the [`Prompt`] for any
//! player decision, and only then commits changes through the
//! [`CharacterStore`].

pub mod advancement;
pub mod config;
pub mod dice;
pub mod difficulty;
pub mod error;
pub mod extract;
pub mod message;
pub mod prompt;
pub mod roll;
pub mod store;

pub use advancement::{CountingRule, Requirements, TaxAssessment, TraitKind};
pub use config::{RoutineTable, RulesConfig, SpreadBand};
pub use dice::{DicePool, DiceRoll, DieResult, Reroll, RerollKind, roll_dice};
pub use difficulty::{DifficultyTier, classify};
pub use error::{MechError, MechResult};
pub use extract::{BaseRollData, RollInputs, extract_base_data};
pub use message::{AdvancementEvent, RerollOptions, RollMessage, RollReport, SourceBreakdown};
pub use prompt::{Answer, AutoPrompt, Prompt, ScriptedPrompt};
pub use roll::{
    AttributeTest, CirclesTest, LearningTest, RerollChoice, RollRequest, SkillTest, StatTest,
    TaxTest, TestRunner,
};
pub use store::{CharacterStore, TraitUpdate};
