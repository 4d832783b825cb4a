//! Dice pools, rolling, and success counting.
//!
//! Every test rolls a pool of d6. Each die is a success when it meets the
//! shade's threshold (4+ for black). Open-ended pools re-roll sixes into
//! extra dice, which count like any other die. A finished roll can be
//! partly re-rolled with Fate or a call-on trait.

pub mod pool;
pub mod reroll;
pub mod roll;

pub use pool::{DicePool, roll_dice};
pub use reroll::{Reroll, RerollKind, call_on_reroll, can_call_on, can_fate_reroll, fate_reroll};
pub use roll::{DiceRoll, DieResult};

/// Number of sides on a test die.
pub const D6: u32 = 6;
