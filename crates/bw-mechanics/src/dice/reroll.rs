//! Re-rolling part of a finished roll with Fate or a call-on trait.
//!
//! Spending Fate on a closed roll makes its sixes explode. On a roll that is
//! already open-ended it re-rolls a single failed die instead. Calling on a
//! trait re-rolls every failed die. Re-rolled dice replace the originals in
//! place, and successes never go down.

use std::fmt;

use bw_core::Shade;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::D6;
use super::pool::DicePool;
use super::roll::{DiceRoll, DieResult};

/// What paid for a re-roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerollKind {
    /// A spent Fate point.
    Fate,
    /// A call-on trait.
    CallOn,
}

impl fmt::Display for RerollKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fate => write!(f, "Fate"),
            Self::CallOn => write!(f, "Call-on"),
        }
    }
}

/// A roll after re-rolling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reroll {
    /// What paid for the re-roll.
    pub kind: RerollKind,
    /// The roll with re-rolled dice in place.
    pub roll: DiceRoll,
    /// Dice drawn fresh, explosions included.
    pub new_dice: usize,
    /// Successes after the re-roll.
    pub successes: u32,
    /// Whether the successes now meet the obstacle.
    pub success: bool,
}

/// Whether spending Fate would change anything: a six to explode on a
/// closed roll, or a failed die on an open one.
pub fn can_fate_reroll(roll: &DiceRoll, open: bool) -> bool {
    if open {
        roll.failures() > 0
    } else {
        roll.dice.iter().any(|d| d.face == D6)
    }
}

/// Whether a call-on has any failed dice to re-roll.
pub fn can_call_on(roll: &DiceRoll) -> bool {
    roll.failures() > 0
}

/// Re-roll with Fate. Returns `None` when there is nothing to re-roll.
pub fn fate_reroll(
    roll: &DiceRoll,
    open: bool,
    shade: Shade,
    obstacle: i32,
    rng: &mut StdRng,
) -> Option<Reroll> {
    if !can_fate_reroll(roll, open) {
        return None;
    }
    let mut dice = Vec::with_capacity(roll.count() + 1);
    let mut new_dice = 0;
    let mut replaced = false;
    for die in &roll.dice {
        if open {
            if !replaced && !die.success {
                replaced = true;
                let chain = redraw(true, shade, die.exploded, rng);
                new_dice += chain.len();
                dice.extend(chain);
            } else {
                dice.push(*die);
            }
        } else {
            dice.push(*die);
            if die.face == D6 {
                let chain = redraw(true, shade, true, rng);
                new_dice += chain.len();
                dice.extend(chain);
            }
        }
    }
    Some(finish(RerollKind::Fate, dice, new_dice, obstacle))
}

/// Re-roll every failed die for a call-on. Returns `None` when no die failed.
pub fn call_on_reroll(
    roll: &DiceRoll,
    open: bool,
    shade: Shade,
    obstacle: i32,
    rng: &mut StdRng,
) -> Option<Reroll> {
    if !can_call_on(roll) {
        return None;
    }
    let mut dice = Vec::with_capacity(roll.count());
    let mut new_dice = 0;
    for die in &roll.dice {
        if die.success {
            dice.push(*die);
        } else {
            let chain = redraw(open, shade, die.exploded, rng);
            new_dice += chain.len();
            dice.extend(chain);
        }
    }
    Some(finish(RerollKind::CallOn, dice, new_dice, obstacle))
}

/// Roll one die, plus its explosions when `open`. The first die inherits
/// `exploded` from the die it replaces.
fn redraw(open: bool, shade: Shade, exploded: bool, rng: &mut StdRng) -> Vec<DieResult> {
    let mut chain = DicePool::new(1).open(open).shade(shade).roll(rng).dice;
    if let Some(first) = chain.first_mut() {
        first.exploded = exploded;
    }
    chain
}

fn finish(kind: RerollKind, dice: Vec<DieResult>, new_dice: usize, obstacle: i32) -> Reroll {
    let roll = DiceRoll { dice };
    let successes = roll.successes();
    Reroll {
        kind,
        success: i64::from(successes) >= i64::from(obstacle),
        roll,
        new_dice,
        successes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn fate_explodes_sixes_on_a_closed_roll() {
        let roll = DiceRoll::from_faces(&[6, 2, 3], false, Shade::Black);
        let reroll = fate_reroll(&roll, false, Shade::Black, 2, &mut rng()).unwrap();
        assert_eq!(reroll.kind, RerollKind::Fate);
        assert!(reroll.new_dice >= 1);
        assert_eq!(reroll.roll.count(), 3 + reroll.new_dice);
        assert_eq!(reroll.roll.dice[0], roll.dice[0]);
        assert!(reroll.roll.dice[1].exploded);
        let tail = &reroll.roll.dice[reroll.roll.count() - 2..];
        assert_eq!(tail, &roll.dice[1..]);
    }

    #[test]
    fn fate_needs_a_six_on_a_closed_roll() {
        let roll = DiceRoll::from_faces(&[1, 2, 5], false, Shade::Black);
        assert!(!can_fate_reroll(&roll, false));
        assert_eq!(fate_reroll(&roll, false, Shade::Black, 2, &mut rng()), None);
    }

    #[test]
    fn fate_rerolls_one_failed_die_on_an_open_roll() {
        let roll = DiceRoll::from_faces(&[5, 1, 2], true, Shade::Black);
        let reroll = fate_reroll(&roll, true, Shade::Black, 2, &mut rng()).unwrap();
        assert_eq!(reroll.roll.dice[0], roll.dice[0]);
        assert_eq!(reroll.roll.dice.last(), roll.dice.last());
        assert_eq!(reroll.roll.count(), 2 + reroll.new_dice);
    }

    #[test]
    fn fate_on_open_roll_needs_a_failure() {
        let roll = DiceRoll::from_faces(&[4, 5], true, Shade::Black);
        assert!(!can_fate_reroll(&roll, true));
        assert_eq!(fate_reroll(&roll, true, Shade::Black, 2, &mut rng()), None);
    }

    #[test]
    fn call_on_rerolls_every_failure() {
        let roll = DiceRoll::from_faces(&[5, 1, 2], false, Shade::Black);
        let reroll = call_on_reroll(&roll, false, Shade::Black, 3, &mut rng()).unwrap();
        assert_eq!(reroll.kind, RerollKind::CallOn);
        assert_eq!(reroll.new_dice, 2);
        assert_eq!(reroll.roll.count(), 3);
        assert_eq!(reroll.roll.dice[0], roll.dice[0]);
        assert_eq!(reroll.success, reroll.successes >= 3);
    }

    #[test]
    fn call_on_needs_a_failure() {
        let roll = DiceRoll::from_faces(&[4, 6], false, Shade::Black);
        assert!(!can_call_on(&roll));
        assert_eq!(call_on_reroll(&roll, false, Shade::Black, 1, &mut rng()), None);
    }

    #[test]
    fn grey_shade_counts_threes_on_rerolled_dice() {
        let roll = DiceRoll::from_faces(&[1, 1, 1, 1, 1, 1], false, Shade::Grey);
        let reroll = call_on_reroll(&roll, false, Shade::Grey, 1, &mut rng()).unwrap();
        for die in &reroll.roll.dice {
            assert_eq!(die.success, die.face >= 3);
        }
    }

    proptest! {
        #[test]
        fn rerolls_never_lose_successes(
            faces in prop::collection::vec(1u32..=6, 0..12),
            open in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let roll = DiceRoll::from_faces(&faces, open, Shade::Black);
            let mut rng = StdRng::seed_from_u64(seed);
            for reroll in [
                fate_reroll(&roll, open, Shade::Black, 3, &mut rng),
                call_on_reroll(&roll, open, Shade::Black, 3, &mut rng),
            ]
            .into_iter()
            .flatten()
            {
                prop_assert!(reroll.successes >= roll.successes());
                prop_assert_eq!(reroll.successes, reroll.roll.successes());
                prop_assert_eq!(reroll.success, reroll.successes >= 3);
            }
        }
    }
}
