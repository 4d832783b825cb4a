//! Dice pool construction and rolling.

use bw_core::Shade;
use rand::Rng;
use rand::rngs::StdRng;

use super::D6;
use super::roll::{DiceRoll, DieResult};

/// A pool of d6 to be rolled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DicePool {
    /// Dice in the pool before any explosions.
    pub size: u32,
    /// Whether sixes explode.
    pub open: bool,
    /// Shade of the dice.
    pub shade: Shade,
}

impl DicePool {
    /// Create a closed black pool. Negative sizes clamp to zero.
    pub fn new(size: i32) -> Self {
        Self {
            size: size.max(0) as u32,
            open: false,
            shade: Shade::Black,
        }
    }

    /// Set whether the pool is open-ended.
    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Set the shade of the pool.
    pub fn shade(mut self, shade: Shade) -> Self {
        self.shade = shade;
        self
    }

    /// Returns true if the pool has no dice.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Roll all dice in the pool using the given RNG.
    pub fn roll(&self, rng: &mut StdRng) -> DiceRoll {
        let threshold = self.shade.success_threshold();
        let mut dice = Vec::with_capacity(self.size as usize);
        for _ in 0..self.size {
            let mut exploded = false;
            loop {
                let face = rng.random_range(1..=D6);
                dice.push(DieResult {
                    face,
                    success: face >= threshold,
                    exploded,
                });
                if !(self.open && face == D6) {
                    break;
                }
                exploded = true;
            }
        }
        DiceRoll { dice }
    }
}

/// Roll `pool` dice of the given shade. A zero or negative pool yields an
/// empty roll with no successes.
pub fn roll_dice(pool: i32, open: bool, shade: Shade, rng: &mut StdRng) -> DiceRoll {
    let roll = DicePool::new(pool).open(open).shade(shade).roll(rng);
    tracing::debug!(
        pool,
        open,
        %shade,
        dice = roll.count(),
        successes = roll.successes(),
        "rolled dice pool"
    );
    roll
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn negative_pool_clamps_to_zero() {
        let pool = DicePool::new(-3);
        assert_eq!(pool.size, 0);
        assert!(pool.is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        let roll = roll_dice(-3, true, Shade::Black, &mut rng);
        assert_eq!(roll.count(), 0);
        assert_eq!(roll.successes(), 0);
    }

    #[test]
    fn roll_produces_valid_faces() {
        let mut rng = StdRng::seed_from_u64(42);
        let roll = DicePool::new(20).roll(&mut rng);
        assert_eq!(roll.count(), 20);
        for die in &roll.dice {
            assert!((1..=6).contains(&die.face));
            assert_eq!(die.success, die.face >= 4);
        }
    }

    #[test]
    fn roll_deterministic_with_seed() {
        let pool = DicePool::new(6).open(true);
        let r1 = pool.roll(&mut StdRng::seed_from_u64(99));
        let r2 = pool.roll(&mut StdRng::seed_from_u64(99));
        assert_eq!(r1, r2);
    }

    #[test]
    fn open_pool_chains_after_every_six() {
        let mut rng = StdRng::seed_from_u64(7);
        let roll = DicePool::new(200).open(true).roll(&mut rng);
        assert!(roll.count() >= 200);
        for pair in roll.dice.windows(2) {
            assert_eq!(pair[1].exploded, pair[0].face == 6);
        }
    }

    #[test]
    fn grey_shade_uses_three_plus() {
        let mut rng = StdRng::seed_from_u64(3);
        let roll = DicePool::new(30).shade(Shade::Grey).roll(&mut rng);
        for die in &roll.dice {
            assert_eq!(die.success, die.face >= 3);
        }
    }

    proptest! {
        #[test]
        fn successes_bounded_by_dice(size in -5i32..40, seed in any::<u64>(), open in any::<bool>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let roll = roll_dice(size, open, Shade::Black, &mut rng);
            let expected = size.max(0) as usize;
            prop_assert!(roll.successes() as usize <= roll.count());
            prop_assert!(roll.count() >= expected);
            if !open {
                prop_assert_eq!(roll.count(), expected);
            }
        }
    }
}
