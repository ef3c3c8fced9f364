//! Random numbers for chance gates.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of dice rolls.
pub trait RandomSource {
    /// Draw an integer in `[0, max)`. `annotation` says what the roll is for.
    fn random(&mut self, max: u32, annotation: &str) -> u32;
}

/// Reproducible dice backed by a seeded [`SmallRng`].
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: SmallRng,
    rolls: u64,
}

impl SeededDice {
    /// Dice seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            rolls: 0,
        }
    }

    /// Number of rolls made so far.
    #[must_use]
    pub fn rolls(&self) -> u64 {
        self.rolls
    }
}

impl RandomSource for SeededDice {
    fn random(&mut self, max: u32, _annotation: &str) -> u32 {
        self.rolls += 1;
        if max == 0 {
            return 0;
        }
        self.rng.random_range(0..max)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn random(&mut self, max: u32, annotation: &str) -> u32 {
        (**self).random(max, annotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_rolls() {
        let mut a = SeededDice::new(7);
        let mut b = SeededDice::new(7);
        let rolls_a: Vec<u32> = (0..20).map(|_| a.random(6, "test")).collect();
        let rolls_b: Vec<u32> = (0..20).map(|_| b.random(6, "test")).collect();
        assert_eq!(rolls_a, rolls_b);
        assert!(rolls_a.iter().all(|&r| r < 6));
        assert_eq!(a.rolls(), 20);
    }

    #[test]
    fn test_zero_sided_roll() {
        let mut dice = SeededDice::new(1);
        assert_eq!(dice.random(0, "test"), 0);
    }
}
