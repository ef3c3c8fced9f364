//! Dice for tests.

use tbs_core::random::RandomSource;

/// Dice that replay a fixed list of rolls, then roll zero.
///
/// Records every annotation so tests can check what was rolled for.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: Vec<u32>,
    annotations: Vec<String>,
}

impl ScriptedDice {
    /// Dice returning `rolls` in order.
    #[must_use]
    pub fn new(rolls: &[u32]) -> Self {
        Self {
            rolls: rolls.to_vec(),
            annotations: Vec::new(),
        }
    }

    /// Number of rolls made.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.annotations.len()
    }

    /// Annotations of every roll made, in order.
    #[must_use]
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }
}

impl RandomSource for ScriptedDice {
    fn random(&mut self, max: u32, annotation: &str) -> u32 {
        let roll = self.rolls.get(self.annotations.len()).copied().unwrap_or(0);
        self.annotations.push(annotation.to_string());
        if max == 0 {
            0
        } else {
            roll.min(max - 1)
        }
    }
}
