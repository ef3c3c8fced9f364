//! Determinism testing utilities.
//!
//! Provides a harness for verifying that condition evaluation produces
//! identical results given an identical scenario and dice seed.
//!
//! # Testing Strategy
//!
//! Evaluation must be reproducible so that a replayed turn pays the same
//! objective income. Sources of non-determinism include:
//!
//! - **Unseeded randomness**: every chance roll goes through a
//!   [`tbs_core::random::RandomSource`]; tests use seeded dice.
//!
//! - **HashMap iteration order**: attachments are kept in name order and
//!   caches are ordered maps, so batches evaluate in a stable order.
//!
//! - **Shared mutable state**: a pass reads game data immutably and hands
//!   chance counter changes back instead of writing them.

use std::thread;

use tbs_core::game::GameData;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult<T> {
    /// Whether all runs produced identical outcomes.
    pub is_deterministic: bool,
    /// Outcome of each run.
    pub outcomes: Vec<T>,
}

impl<T: PartialEq + std::fmt::Debug> DeterminismResult<T> {
    fn from_outcomes(outcomes: Vec<T>) -> Self {
        let is_deterministic = outcomes.windows(2).all(|w| w[0] == w[1]);
        if !is_deterministic {
            tracing::warn!("Outcomes differ across {} runs", outcomes.len());
        }
        Self {
            is_deterministic,
            outcomes,
        }
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different outcomes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            panic!(
                "Evaluation is non-deterministic!\n\
                 Runs: {}\n\
                 All outcomes: {:?}",
                self.outcomes.len(),
                self.outcomes
            );
        }
    }
}

/// Run an evaluation several times on fresh game data and compare outcomes.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `setup` - Function creating the game data for one run
/// * `run` - Function evaluating on that data and returning the outcome
///
/// # Example
///
/// ```ignore
/// use tbs_test_utils::determinism::verify_determinism;
/// use tbs_test_utils::fixtures::{player, sample_game};
///
/// let result = verify_determinism(3, sample_game, |data| {
///     let germans = player(data, "Germans");
///     collect_objective_income(data, germans, SeededDice::new(7)).unwrap()
/// });
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<T, Setup, Run>(runs: usize, setup: Setup, run: Run) -> DeterminismResult<T>
where
    T: PartialEq + std::fmt::Debug,
    Setup: Fn() -> GameData,
    Run: Fn(&mut GameData) -> T,
{
    let outcomes = (0..runs)
        .map(|_| {
            let mut data = setup();
            run(&mut data)
        })
        .collect();
    DeterminismResult::from_outcomes(outcomes)
}

/// Run the same evaluation on `threads` threads at once and compare.
///
/// Catches order dependence that only shows up under scheduling changes.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn verify_parallel_determinism<T, Setup, Run>(
    threads: usize,
    setup: Setup,
    run: Run,
) -> DeterminismResult<T>
where
    T: PartialEq + std::fmt::Debug + Send,
    Setup: Fn() -> GameData + Sync,
    Run: Fn(&mut GameData) -> T + Sync,
{
    let outcomes = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                scope.spawn(|| {
                    let mut data = setup();
                    run(&mut data)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("evaluation thread panicked"))
            .collect()
    });
    DeterminismResult::from_outcomes(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{player, sample_game};
    use tbs_core::objectives::collect_objective_income;
    use tbs_core::random::SeededDice;

    fn germans_income(data: &mut GameData, seed: u64) -> i32 {
        let germans = player(data, "Germans");
        collect_objective_income(data, germans, SeededDice::new(seed))
            .unwrap()
            .total()
    }

    #[test]
    fn test_same_seed_same_income() {
        let result = verify_determinism(4, sample_game, |data| germans_income(data, 42));
        result.assert_deterministic();
        assert_eq!(result.outcomes.len(), 4);
    }

    #[test]
    fn test_parallel_runs_match() {
        let result = verify_parallel_determinism(4, sample_game, |data| germans_income(data, 9));
        result.assert_deterministic();
    }

    #[test]
    fn test_mismatch_is_detected() {
        let result = DeterminismResult::from_outcomes(vec![1, 2]);
        assert!(!result.is_deterministic);
    }
}
