use std::collections::HashSet;
use std::iter::FusedIterator;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::combination::{Combination, Dimensions};
use crate::combinator::{check_repetitions, EnumerationStrategyKind, ParameterEnumerator};
use crate::error::ConfigError;

type Point = (usize, usize, usize);

/// Monte Carlo variant of the sweep.
///
/// Draws up to `samples` distinct points from the parameter space with a
/// seeded RNG and repeats each one like [`RepeatPermuteCombinator`] does.
/// The draw happens up front, so the emission order is fixed at construction.
///
/// [`RepeatPermuteCombinator`]: crate::RepeatPermuteCombinator
#[derive(Debug, Clone)]
pub struct RandomSampleCombinator {
    dimensions: Dimensions,
    repetitions_per_combination: u32,
    plan: Vec<Point>,
    slot: usize,
    repetition: u32,
}

impl RandomSampleCombinator {
    /// Draws the sample plan for `seed` up front.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSampleCount`] for zero samples and
    /// [`ConfigError::InvalidRepetitions`] for zero repetitions.
    pub fn new(
        dimensions: Dimensions,
        samples: usize,
        seed: u64,
        repetitions_per_combination: u32,
    ) -> Result<Self, ConfigError> {
        check_repetitions(repetitions_per_combination)?;
        if samples == 0 {
            return Err(ConfigError::InvalidSampleCount);
        }

        let plan = draw_plan(&dimensions, samples, seed)?;
        plan.len()
            .checked_mul(repetitions_per_combination as usize)
            .ok_or(ConfigError::TooManyRuns)?;

        Ok(Self {
            dimensions,
            repetitions_per_combination,
            plan,
            slot: 0,
            repetition: 0,
        })
    }

    /// Distinct points drawn for this sweep.
    pub fn sampled_points(&self) -> usize {
        self.plan.len()
    }

    fn advanced(&self) -> Option<(usize, u32)> {
        if self.repetition < self.repetitions_per_combination {
            return Some((self.slot, self.repetition + 1));
        }
        if self.slot + 1 < self.plan.len() {
            return Some((self.slot + 1, 1));
        }
        None
    }

    fn emitted(&self) -> usize {
        self.slot * self.repetitions_per_combination as usize + self.repetition as usize
    }
}

fn draw_plan(dimensions: &Dimensions, samples: usize, seed: u64) -> Result<Vec<Point>, ConfigError> {
    let space = dimensions.points()?;
    let participants = dimensions.participants().len();
    let bins = dimensions.bins().len();
    let intervals = dimensions.mailbox_check_intervals().len();
    let mut rng = StdRng::seed_from_u64(seed);

    if samples >= space {
        let mut plan: Vec<Point> = (0..participants)
            .flat_map(|p| (0..bins).flat_map(move |b| (0..intervals).map(move |i| (p, b, i))))
            .collect();
        plan.shuffle(&mut rng);
        return Ok(plan);
    }

    let mut seen = HashSet::with_capacity(samples);
    let mut plan = Vec::with_capacity(samples);
    while plan.len() < samples {
        let point = (
            rng.gen_range(0..participants),
            rng.gen_range(0..bins),
            rng.gen_range(0..intervals),
        );
        if seen.insert(point) {
            plan.push(point);
        }
    }

    Ok(plan)
}

impl Iterator for RandomSampleCombinator {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        let (slot, repetition) = self.advanced()?;
        self.slot = slot;
        self.repetition = repetition;
        let (participant, bin, interval) = self.plan[slot];
        Some(self.dimensions.combination_at(participant, bin, interval))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_combinations() - self.emitted();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RandomSampleCombinator {}

impl FusedIterator for RandomSampleCombinator {}

impl ParameterEnumerator for RandomSampleCombinator {
    fn has_next(&self) -> bool {
        self.advanced().is_some()
    }

    fn total_combinations(&self) -> usize {
        self.plan.len() * self.repetitions_per_combination as usize
    }

    fn strategy(&self) -> EnumerationStrategyKind {
        EnumerationStrategyKind::RandomSample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimensions() -> Dimensions {
        Dimensions::new(vec![2, 3, 4], vec![1000, 2500, 5000], vec![1000, 5000]).unwrap()
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let a = RandomSampleCombinator::new(dimensions(), 5, 42, 2).unwrap();
        let b = RandomSampleCombinator::new(dimensions(), 5, 42, 2).unwrap();
        assert_eq!(a.collect::<Vec<_>>(), b.collect::<Vec<_>>());
    }

    #[test]
    fn samples_are_distinct_and_repeated_consecutively() {
        let combinator = RandomSampleCombinator::new(dimensions(), 6, 7, 3).unwrap();
        assert_eq!(combinator.total_combinations(), 18);

        let emitted: Vec<_> = combinator.collect();
        assert_eq!(emitted.len(), 18);

        let mut distinct = HashSet::new();
        for chunk in emitted.chunks(3) {
            assert!(chunk.iter().all(|c| *c == chunk[0]));
            assert!(distinct.insert(chunk[0]), "point drawn twice: {}", chunk[0]);
        }
        assert_eq!(distinct.len(), 6);
    }

    #[test]
    fn sample_count_is_capped_at_space_size() {
        let combinator = RandomSampleCombinator::new(dimensions(), 100, 1, 1).unwrap();
        assert_eq!(combinator.sampled_points(), 18);

        let distinct: HashSet<_> = combinator.collect();
        assert_eq!(distinct.len(), 18);
    }

    #[test]
    fn has_next_is_pure_and_exhaustion_sticks() {
        let mut combinator = RandomSampleCombinator::new(dimensions(), 2, 9, 1).unwrap();
        assert!(combinator.has_next());
        assert!(combinator.has_next());
        assert_eq!(combinator.len(), 2);

        assert!(combinator.next().is_some());
        assert!(combinator.next().is_some());
        assert!(!combinator.has_next());
        assert_eq!(combinator.next(), None);
        assert_eq!(combinator.next(), None);
    }

    #[test]
    fn zero_samples_are_rejected() {
        let error = RandomSampleCombinator::new(dimensions(), 0, 1, 1).expect_err("no samples");
        assert!(matches!(error, ConfigError::InvalidSampleCount));
    }
}
