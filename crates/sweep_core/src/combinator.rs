//! Odometer enumeration over the sweep dimensions.
//!
//! [`RepeatPermuteCombinator`] walks the Cartesian product of participants,
//! bins and mailbox check intervals with the interval changing fastest, and
//! emits every tuple `repetitions_per_combination` times in a row before the
//! odometer moves on.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::combination::{Combination, Dimensions};
use crate::error::ConfigError;

/// Identifies an enumeration strategy in logs and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationStrategyKind {
    RepeatPermute,
    RandomSample,
}

impl EnumerationStrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RepeatPermute => "repeat_permute",
            Self::RandomSample => "random_sample",
        }
    }
}

/// A source of combinations for one sweep.
///
/// Implementations are consumed once by a single driver. `has_next` never
/// changes what the following `next` returns.
pub trait ParameterEnumerator: Iterator<Item = Combination> + Send {
    /// Whether another combination can be produced. Side-effect free.
    fn has_next(&self) -> bool;

    /// Number of combinations emitted over the enumerator's whole lifetime.
    fn total_combinations(&self) -> usize;

    fn strategy(&self) -> EnumerationStrategyKind;
}

pub(crate) fn check_repetitions(repetitions_per_combination: u32) -> Result<(), ConfigError> {
    if repetitions_per_combination == 0 {
        return Err(ConfigError::InvalidRepetitions(repetitions_per_combination));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    participant: usize,
    bin: usize,
    interval: usize,
    /// How often the tuple at the indices above has been emitted.
    repetition: u32,
}

/// Permutes all parameter values and repeats every combination.
#[derive(Debug, Clone)]
pub struct RepeatPermuteCombinator {
    dimensions: Dimensions,
    repetitions_per_combination: u32,
    cursor: Cursor,
    total: usize,
}

impl RepeatPermuteCombinator {
    /// Creates an enumerator positioned before the first combination.
    ///
    /// # Errors
    ///
    /// Returns an error if any list is empty, if `repetitions_per_combination`
    /// is zero, or if the run count does not fit in `usize`.
    pub fn new(
        participants: Vec<u32>,
        bins: Vec<u32>,
        mailbox_check_intervals: Vec<u32>,
        repetitions_per_combination: u32,
    ) -> Result<Self, ConfigError> {
        let dimensions = Dimensions::new(participants, bins, mailbox_check_intervals)?;
        Self::from_dimensions(dimensions, repetitions_per_combination)
    }

    pub fn from_dimensions(
        dimensions: Dimensions,
        repetitions_per_combination: u32,
    ) -> Result<Self, ConfigError> {
        check_repetitions(repetitions_per_combination)?;
        let total = dimensions
            .points()?
            .checked_mul(repetitions_per_combination as usize)
            .ok_or(ConfigError::TooManyRuns)?;

        Ok(Self {
            dimensions,
            repetitions_per_combination,
            cursor: Cursor::default(),
            total,
        })
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn repetitions_per_combination(&self) -> u32 {
        self.repetitions_per_combination
    }

    /// Cursor after one more step, or `None` once the sweep is exhausted.
    fn advanced(&self) -> Option<Cursor> {
        let mut next = self.cursor;

        if next.repetition >= self.repetitions_per_combination {
            next.repetition = 0;

            if next.interval + 1 < self.dimensions.mailbox_check_intervals().len() {
                next.interval += 1;
            } else {
                next.interval = 0;
                if next.bin + 1 < self.dimensions.bins().len() {
                    next.bin += 1;
                } else {
                    next.bin = 0;
                    if next.participant + 1 < self.dimensions.participants().len() {
                        next.participant += 1;
                    } else {
                        return None;
                    }
                }
            }
        }

        next.repetition += 1;
        Some(next)
    }

    /// Combinations emitted so far.
    fn emitted(&self) -> usize {
        let bins = self.dimensions.bins().len();
        let intervals = self.dimensions.mailbox_check_intervals().len();
        let tuple = (self.cursor.participant * bins + self.cursor.bin) * intervals
            + self.cursor.interval;
        tuple * self.repetitions_per_combination as usize + self.cursor.repetition as usize
    }
}

impl Iterator for RepeatPermuteCombinator {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        let cursor = self.advanced()?;
        self.cursor = cursor;
        Some(
            self.dimensions
                .combination_at(cursor.participant, cursor.bin, cursor.interval),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.emitted();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RepeatPermuteCombinator {}

impl FusedIterator for RepeatPermuteCombinator {}

impl ParameterEnumerator for RepeatPermuteCombinator {
    fn has_next(&self) -> bool {
        self.advanced().is_some()
    }

    fn total_combinations(&self) -> usize {
        self.total
    }

    fn strategy(&self) -> EnumerationStrategyKind {
        EnumerationStrategyKind::RepeatPermute
    }
}
