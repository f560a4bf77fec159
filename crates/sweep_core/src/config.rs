//! Sweep configuration contract.
//!
//! A [`SweepConfig`] is read from JSON, validated, and turned into the
//! enumerator that drives one sweep. Every field has a default, so `{}` is a
//! valid configuration describing the standard three-party evaluation.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::combination::Dimensions;
use crate::combinator::{check_repetitions, ParameterEnumerator, RepeatPermuteCombinator};
use crate::error::ConfigError;
use crate::sampling::RandomSampleCombinator;

pub const DEFAULT_REPETITIONS_PER_COMBINATION: u32 = 15;
pub const DEFAULT_WAIT_BETWEEN_RUNS_MS: u64 = 1_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// How combinations are drawn from the parameter space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnumerationStrategy {
    /// Every combination in odometer order.
    #[default]
    RepeatPermute,
    /// `samples` distinct combinations drawn with a seeded RNG.
    RandomSample {
        samples: usize,
        #[serde(default)]
        seed: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_participants")]
    pub participants: Vec<u32>,
    #[serde(default = "default_bins")]
    pub bins: Vec<u32>,
    #[serde(default = "default_mailbox_check_intervals")]
    pub mailbox_check_intervals: Vec<u32>,
    #[serde(default = "default_repetitions_per_combination")]
    pub repetitions_per_combination: u32,
    /// Pause after a finished run before the next one starts.
    #[serde(default = "default_wait_between_runs_ms")]
    pub wait_between_runs_ms: u64,
    /// How often a running configuration is checked for completion.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub strategy: EnumerationStrategy,
}

fn default_participants() -> Vec<u32> {
    vec![3]
}

fn default_bins() -> Vec<u32> {
    vec![10_000, 7_500, 5_000, 2_500, 1_000]
}

fn default_mailbox_check_intervals() -> Vec<u32> {
    vec![20_000, 15_000, 10_000, 5_000, 1_000]
}

fn default_repetitions_per_combination() -> u32 {
    DEFAULT_REPETITIONS_PER_COMBINATION
}

fn default_wait_between_runs_ms() -> u64 {
    DEFAULT_WAIT_BETWEEN_RUNS_MS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            participants: default_participants(),
            bins: default_bins(),
            mailbox_check_intervals: default_mailbox_check_intervals(),
            repetitions_per_combination: DEFAULT_REPETITIONS_PER_COMBINATION,
            wait_between_runs_ms: DEFAULT_WAIT_BETWEEN_RUNS_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            strategy: EnumerationStrategy::default(),
        }
    }
}

impl SweepConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or the validation
    /// error described in [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates the configuration stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json_str`](Self::from_json_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// # Errors
    ///
    /// Returns an error for an empty dimension, zero repetitions, zero
    /// samples, or a run count that overflows `usize`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.total_runs().map(|_| ())
    }

    pub fn dimensions(&self) -> Result<Dimensions, ConfigError> {
        Dimensions::new(
            self.participants.clone(),
            self.bins.clone(),
            self.mailbox_check_intervals.clone(),
        )
    }

    /// Number of runs the configured sweep performs.
    pub fn total_runs(&self) -> Result<usize, ConfigError> {
        let points = self.dimensions()?.points()?;
        check_repetitions(self.repetitions_per_combination)?;

        let drawn = match self.strategy {
            EnumerationStrategy::RepeatPermute => points,
            EnumerationStrategy::RandomSample { samples: 0, .. } => {
                return Err(ConfigError::InvalidSampleCount);
            }
            EnumerationStrategy::RandomSample { samples, .. } => samples.min(points),
        };

        drawn
            .checked_mul(self.repetitions_per_combination as usize)
            .ok_or(ConfigError::TooManyRuns)
    }

    pub fn wait_between_runs(&self) -> Duration {
        Duration::from_millis(self.wait_between_runs_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Builds the enumerator selected by `strategy`.
    ///
    /// # Errors
    ///
    /// Fails for the same reasons as [`validate`](Self::validate).
    pub fn build_enumerator(&self) -> Result<Box<dyn ParameterEnumerator>, ConfigError> {
        let dimensions = self.dimensions()?;
        let enumerator: Box<dyn ParameterEnumerator> = match self.strategy {
            EnumerationStrategy::RepeatPermute => Box::new(RepeatPermuteCombinator::from_dimensions(
                dimensions,
                self.repetitions_per_combination,
            )?),
            EnumerationStrategy::RandomSample { samples, seed } => {
                Box::new(RandomSampleCombinator::new(
                    dimensions,
                    samples,
                    seed,
                    self.repetitions_per_combination,
                )?)
            }
        };
        Ok(enumerator)
    }

    /// SHA-256 over the canonical JSON form; identical sweeps share it.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(stable_json(self));
        format!("{:x}", hasher.finalize())
    }
}

pub fn stable_json(value: impl Serialize) -> String {
    serde_json::to_string(&value).expect("serialization of sweep config should not fail")
}
