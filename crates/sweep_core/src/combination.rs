use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One point in the parameter space under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combination {
    participants: u32,
    bins: u32,
    mailbox_check_interval: u32,
}

impl Combination {
    /// # Arguments
    ///
    /// * `participants` - Number of parties taking part in the run
    /// * `bins` - Number of bins (batch size) of the computation
    /// * `mailbox_check_interval` - Mailbox polling period in milliseconds
    pub fn new(participants: u32, bins: u32, mailbox_check_interval: u32) -> Self {
        Self {
            participants,
            bins,
            mailbox_check_interval,
        }
    }

    pub fn participants(&self) -> u32 {
        self.participants
    }

    pub fn bins(&self) -> u32 {
        self.bins
    }

    /// Polling period of the participants' mailboxes, in milliseconds.
    pub fn mailbox_check_interval(&self) -> u32 {
        self.mailbox_check_interval
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "participants={} bins={} interval={}ms",
            self.participants, self.bins, self.mailbox_check_interval
        )
    }
}

/// The three ordered value lists a sweep draws from.
///
/// Every list is guaranteed non-empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimensions {
    participants: Vec<u32>,
    bins: Vec<u32>,
    mailbox_check_intervals: Vec<u32>,
}

impl Dimensions {
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyDimension`] naming the first empty list.
    pub fn new(
        participants: Vec<u32>,
        bins: Vec<u32>,
        mailbox_check_intervals: Vec<u32>,
    ) -> Result<Self, ConfigError> {
        if participants.is_empty() {
            return Err(ConfigError::EmptyDimension("participants"));
        }
        if bins.is_empty() {
            return Err(ConfigError::EmptyDimension("bins"));
        }
        if mailbox_check_intervals.is_empty() {
            return Err(ConfigError::EmptyDimension("mailbox_check_intervals"));
        }

        Ok(Self {
            participants,
            bins,
            mailbox_check_intervals,
        })
    }

    pub fn participants(&self) -> &[u32] {
        &self.participants
    }

    pub fn bins(&self) -> &[u32] {
        &self.bins
    }

    pub fn mailbox_check_intervals(&self) -> &[u32] {
        &self.mailbox_check_intervals
    }

    /// Number of distinct `(participants, bins, interval)` tuples.
    pub fn points(&self) -> Result<usize, ConfigError> {
        self.participants
            .len()
            .checked_mul(self.bins.len())
            .and_then(|points| points.checked_mul(self.mailbox_check_intervals.len()))
            .ok_or(ConfigError::TooManyRuns)
    }

    pub(crate) fn combination_at(&self, participant: usize, bin: usize, interval: usize) -> Combination {
        Combination::new(
            self.participants[participant],
            self.bins[bin],
            self.mailbox_check_intervals[interval],
        )
    }
}
