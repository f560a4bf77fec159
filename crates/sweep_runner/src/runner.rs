//! Execution of a single configuration.
//!
//! The sweep driver only knows how to start a run for a [`Combination`] and
//! ask whether it has finished. Everything about how the benchmarked process
//! is actually executed lives behind [`ConfigurationRunner`].

use serde::{Deserialize, Serialize};
use sweep_core::Combination;

use crate::statistics::PerformanceTracker;

#[path = "runner/command.rs"]
mod command;

pub use command::CommandRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Finished,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("preparation failed: {0}")]
    Prepare(String),
    #[error("failed to start run: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("failed to check run status: {0}")]
    Poll(#[source] std::io::Error),
    #[error("run exited unsuccessfully: {0}")]
    Failed(String),
    #[error("run produced no usable report: {0}")]
    InvalidReport(String),
}

impl RunError {
    /// Whether asking again may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Poll(_))
    }
}

/// A run in progress.
pub trait RunHandle: Send {
    /// Identifier written to the result row.
    fn identifier(&self) -> &str;

    /// Non-blocking completion check.
    fn poll(&mut self) -> Result<RunStatus, RunError>;
}

/// Starts the benchmarked process for one combination.
pub trait ConfigurationRunner {
    /// Called once before the first run. Failure aborts the sweep.
    fn prepare(&mut self) -> Result<(), RunError> {
        Ok(())
    }

    fn start(
        &mut self,
        sequence: usize,
        combination: &Combination,
    ) -> Result<Box<dyn RunHandle>, RunError>;
}

/// Statistics a finished run reports about itself.
///
/// External processes print this as a single JSON line on stdout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// One entry per participant.
    #[serde(default)]
    pub processing_times_ms: Vec<u64>,
    /// Size in bytes of every message sent.
    #[serde(default)]
    pub messages_sent: Vec<u64>,
    /// Size in bytes of every message received.
    #[serde(default)]
    pub messages_received: Vec<u64>,
}

impl RunReport {
    /// Parses the last non-empty line of `output`.
    pub fn from_output(output: &str) -> Result<Self, RunError> {
        let line = output
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| RunError::InvalidReport("no output".to_string()))?;

        serde_json::from_str(line).map_err(|error| RunError::InvalidReport(error.to_string()))
    }

    pub fn record_into(&self, tracker: &PerformanceTracker) {
        for &millis in &self.processing_times_ms {
            tracker.record_processing_time(millis);
        }
        for &size in &self.messages_sent {
            tracker.record_message_sent(size);
        }
        for &size in &self.messages_received {
            tracker.record_message_received(size);
        }
    }
}
