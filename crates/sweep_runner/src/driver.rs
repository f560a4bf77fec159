//! Sequential sweep driver.
//!
//! Pulls one combination at a time, runs it to completion, writes its result
//! row, resets the statistics and pauses before the next combination. There
//! is never more than one run in flight.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use sweep_core::{Combination, ConfigError, ParameterEnumerator, SweepConfig};
use tracing::{debug, error, info, warn};

use crate::export::{ResultRow, ResultSink, SinkError};
use crate::runner::{ConfigurationRunner, RunError, RunStatus};
use crate::statistics::PerformanceTracker;

/// Poll errors tolerated in a row before a run is given up.
pub const MAX_CONSECUTIVE_POLL_ERRORS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unable to prepare performance evaluation: {0}")]
    Prepare(#[source] RunError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepTiming {
    pub poll_interval: Duration,
    pub wait_between_runs: Duration,
}

impl SweepTiming {
    pub fn from_config(config: &SweepConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            wait_between_runs: config.wait_between_runs(),
        }
    }

    /// No pauses at all; useful when runs finish synchronously.
    pub fn immediate() -> Self {
        Self {
            poll_interval: Duration::ZERO,
            wait_between_runs: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub completed: usize,
    pub failed: usize,
}

pub struct SweepDriver<R, S> {
    enumerator: Box<dyn ParameterEnumerator>,
    runner: R,
    tracker: Arc<PerformanceTracker>,
    sink: S,
    timing: SweepTiming,
    show_progress: bool,
}

impl<R: ConfigurationRunner, S: ResultSink> SweepDriver<R, S> {
    /// Creates a driver over an already built enumerator.
    ///
    /// # Arguments
    ///
    /// * `enumerator` - Source of combinations, consumed by [`run`](Self::run)
    /// * `runner` - Starts one run per combination
    /// * `tracker` - Statistics shared with `runner`, read after each run
    /// * `sink` - Receives one row per finished run
    /// * `timing` - Poll period and pause between runs
    pub fn new(
        enumerator: Box<dyn ParameterEnumerator>,
        runner: R,
        tracker: Arc<PerformanceTracker>,
        sink: S,
        timing: SweepTiming,
    ) -> Self {
        Self {
            enumerator,
            runner,
            tracker,
            sink,
            timing,
            show_progress: false,
        }
    }

    /// Creates a driver whose enumerator and timing come from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Config`] if the configuration cannot produce an
    /// enumerator (empty dimension, zero repetitions or samples, overflow).
    pub fn from_config(
        config: &SweepConfig,
        runner: R,
        tracker: Arc<PerformanceTracker>,
        sink: S,
    ) -> Result<Self, SweepError> {
        let enumerator = config.build_enumerator()?;
        Ok(Self::new(
            enumerator,
            runner,
            tracker,
            sink,
            SweepTiming::from_config(config),
        ))
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs every remaining combination.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Prepare`] if the runner cannot be prepared and
    /// [`SweepError::Sink`] if a result row cannot be written. Failed runs are
    /// counted in the summary instead.
    pub fn run(&mut self) -> Result<SweepSummary, SweepError> {
        self.runner.prepare().map_err(|error| {
            error!(%error, "preparation failed");
            SweepError::Prepare(error)
        })?;
        self.tracker.reset_statistics();

        let (total, _) = self.enumerator.size_hint();
        info!(
            strategy = self.enumerator.strategy().as_str(),
            total, "starting sweep"
        );
        let progress = self.progress_bar(total);

        let mut summary = SweepSummary::default();
        let mut sequence = 0usize;
        while self.enumerator.has_next() {
            let Some(combination) = self.enumerator.next() else {
                break;
            };

            info!(sequence, %combination, "starting run");
            match self.run_combination(sequence, &combination) {
                Ok(identifier) => {
                    let row = ResultRow::new(identifier, combination, self.tracker.snapshot());
                    self.sink.print(&row)?;
                    self.sink.flush()?;
                    info!(sequence, identifier = %row.identifier, "run finished");
                    summary.completed += 1;
                }
                Err(error) => {
                    error!(sequence, %combination, %error, "run failed");
                    summary.failed += 1;
                }
            }

            self.tracker.reset_statistics();
            if let Some(bar) = &progress {
                bar.inc(1);
            }
            sequence += 1;

            if !self.timing.wait_between_runs.is_zero() {
                debug!(
                    wait_ms = self.timing.wait_between_runs.as_millis() as u64,
                    "waiting before next run"
                );
                thread::sleep(self.timing.wait_between_runs);
            }
        }

        if let Some(bar) = progress {
            bar.finish_with_message("Completed");
        }
        info!(completed = summary.completed, failed = summary.failed, "sweep finished");
        Ok(summary)
    }

    /// Blocks until the run for `combination` is done; returns its identifier.
    fn run_combination(
        &mut self,
        sequence: usize,
        combination: &Combination,
    ) -> Result<String, RunError> {
        let mut handle = self.runner.start(sequence, combination)?;
        let mut poll_errors = 0usize;

        loop {
            match handle.poll() {
                Ok(RunStatus::Finished) => return Ok(handle.identifier().to_string()),
                Ok(RunStatus::Running) => poll_errors = 0,
                Err(error) if error.is_transient() && poll_errors < MAX_CONSECUTIVE_POLL_ERRORS => {
                    poll_errors += 1;
                    warn!(sequence, %error, poll_errors, "poll failed, checking again");
                }
                Err(error) => return Err(error),
            }
            thread::sleep(self.timing.poll_interval);
        }
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.show_progress || total == 0 {
            return None;
        }

        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        ) {
            bar.set_style(style.progress_chars("#>-"));
        }
        Some(bar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;
    use crate::runner::RunHandle;
    use sweep_core::RepeatPermuteCombinator;

    struct InstantRun {
        identifier: String,
    }

    impl RunHandle for InstantRun {
        fn identifier(&self) -> &str {
            &self.identifier
        }

        fn poll(&mut self) -> Result<RunStatus, RunError> {
            Ok(RunStatus::Finished)
        }
    }

    struct InstantRunner;

    impl ConfigurationRunner for InstantRunner {
        fn start(
            &mut self,
            sequence: usize,
            _combination: &Combination,
        ) -> Result<Box<dyn RunHandle>, RunError> {
            Ok(Box::new(InstantRun {
                identifier: format!("instant-{sequence}"),
            }))
        }
    }

    #[test]
    fn driver_writes_one_row_per_combination() {
        let enumerator = RepeatPermuteCombinator::new(vec![3], vec![10, 20], vec![5], 2).unwrap();
        let mut driver = SweepDriver::new(
            Box::new(enumerator),
            InstantRunner,
            Arc::new(PerformanceTracker::new()),
            MemorySink::new(),
            SweepTiming::immediate(),
        );

        let summary = driver.run().unwrap();
        assert_eq!(summary, SweepSummary { completed: 4, failed: 0 });

        let bins: Vec<u32> = driver.sink().rows().iter().map(|r| r.combination.bins()).collect();
        assert_eq!(bins, vec![10, 10, 20, 20]);
        assert_eq!(driver.sink().flushes(), 4);
        assert_eq!(driver.sink().rows()[3].identifier, "instant-3");
    }

    #[test]
    fn second_run_is_empty() {
        let enumerator = RepeatPermuteCombinator::new(vec![1], vec![1], vec![1], 1).unwrap();
        let mut driver = SweepDriver::new(
            Box::new(enumerator),
            InstantRunner,
            Arc::new(PerformanceTracker::new()),
            MemorySink::new(),
            SweepTiming::immediate(),
        );

        assert_eq!(driver.run().unwrap().completed, 1);
        assert_eq!(driver.run().unwrap(), SweepSummary::default());
    }
}
