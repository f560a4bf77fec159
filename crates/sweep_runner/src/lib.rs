//! Sequential benchmark sweep execution.
//!
//! This crate drives a [`sweep_core`] enumerator to exhaustion: each
//! combination is handed to a [`ConfigurationRunner`], polled until the run
//! has finished, and recorded as one row in a [`ResultSink`].
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use sweep_core::SweepConfig;
//! use sweep_runner::{CommandRunner, CsvResultSink, PerformanceTracker, SweepDriver, SweepTiming};
//!
//! let config = SweepConfig::load("sweep.json")?;
//! let tracker = Arc::new(PerformanceTracker::new());
//! let runner = CommandRunner::new("./run-benchmark", vec!["{participants}".into()], tracker.clone());
//! let sink = CsvResultSink::open("performance_evaluation.csv")?;
//!
//! let mut driver = SweepDriver::new(
//!     config.build_enumerator()?,
//!     runner,
//!     tracker,
//!     sink,
//!     SweepTiming::from_config(&config),
//! );
//! let summary = driver.run()?;
//! println!("{} runs completed, {} failed", summary.completed, summary.failed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - [`driver`]: the sequential sweep loop
//! - [`runner`]: the run-one-configuration seam and an external command runner
//! - [`statistics`]: per-run performance counters
//! - [`export`]: result rows and the CSV sink
//! - [`logging`]: tracing subscriber setup

pub mod driver;
pub mod export;
pub mod logging;
pub mod runner;
pub mod statistics;

pub use driver::{SweepDriver, SweepError, SweepSummary, SweepTiming};
pub use export::{CsvResultSink, MemorySink, ResultRow, ResultSink, SinkError, RESULT_COLUMNS};
pub use runner::{CommandRunner, ConfigurationRunner, RunError, RunHandle, RunReport, RunStatus};
pub use statistics::{PerformanceSnapshot, PerformanceTracker};
