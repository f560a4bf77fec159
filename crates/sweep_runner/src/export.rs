//! Result rows and the sinks that persist them.
//!
//! One [`ResultRow`] is produced per finished run. Sinks receive rows in
//! emission order and are flushed after every row so an interrupted sweep
//! keeps everything recorded so far.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sweep_core::Combination;

use crate::statistics::PerformanceSnapshot;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/writer_utils.rs"]
mod writer_utils;

pub use self::csv::CsvResultSink;

/// Column names of a result record, in output order.
pub const RESULT_COLUMNS: [&str; 12] = [
    "Date",
    "StudyUID",
    "Number participants",
    "Number bins",
    "Mailbox check interval",
    "Fastest processing time",
    "Slowest processing time",
    "Mean processing time",
    "Number messages received",
    "Total size messages received",
    "Number messages sent",
    "Total size messages sent",
];

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to write result record: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("failed to access result file: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one run, ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    /// RFC 3339 UTC time the row was produced.
    pub recorded_at: String,
    pub identifier: String,
    pub combination: Combination,
    pub statistics: PerformanceSnapshot,
}

impl ResultRow {
    pub fn new(
        identifier: impl Into<String>,
        combination: Combination,
        statistics: PerformanceSnapshot,
    ) -> Self {
        Self {
            recorded_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            identifier: identifier.into(),
            combination,
            statistics,
        }
    }

    /// Values in [`RESULT_COLUMNS`] order.
    pub fn fields(&self) -> [String; 12] {
        let stats = &self.statistics;
        [
            self.recorded_at.clone(),
            self.identifier.clone(),
            self.combination.participants().to_string(),
            self.combination.bins().to_string(),
            self.combination.mailbox_check_interval().to_string(),
            stats.fastest_processing_time_ms.to_string(),
            stats.slowest_processing_time_ms.to_string(),
            stats.mean_processing_time_ms.to_string(),
            stats.messages_received.to_string(),
            stats.total_size_received.to_string(),
            stats.messages_sent.to_string(),
            stats.total_size_sent.to_string(),
        ]
    }
}

/// Destination for result rows.
pub trait ResultSink {
    fn print(&mut self, row: &ResultRow) -> Result<(), SinkError>;

    fn flush(&mut self) -> Result<(), SinkError>;
}

/// Keeps rows in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Vec<ResultRow>,
    flushes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl ResultSink for MemorySink {
    fn print(&mut self, row: &ResultRow) -> Result<(), SinkError> {
        self.rows.push(row.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.flushes += 1;
        Ok(())
    }
}
