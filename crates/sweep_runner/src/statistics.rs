//! Performance statistics collected while a configuration runs.
//!
//! The tracker is shared between the driver and the configuration runner.
//! Runners record processing times and message traffic, the driver takes a
//! snapshot once a run has finished and resets the counters before the next
//! combination starts.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

/// Aggregated figures for one finished run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceSnapshot {
    pub fastest_processing_time_ms: u64,
    pub slowest_processing_time_ms: u64,
    pub mean_processing_time_ms: f64,
    pub messages_received: u64,
    /// Sum of received message sizes in bytes.
    pub total_size_received: u64,
    pub messages_sent: u64,
    /// Sum of sent message sizes in bytes.
    pub total_size_sent: u64,
}

impl PerformanceSnapshot {
    /// Fastest, slowest and mean of a set of durations.
    fn calculate_stats(values: &[u64]) -> (u64, u64, f64) {
        if values.is_empty() {
            return (0, 0, 0.0);
        }

        let fastest = values.iter().copied().min().unwrap_or(0);
        let slowest = values.iter().copied().max().unwrap_or(0);
        let mean = values.iter().sum::<u64>() as f64 / values.len() as f64;

        (fastest, slowest, mean)
    }
}

#[derive(Debug, Default)]
struct Counters {
    processing_times_ms: Vec<u64>,
    messages_sent: u64,
    total_size_sent: u64,
    messages_received: u64,
    total_size_received: u64,
}

#[derive(Debug, Default)]
pub struct PerformanceTracker {
    counters: Mutex<Counters>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // Counters stay consistent even if a recording thread panicked.
    fn counters(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Time one participant needed from start to finish.
    pub fn record_processing_time(&self, millis: u64) {
        self.counters().processing_times_ms.push(millis);
    }

    pub fn record_message_sent(&self, size_bytes: u64) {
        let mut counters = self.counters();
        counters.messages_sent += 1;
        counters.total_size_sent += size_bytes;
    }

    pub fn record_message_received(&self, size_bytes: u64) {
        let mut counters = self.counters();
        counters.messages_received += 1;
        counters.total_size_received += size_bytes;
    }

    pub fn snapshot(&self) -> PerformanceSnapshot {
        let counters = self.counters();
        let (fastest, slowest, mean) =
            PerformanceSnapshot::calculate_stats(&counters.processing_times_ms);

        PerformanceSnapshot {
            fastest_processing_time_ms: fastest,
            slowest_processing_time_ms: slowest,
            mean_processing_time_ms: mean,
            messages_received: counters.messages_received,
            total_size_received: counters.total_size_received,
            messages_sent: counters.messages_sent,
            total_size_sent: counters.total_size_sent,
        }
    }

    pub fn reset_statistics(&self) {
        *self.counters() = Counters::default();
    }
}
