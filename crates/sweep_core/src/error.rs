/// Errors raised while building a sweep from its configuration.
///
/// Every variant is fatal: no enumerator is produced from a rejected
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// One of the value lists has no entries.
    #[error("dimension '{0}' must be a non-empty list")]
    EmptyDimension(&'static str),
    /// Each combination has to be emitted at least once.
    #[error("repetitions_per_combination must be a positive integer, got {0}")]
    InvalidRepetitions(u32),
    #[error("random sampling requires at least one sample")]
    InvalidSampleCount,
    #[error("parameter space is too large to enumerate")]
    TooManyRuns,
    #[error("invalid sweep configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read sweep configuration: {0}")]
    Io(#[from] std::io::Error),
}
