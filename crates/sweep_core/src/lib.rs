//! Deterministic parameter enumeration for benchmark sweeps.
//!
//! This crate owns the combination value type, the enumeration strategies and
//! the sweep configuration contract. It intentionally excludes process
//! execution, statistics and result sinks; those live in `sweep_runner`.
//!
//! ```
//! use sweep_core::{ParameterEnumerator, RepeatPermuteCombinator};
//!
//! let mut combinator =
//!     RepeatPermuteCombinator::new(vec![3], vec![10000, 7500], vec![20000], 2).unwrap();
//! assert!(combinator.has_next());
//! let first = combinator.next().unwrap();
//! assert_eq!((first.participants(), first.bins()), (3, 10000));
//! assert_eq!(combinator.len(), 3);
//! ```

pub mod combination;
pub mod combinator;
pub mod config;
pub mod error;
pub mod sampling;

pub use combination::{Combination, Dimensions};
pub use combinator::{EnumerationStrategyKind, ParameterEnumerator, RepeatPermuteCombinator};
pub use config::{EnumerationStrategy, SweepConfig};
pub use error::ConfigError;
pub use sampling::RandomSampleCombinator;
