//! Experiment registry domain
//!
//! ```text
//! Experiment (1) ──< ModelVariation (N) ──< Execution (N, one per fold)
//! ```
//!
//! Model variations are keyed by a fingerprint of their parameters and seed,
//! so registering the same configuration twice resolves to the same row.

pub mod fingerprint;
pub mod parameter_space;
pub mod records;

pub use fingerprint::{canonical_json, fingerprint};
pub use parameter_space::{ParameterSet, ParameterSpace};
pub use records::{
    Execution, Experiment, ExperimentResult, FoldStatistics, ModelSummary, ModelVariation,
    NewExecution,
};
