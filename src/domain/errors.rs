use std::path::PathBuf;
use thiserror::Error;

/// Errors related to loading tabular datasets
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Column '{column}' not found (available: {available:?})")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("Dataset is empty: {reason}")]
    Empty { reason: String },
}

/// Errors related to cross-validation and scoring
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Invalid number of folds: {folds} (must be at least 2)")]
    InvalidFolds { folds: usize },

    #[error("Cannot split {samples} samples into {folds} folds")]
    NotEnoughSamples { samples: usize, folds: usize },

    #[error("Length mismatch: {left} truth labels vs {right} predictions")]
    LengthMismatch { left: usize, right: usize },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}
