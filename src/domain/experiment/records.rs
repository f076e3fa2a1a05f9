use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::parameter_space::ParameterSet;

/// A named study within a project. `(name, project)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: i64,
    pub name: String,
    pub project: String,
}

/// A unique combination of hyperparameters and seed under one experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVariation {
    pub id: i64,
    pub experiment_id: i64,
    pub parameters: ParameterSet,
    pub seed: Option<u64>,
    pub hash: String,
}

/// Per-fold bookkeeping stored alongside the scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldStatistics {
    pub train_size: usize,
    pub test_size: usize,
}

impl FoldStatistics {
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "train_size": self.train_size,
            "test_size": self.test_size,
        })
    }
}

/// One cross-validation fold result, ready to be appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExecution {
    pub model_id: i64,
    pub fold: usize,
    pub accuracy: f64,
    pub f1_macro: f64,
    /// Seconds spent in fit + predict
    pub processing_time: f64,
    pub statistics: Value,
}

impl NewExecution {
    pub fn new(
        model_id: i64,
        fold: usize,
        accuracy: f64,
        f1_macro: f64,
        processing_time: f64,
    ) -> Self {
        Self {
            model_id,
            fold,
            accuracy,
            f1_macro,
            processing_time,
            statistics: Value::Object(Default::default()),
        }
    }

    pub fn with_statistics(mut self, statistics: Value) -> Self {
        self.statistics = statistics;
        self
    }
}

/// A persisted execution row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: i64,
    pub model_id: i64,
    pub fold: usize,
    pub accuracy: f64,
    pub f1_macro: f64,
    pub processing_time: f64,
    pub statistics: Value,
    pub executed_at: DateTime<Utc>,
}

/// One row of the experiment report: an execution joined with its model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub model_id: i64,
    pub parameters: ParameterSet,
    pub seed: Option<u64>,
    pub fold: usize,
    pub accuracy: f64,
    pub f1_macro: f64,
    pub processing_time: f64,
    pub executed_at: DateTime<Utc>,
    pub statistics: Value,
}

/// Fold scores aggregated per model variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_id: i64,
    pub parameters: ParameterSet,
    pub folds: usize,
    pub mean_accuracy: f64,
    pub std_accuracy: f64,
    pub mean_f1_macro: f64,
    pub std_f1_macro: f64,
    pub mean_processing_time: f64,
    pub std_processing_time: f64,
}
