//! Repository Pattern Abstractions
//!
//! This module defines repository traits for the experiment registry,
//! enabling clean separation between the evaluation loop and storage.
//!
//! # Design
//!
//! - `ExperimentRepository`: named studies, unique per project
//! - `ModelVariationRepository`: hash-keyed parameter/seed registry
//! - `ExecutionRepository`: append-only per-fold results
//! - `ResultsRepository`: read-side join used for reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use prodclass::domain::repositories::ExperimentRepository;
//! use prodclass::infrastructure::persistence::database::Database;
//! use prodclass::infrastructure::persistence::repositories::SqliteExperimentRepository;
//!
//! # async {
//! let db = Database::new("sqlite://prodclass.db").await?;
//! let repo = SqliteExperimentRepository::new(db.pool.clone());
//! let id = repo.get_or_create("baseline", "prodclass").await?;
//! # anyhow::Ok(())
//! # };
//! ```

use crate::domain::experiment::{
    Execution, Experiment, ExperimentResult, ModelVariation, NewExecution, ParameterSet,
};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ExperimentRepository: Send + Sync {
    /// Returns the id of `(name, project)`, inserting it on first use
    async fn get_or_create(&self, name: &str, project: &str) -> Result<i64>;

    async fn find(&self, name: &str, project: &str) -> Result<Option<Experiment>>;

    async fn find_by_project(&self, project: &str) -> Result<Vec<Experiment>>;
}

#[async_trait]
pub trait ModelVariationRepository: Send + Sync {
    /// Returns the id of the variation with the same fingerprint under
    /// `experiment_id`, inserting it on first use
    async fn get_or_create(
        &self,
        experiment_id: i64,
        parameters: &ParameterSet,
        seed: Option<u64>,
    ) -> Result<i64>;

    async fn find_by_hash(&self, experiment_id: i64, hash: &str) -> Result<Option<ModelVariation>>;

    async fn find_by_experiment(&self, experiment_id: i64) -> Result<Vec<ModelVariation>>;
}

#[async_trait]
pub trait ExecutionRepository: Send + Sync {
    /// Append one fold result
    async fn record(&self, execution: &NewExecution) -> Result<i64>;

    async fn find_by_model(&self, model_id: i64) -> Result<Vec<Execution>>;

    async fn count_by_model(&self, model_id: i64) -> Result<usize>;
}

#[async_trait]
pub trait ResultsRepository: Send + Sync {
    /// Every execution of the named experiment, joined with its model
    /// variation. Empty when the experiment does not exist.
    async fn experiment_results(&self, name: &str, project: &str)
    -> Result<Vec<ExperimentResult>>;
}
