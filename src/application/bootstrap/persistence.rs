use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::domain::repositories::{
    ExecutionRepository, ExperimentRepository, ModelVariationRepository, ResultsRepository,
};
use crate::infrastructure::persistence::database::Database;
use crate::infrastructure::persistence::repositories::{
    SqliteExecutionRepository, SqliteExperimentRepository, SqliteModelVariationRepository,
    SqliteResultsRepository,
};

pub struct PersistenceHandle {
    pub db: Database,
    pub experiment_repository: Arc<dyn ExperimentRepository>,
    pub model_repository: Arc<dyn ModelVariationRepository>,
    pub execution_repository: Arc<dyn ExecutionRepository>,
    pub results_repository: Arc<dyn ResultsRepository>,
}

impl PersistenceHandle {
    pub fn from_database(db: Database) -> Self {
        let experiment_repository = Arc::new(SqliteExperimentRepository::new(db.pool.clone()));
        let model_repository = Arc::new(SqliteModelVariationRepository::new(db.pool.clone()));
        let execution_repository = Arc::new(SqliteExecutionRepository::new(db.pool.clone()));
        let results_repository = Arc::new(SqliteResultsRepository::new(db.pool.clone()));

        Self {
            db,
            experiment_repository,
            model_repository,
            execution_repository,
            results_repository,
        }
    }
}

pub struct PersistenceBootstrap;

impl PersistenceBootstrap {
    pub async fn init(db_url: &str) -> Result<PersistenceHandle> {
        info!("Initializing Database at {}", db_url);

        let db = Database::new(db_url)
            .await
            .context("Failed to initialize database")?;

        Ok(PersistenceHandle::from_database(db))
    }
}
