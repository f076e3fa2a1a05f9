use crate::domain::experiment::{ExperimentResult, ParameterSet};
use crate::domain::repositories::ResultsRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::execution_repository::{fold_from_db, timestamp_from_db};
use super::model_variation_repository::seed_from_db;

pub struct SqliteResultsRepository {
    pool: SqlitePool,
}

impl SqliteResultsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultsRepository for SqliteResultsRepository {
    async fn experiment_results(
        &self,
        name: &str,
        project: &str,
    ) -> Result<Vec<ExperimentResult>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id AS model_id, m.parameters_json, m.seed,
                   e.fold, e.accuracy, e.f1_macro, e.processing_time,
                   e.executed_at, e.statistics_json
            FROM executions e
            JOIN model_variations m ON e.model_id = m.id
            JOIN experiments x ON m.experiment_id = x.id
            WHERE x.name = ? AND x.project = ?
            ORDER BY m.id, e.fold, e.id
            "#,
        )
        .bind(name)
        .bind(project)
        .fetch_all(&self.pool)
        .await
        .context("Failed to query experiment results")?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let parameters_json: String = row.try_get("parameters_json")?;
            let statistics_json: String = row.try_get("statistics_json")?;

            results.push(ExperimentResult {
                model_id: row.try_get("model_id")?,
                parameters: serde_json::from_str::<ParameterSet>(&parameters_json)
                    .context("Failed to parse stored model parameters")?,
                seed: seed_from_db(row.try_get("seed")?)?,
                fold: fold_from_db(row.try_get("fold")?)?,
                accuracy: row.try_get("accuracy")?,
                f1_macro: row.try_get("f1_macro")?,
                processing_time: row.try_get("processing_time")?,
                executed_at: timestamp_from_db(row.try_get("executed_at")?)?,
                statistics: serde_json::from_str(&statistics_json)
                    .context("Failed to parse stored execution statistics")?,
            });
        }
        Ok(results)
    }
}
