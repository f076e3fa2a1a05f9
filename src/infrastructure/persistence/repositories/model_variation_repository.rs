use crate::domain::experiment::{ModelVariation, ParameterSet};
use crate::domain::repositories::ModelVariationRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

pub struct SqliteModelVariationRepository {
    pool: SqlitePool,
}

impl SqliteModelVariationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// SQLite integers are signed; seeds above `i64::MAX` are rejected.
pub(crate) fn seed_to_db(seed: Option<u64>) -> Result<Option<i64>> {
    seed.map(|s| i64::try_from(s).with_context(|| format!("Seed {} does not fit in INTEGER", s)))
        .transpose()
}

pub(crate) fn seed_from_db(seed: Option<i64>) -> Result<Option<u64>> {
    seed.map(|s| u64::try_from(s).with_context(|| format!("Stored seed {} is negative", s)))
        .transpose()
}

fn variation_from_row(row: &SqliteRow) -> Result<ModelVariation> {
    let parameters_json: String = row.try_get("parameters_json")?;
    let parameters: ParameterSet = serde_json::from_str(&parameters_json)
        .context("Failed to parse stored model parameters")?;

    Ok(ModelVariation {
        id: row.try_get("id")?,
        experiment_id: row.try_get("experiment_id")?,
        parameters,
        seed: seed_from_db(row.try_get("seed")?)?,
        hash: row.try_get("hash")?,
    })
}

#[async_trait]
impl ModelVariationRepository for SqliteModelVariationRepository {
    async fn get_or_create(
        &self,
        experiment_id: i64,
        parameters: &ParameterSet,
        seed: Option<u64>,
    ) -> Result<i64> {
        let hash = parameters.fingerprint(seed);

        if let Some(existing) = self.find_by_hash(experiment_id, &hash).await? {
            debug!("Model variation {} already registered (hash={})", existing.id, hash);
            return Ok(existing.id);
        }

        sqlx::query(
            r#"
            INSERT INTO model_variations (experiment_id, parameters_json, seed, hash)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(experiment_id, hash) DO NOTHING
            "#,
        )
        .bind(experiment_id)
        .bind(parameters.to_json())
        .bind(seed_to_db(seed)?)
        .bind(&hash)
        .execute(&self.pool)
        .await
        .context("Failed to register model variation")?;

        let id: i64 =
            sqlx::query_scalar("SELECT id FROM model_variations WHERE experiment_id = ? AND hash = ?")
                .bind(experiment_id)
                .bind(&hash)
                .fetch_one(&self.pool)
                .await
                .context("Failed to resolve model variation id")?;

        info!(
            "Registered model variation {} for experiment {}: {}",
            id,
            experiment_id,
            parameters.to_json()
        );
        Ok(id)
    }

    async fn find_by_hash(&self, experiment_id: i64, hash: &str) -> Result<Option<ModelVariation>> {
        let row = sqlx::query("SELECT * FROM model_variations WHERE experiment_id = ? AND hash = ?")
            .bind(experiment_id)
            .bind(hash)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(variation_from_row).transpose()
    }

    async fn find_by_experiment(&self, experiment_id: i64) -> Result<Vec<ModelVariation>> {
        let rows = sqlx::query("SELECT * FROM model_variations WHERE experiment_id = ? ORDER BY id")
            .bind(experiment_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(variation_from_row).collect()
    }
}
