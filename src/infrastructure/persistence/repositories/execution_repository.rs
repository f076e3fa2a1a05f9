use crate::domain::experiment::{Execution, NewExecution};
use crate::domain::repositories::ExecutionRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub struct SqliteExecutionRepository {
    pool: SqlitePool,
}

impl SqliteExecutionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(crate) fn timestamp_from_db(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .with_context(|| format!("Invalid stored timestamp: {}", millis))
}

pub(crate) fn fold_from_db(fold: i64) -> Result<usize> {
    usize::try_from(fold).with_context(|| format!("Invalid stored fold index: {}", fold))
}

fn execution_from_row(row: &SqliteRow) -> Result<Execution> {
    let statistics_json: String = row.try_get("statistics_json")?;

    Ok(Execution {
        id: row.try_get("id")?,
        model_id: row.try_get("model_id")?,
        fold: fold_from_db(row.try_get("fold")?)?,
        accuracy: row.try_get("accuracy")?,
        f1_macro: row.try_get("f1_macro")?,
        processing_time: row.try_get("processing_time")?,
        statistics: serde_json::from_str(&statistics_json)
            .context("Failed to parse stored execution statistics")?,
        executed_at: timestamp_from_db(row.try_get("executed_at")?)?,
    })
}

#[async_trait]
impl ExecutionRepository for SqliteExecutionRepository {
    async fn record(&self, execution: &NewExecution) -> Result<i64> {
        let fold = i64::try_from(execution.fold).context("Fold index overflow")?;

        let result = sqlx::query(
            r#"
            INSERT INTO executions
            (model_id, fold, accuracy, f1_macro, processing_time, statistics_json, executed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(execution.model_id)
        .bind(fold)
        .bind(execution.accuracy)
        .bind(execution.f1_macro)
        .bind(execution.processing_time)
        .bind(execution.statistics.to_string())
        .bind(Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await
        .context("Failed to record execution")?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_model(&self, model_id: i64) -> Result<Vec<Execution>> {
        let rows = sqlx::query("SELECT * FROM executions WHERE model_id = ? ORDER BY fold, id")
            .bind(model_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(execution_from_row).collect()
    }

    async fn count_by_model(&self, model_id: i64) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM executions WHERE model_id = ?")
            .bind(model_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count as usize)
    }
}
