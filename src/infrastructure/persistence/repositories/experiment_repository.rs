use crate::domain::experiment::Experiment;
use crate::domain::repositories::ExperimentRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

pub struct SqliteExperimentRepository {
    pool: SqlitePool,
}

impl SqliteExperimentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn experiment_from_row(row: &SqliteRow) -> Result<Experiment> {
    Ok(Experiment {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        project: row.try_get("project")?,
    })
}

#[async_trait]
impl ExperimentRepository for SqliteExperimentRepository {
    async fn get_or_create(&self, name: &str, project: &str) -> Result<i64> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO experiments (name, project)
            VALUES (?, ?)
            ON CONFLICT(name, project) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(project)
        .execute(&self.pool)
        .await
        .context("Failed to register experiment")?;

        // The insert may have been a no-op, so always resolve the id by key
        let id: i64 = sqlx::query_scalar("SELECT id FROM experiments WHERE name = ? AND project = ?")
            .bind(name)
            .bind(project)
            .fetch_one(&self.pool)
            .await
            .context("Failed to resolve experiment id")?;

        if inserted.rows_affected() > 0 {
            info!("Registered experiment '{}' in project '{}' (id={})", name, project, id);
        }

        Ok(id)
    }

    async fn find(&self, name: &str, project: &str) -> Result<Option<Experiment>> {
        let row = sqlx::query("SELECT * FROM experiments WHERE name = ? AND project = ?")
            .bind(name)
            .bind(project)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(experiment_from_row).transpose()
    }

    async fn find_by_project(&self, project: &str) -> Result<Vec<Experiment>> {
        let rows = sqlx::query("SELECT * FROM experiments WHERE project = ? ORDER BY id")
            .bind(project)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(experiment_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::database::Database;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let repo = SqliteExperimentRepository::new(db.pool.clone());

        let first = repo.get_or_create("baseline", "retail").await.unwrap();
        let second = repo.get_or_create("baseline", "retail").await.unwrap();
        let other_project = repo.get_or_create("baseline", "grocery").await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other_project);
        assert_eq!(repo.find_by_project("retail").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_missing_experiment() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let repo = SqliteExperimentRepository::new(db.pool.clone());

        assert!(repo.find("nope", "retail").await.unwrap().is_none());
    }
}
