//! Storage configuration parsing from environment variables.

/// Where experiments are stored and datasets are kept
#[derive(Debug, Clone)]
pub struct StorageEnvConfig {
    pub project: String,
    pub database_url: String,
    pub data_dir: String,
}

impl Default for StorageEnvConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl StorageEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let project = lookup("PRODCLASS_PROJECT")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "prodclass".to_string());
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| format!("sqlite://{}.db", project));

        Self {
            project,
            database_url,
            data_dir: lookup("PRODCLASS_DATA_DIR").unwrap_or_else(|| "data".to_string()),
        }
    }
}
