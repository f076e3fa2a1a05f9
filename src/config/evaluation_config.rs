//! Evaluation defaults parsing from environment variables.

use anyhow::{Context, Result};

/// Cross-validation defaults
#[derive(Debug, Clone)]
pub struct EvaluationEnvConfig {
    pub folds: usize,
    pub seed: Option<u64>,
}

impl Default for EvaluationEnvConfig {
    fn default() -> Self {
        Self {
            folds: 5,
            seed: None,
        }
    }
}

impl EvaluationEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let folds = match lookup("PRODCLASS_FOLDS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid PRODCLASS_FOLDS: {}", raw))?,
            None => 5,
        };

        let seed = match lookup("PRODCLASS_SEED") {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid PRODCLASS_SEED: {}", raw))?,
            ),
            None => None,
        };

        Ok(Self { folds, seed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_config_parsing() {
        let config = EvaluationEnvConfig::from_lookup(|key| match key {
            "PRODCLASS_FOLDS" => Some("10".to_string()),
            "PRODCLASS_SEED" => Some("42".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.folds, 10);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_empty_seed_means_random() {
        let config = EvaluationEnvConfig::from_lookup(|key| {
            (key == "PRODCLASS_SEED").then(String::new)
        })
        .unwrap();
        assert_eq!(config.seed, None);
        assert_eq!(config.folds, 5);
    }
}
