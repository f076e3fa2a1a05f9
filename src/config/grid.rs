//! Parameter grid files.
//!
//! ```toml
//! [parameters]
//! alpha = [0.1, 0.5, 1.0]
//! lowercase = [true]
//! ```

use crate::domain::experiment::ParameterSpace;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridFile {
    #[serde(default)]
    pub parameters: ParameterSpace,
}

impl GridFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse parameter grid")
    }
}

pub fn load_grid(path: &Path) -> Result<ParameterSpace> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read grid file {}", path.display()))?;
    let grid = GridFile::parse(&content)
        .with_context(|| format!("Invalid grid file {}", path.display()))?;
    Ok(grid.parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_grid() {
        let grid = GridFile::parse(
            r#"
            [parameters]
            alpha = [0.5, 1.0]
            lowercase = [true, false]
            "#,
        )
        .unwrap();

        assert_eq!(grid.parameters.combination_count(), 4);
        assert_eq!(
            grid.parameters.candidates("alpha"),
            Some(&[json!(0.5), json!(1.0)][..])
        );
    }

    #[test]
    fn test_missing_table_is_empty_space() {
        let grid = GridFile::parse("").unwrap();
        assert_eq!(grid.parameters.combinations().len(), 1);
    }

    #[test]
    fn test_missing_file() {
        assert!(load_grid(Path::new("/nonexistent/grid.toml")).is_err());
    }
}
