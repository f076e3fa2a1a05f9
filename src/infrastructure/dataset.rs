//! Delimited-text dataset loading.
//!
//! Every column is read as text; callers pick the feature and target columns
//! and turn them into a [`Dataset`].

use crate::domain::errors::DatasetError;
use crate::domain::evaluation::{Dataset, Label};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Name of the bundled retail product dataset
pub const RETAIL_DATASET: &str = "retailpt-br";
const RETAIL_PRODUCT_COLUMN: &str = "nm_product";
const RETAIL_PROBLEM_LABEL: &str = "ITENS COM PROBLEMA";

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub has_headers: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            has_headers: true,
        }
    }
}

/// Rows of string cells with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, column: &str) -> Result<usize, DatasetError> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| DatasetError::MissingColumn {
                column: column.to_string(),
                available: self.headers.clone(),
            })
    }

    pub fn column(&self, column: &str) -> Result<Vec<&str>, DatasetError> {
        let idx = self.column_index(column)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(idx).map(String::as_str).unwrap_or_default())
            .collect())
    }

    /// Keeps the rows whose `column` value satisfies `keep`.
    pub fn filter_rows<F>(&self, column: &str, keep: F) -> Result<Table, DatasetError>
    where
        F: Fn(&str) -> bool,
    {
        let idx = self.column_index(column)?;
        let rows = self
            .rows
            .iter()
            .filter(|row| keep(row.get(idx).map(String::as_str).unwrap_or_default()))
            .cloned()
            .collect();
        Ok(Table::new(self.headers.clone(), rows))
    }

    /// Text features with the target column kept as text labels.
    pub fn to_dataset(&self, feature: &str, target: &str) -> Result<Dataset<String>> {
        let x: Vec<String> = self.column(feature)?.into_iter().map(str::to_string).collect();
        let y: Vec<Label> = self.column(target)?.into_iter().map(Label::from).collect();
        Ok(Dataset::new(x, y)?)
    }

    /// Text features with the target column encoded as class ids.
    ///
    /// Class ids follow the sorted order of the distinct target values; the
    /// returned vector maps id -> original value.
    pub fn to_class_dataset(
        &self,
        feature: &str,
        target: &str,
    ) -> Result<(Dataset<String>, Vec<String>)> {
        let x: Vec<String> = self.column(feature)?.into_iter().map(str::to_string).collect();
        let targets = self.column(target)?;

        let classes: BTreeMap<&str, i64> = {
            let mut distinct: Vec<&str> = targets.clone();
            distinct.sort_unstable();
            distinct.dedup();
            distinct
                .into_iter()
                .enumerate()
                .map(|(id, name)| (name, id as i64))
                .collect()
        };

        let y: Vec<Label> = targets.iter().map(|t| Label::Class(classes[t])).collect();
        let names: Vec<String> = classes.keys().map(|k| k.to_string()).collect();

        Ok((Dataset::new(x, y)?, names))
    }
}

/// Reads a delimited text file with a header row into a [`Table`].
pub fn load_delimited(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DatasetError::NotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .from_path(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

    let headers: Vec<String> = if options.has_headers {
        reader
            .headers()
            .context("Failed to read dataset header")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect()
    } else {
        Vec::new()
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("Malformed record in {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let headers = if headers.is_empty() {
        let width = rows.first().map_or(0, Vec::len);
        (0..width).map(|i| format!("column_{}", i)).collect()
    } else {
        headers
    };

    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(Table::new(headers, rows))
}

/// Loads `{dir}/{name}.csv` with the default `;` delimiter.
///
/// For the retail dataset, rows labelled as problem items are dropped.
pub fn load_named_dataset(dir: impl AsRef<Path>, name: &str) -> Result<Table> {
    let path = dir.as_ref().join(format!("{}.csv", name));
    let table = load_delimited(&path, &LoadOptions::default())?;

    if name == RETAIL_DATASET {
        let filtered = table.filter_rows(RETAIL_PRODUCT_COLUMN, |v| v != RETAIL_PROBLEM_LABEL)?;
        info!(
            "Dropped {} problem rows from {}",
            table.len() - filtered.len(),
            name
        );
        return Ok(filtered);
    }

    Ok(table)
}
