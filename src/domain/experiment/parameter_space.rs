use crate::domain::errors::EvaluationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::fingerprint::{canonical_json, fingerprint};

/// One concrete assignment of hyperparameters (name -> single value).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(Map<String, Value>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Canonical JSON text, as persisted in the registry.
    pub fn to_json(&self) -> String {
        canonical_json(&Value::Object(self.0.clone()))
    }

    pub fn fingerprint(&self, seed: Option<u64>) -> String {
        fingerprint(self, seed)
    }

    /// Reads a numeric parameter. `Ok(None)` when absent.
    pub fn get_f64(&self, name: &str) -> Result<Option<f64>, EvaluationError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| invalid(name, value, "expected a number")),
        }
    }

    /// Reads a non-negative integer parameter. `Ok(None)` when absent.
    pub fn get_usize(&self, name: &str) -> Result<Option<usize>, EvaluationError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|v| usize::try_from(v).ok())
                .map(Some)
                .ok_or_else(|| invalid(name, value, "expected a non-negative integer")),
        }
    }

    /// Reads a boolean parameter. `Ok(None)` when absent.
    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, EvaluationError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| invalid(name, value, "expected a boolean")),
        }
    }
}

fn invalid(name: &str, value: &Value, expected: &str) -> EvaluationError {
    EvaluationError::InvalidParameter {
        name: name.to_string(),
        reason: format!("{}, got {}", expected, value),
    }
}

impl From<Map<String, Value>> for ParameterSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Candidate values per hyperparameter, expanded by full Cartesian product.
///
/// Parameters are visited in name order; the last name varies fastest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSpace(BTreeMap<String, Vec<Value>>);

impl ParameterSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of a parameter and its candidates.
    pub fn with<V: Into<Value>>(mut self, name: impl Into<String>, values: Vec<V>) -> Self {
        self.0
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn candidates(&self, name: &str) -> Option<&[Value]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Number of combinations `combinations()` will produce.
    pub fn combination_count(&self) -> usize {
        self.0.values().map(Vec::len).product()
    }

    /// Expands the space into every parameter assignment.
    ///
    /// An empty space yields a single empty assignment; a parameter without
    /// candidates yields none.
    pub fn combinations(&self) -> Vec<ParameterSet> {
        let mut combos = vec![ParameterSet::new()];

        for (name, candidates) in &self.0 {
            let mut next = Vec::with_capacity(combos.len() * candidates.len());
            for combo in &combos {
                for value in candidates {
                    let mut extended = combo.clone();
                    extended.insert(name.clone(), value.clone());
                    next.push(extended);
                }
            }
            combos = next;
        }

        combos
    }
}
