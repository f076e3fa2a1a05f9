use crate::domain::errors::EvaluationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target value of a supervised sample.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Class(i64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Class(c) => write!(f, "{}", c),
            Label::Text(t) => f.write_str(t),
        }
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Class(value)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Text(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Text(value)
    }
}

/// How predictions are obtained from a classifier and compared to the truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EvaluationKind {
    /// `predict` output compared to the labels as-is
    #[default]
    Numeric,
    /// `predict_text` output compared to the labels rendered as strings
    Argmax,
}

impl fmt::Display for EvaluationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationKind::Numeric => write!(f, "numeric"),
            EvaluationKind::Argmax => write!(f, "argmax"),
        }
    }
}

impl FromStr for EvaluationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numeric" => Ok(EvaluationKind::Numeric),
            "argmax" => Ok(EvaluationKind::Argmax),
            _ => anyhow::bail!("Invalid evaluation kind: {}. Must be 'numeric' or 'argmax'", s),
        }
    }
}

/// Samples paired with their targets.
#[derive(Debug, Clone)]
pub struct Dataset<X> {
    features: Vec<X>,
    targets: Vec<Label>,
}

impl<X> Dataset<X> {
    pub fn new(features: Vec<X>, targets: Vec<Label>) -> Result<Self, EvaluationError> {
        if features.len() != targets.len() {
            return Err(EvaluationError::LengthMismatch {
                left: targets.len(),
                right: features.len(),
            });
        }
        Ok(Self { features, targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn features(&self) -> &[X] {
        &self.features
    }

    pub fn targets(&self) -> &[Label] {
        &self.targets
    }
}

impl<X: Clone> Dataset<X> {
    /// Gathers the samples at `indices`, in order.
    pub fn select(&self, indices: &[usize]) -> (Vec<X>, Vec<Label>) {
        indices
            .iter()
            .map(|&i| (self.features[i].clone(), self.targets[i].clone()))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_display() {
        assert_eq!(Label::Class(3).to_string(), "3");
        assert_eq!(Label::from("LEITE").to_string(), "LEITE");
    }

    #[test]
    fn test_evaluation_kind_parsing() {
        assert_eq!(
            "ARGMAX".parse::<EvaluationKind>().unwrap(),
            EvaluationKind::Argmax
        );
        assert_eq!(
            "numeric".parse::<EvaluationKind>().unwrap(),
            EvaluationKind::Numeric
        );
        assert!("vectorize".parse::<EvaluationKind>().is_err());
    }

    #[test]
    fn test_dataset_rejects_length_mismatch() {
        let result = Dataset::new(vec![1.0, 2.0], vec![Label::Class(0)]);
        assert!(matches!(
            result,
            Err(EvaluationError::LengthMismatch { left: 1, right: 2 })
        ));
    }

    #[test]
    fn test_dataset_select() {
        let data = Dataset::new(
            vec!["a", "b", "c"],
            vec![Label::Class(0), Label::Class(1), Label::Class(2)],
        )
        .unwrap();

        let (x, y) = data.select(&[2, 0]);
        assert_eq!(x, vec!["c", "a"]);
        assert_eq!(y, vec![Label::Class(2), Label::Class(0)]);
    }
}
