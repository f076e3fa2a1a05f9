//! Token-count argmax classifier for short product descriptions.
//!
//! Each class keeps counts of the tokens seen in its training descriptions.
//! A description is assigned to the class maximizing
//! `ln P(class) + Σ ln((count(token, class) + alpha) / (total(class) + alpha·|V|))`.

use crate::domain::errors::{DatasetError, EvaluationError};
use crate::domain::evaluation::Label;
use crate::domain::experiment::ParameterSet;
use crate::domain::ports::Classifier;
use anyhow::{Result, bail};
use std::collections::{BTreeMap, HashMap, HashSet};

const PARAM_ALPHA: &str = "alpha";
const PARAM_LOWERCASE: &str = "lowercase";
const PARAM_MIN_TOKEN_LEN: &str = "min_token_len";

#[derive(Debug, Default, Clone)]
struct ClassModel {
    token_counts: HashMap<String, usize>,
    total_tokens: usize,
    documents: usize,
}

#[derive(Debug, Clone)]
pub struct TokenArgmaxClassifier {
    alpha: f64,
    lowercase: bool,
    min_token_len: usize,
    // BTreeMap keeps tie-breaking deterministic
    classes: BTreeMap<Label, ClassModel>,
    vocabulary: HashSet<String>,
    documents: usize,
}

impl Default for TokenArgmaxClassifier {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            lowercase: true,
            min_token_len: 1,
            classes: BTreeMap::new(),
            vocabulary: HashSet::new(),
            documents: 0,
        }
    }
}

impl TokenArgmaxClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.chars().count() >= self.min_token_len.max(1))
            .map(|t| {
                if self.lowercase {
                    t.to_lowercase()
                } else {
                    t.to_string()
                }
            })
            .collect()
    }

    fn predict_one(&self, text: &str) -> Option<&Label> {
        let tokens = self.tokenize(text);
        let vocab = self.vocabulary.len() as f64;

        let mut best: Option<(&Label, f64)> = None;
        for (label, model) in &self.classes {
            let prior = (model.documents as f64 / self.documents as f64).ln();
            let denom = model.total_tokens as f64 + self.alpha * vocab;
            let likelihood: f64 = tokens
                .iter()
                .map(|t| {
                    let count = model.token_counts.get(t).copied().unwrap_or(0) as f64;
                    ((count + self.alpha) / denom).ln()
                })
                .sum();
            let score = prior + likelihood;

            if best.is_none_or(|(_, s)| score > s) {
                best = Some((label, score));
            }
        }

        best.map(|(label, _)| label)
    }
}

impl Classifier for TokenArgmaxClassifier {
    type Sample = String;

    fn set_params(&mut self, params: &ParameterSet) -> Result<()> {
        for (name, _) in params.iter() {
            if ![PARAM_ALPHA, PARAM_LOWERCASE, PARAM_MIN_TOKEN_LEN].contains(&name.as_str()) {
                return Err(EvaluationError::InvalidParameter {
                    name: name.clone(),
                    reason: "unknown parameter for TokenArgmaxClassifier".to_string(),
                }
                .into());
            }
        }

        if let Some(alpha) = params.get_f64(PARAM_ALPHA)? {
            if !(alpha > 0.0 && alpha.is_finite()) {
                return Err(EvaluationError::InvalidParameter {
                    name: PARAM_ALPHA.to_string(),
                    reason: format!("must be a positive number, got {}", alpha),
                }
                .into());
            }
            self.alpha = alpha;
        }
        if let Some(lowercase) = params.get_bool(PARAM_LOWERCASE)? {
            self.lowercase = lowercase;
        }
        if let Some(min_len) = params.get_usize(PARAM_MIN_TOKEN_LEN)? {
            self.min_token_len = min_len;
        }
        Ok(())
    }

    fn fit(&mut self, x: &[String], y: &[Label]) -> Result<()> {
        if x.len() != y.len() {
            return Err(EvaluationError::LengthMismatch {
                left: y.len(),
                right: x.len(),
            }
            .into());
        }
        if x.is_empty() {
            return Err(DatasetError::Empty {
                reason: "no training samples".to_string(),
            }
            .into());
        }

        self.classes.clear();
        self.vocabulary.clear();
        self.documents = x.len();

        for (text, label) in x.iter().zip(y) {
            let tokens = self.tokenize(text);
            let model = self.classes.entry(label.clone()).or_default();
            model.documents += 1;
            model.total_tokens += tokens.len();
            for token in tokens {
                *model.token_counts.entry(token.clone()).or_insert(0) += 1;
                self.vocabulary.insert(token);
            }
        }

        Ok(())
    }

    fn predict(&self, x: &[String]) -> Result<Vec<Label>> {
        if !self.is_fitted() {
            bail!("TokenArgmaxClassifier must be fitted before predicting");
        }

        x.iter()
            .map(|text| {
                self.predict_one(text)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("No class available for prediction"))
            })
            .collect()
    }
}
