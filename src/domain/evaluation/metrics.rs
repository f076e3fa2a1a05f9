//! Classification scores computed per fold.

use crate::domain::errors::EvaluationError;
use std::collections::HashMap;
use std::hash::Hash;

fn check_lengths<T>(truth: &[T], predicted: &[T]) -> Result<(), EvaluationError> {
    if truth.len() != predicted.len() {
        return Err(EvaluationError::LengthMismatch {
            left: truth.len(),
            right: predicted.len(),
        });
    }
    Ok(())
}

/// Fraction of predictions equal to the truth. 0.0 for empty input.
pub fn accuracy<T: PartialEq>(truth: &[T], predicted: &[T]) -> Result<f64, EvaluationError> {
    check_lengths(truth, predicted)?;
    if truth.is_empty() {
        return Ok(0.0);
    }

    let correct = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / truth.len() as f64)
}

#[derive(Default)]
struct ClassCounts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

/// Unweighted mean of per-class F1 over every label seen in either input.
///
/// Per class, `F1 = 2TP / (2TP + FP + FN)`. 0.0 for empty input.
pub fn f1_macro<T: Eq + Hash>(truth: &[T], predicted: &[T]) -> Result<f64, EvaluationError> {
    check_lengths(truth, predicted)?;
    if truth.is_empty() {
        return Ok(0.0);
    }

    let mut counts: HashMap<&T, ClassCounts> = HashMap::new();
    for (t, p) in truth.iter().zip(predicted) {
        if t == p {
            counts.entry(t).or_default().tp += 1;
        } else {
            counts.entry(t).or_default().fn_ += 1;
            counts.entry(p).or_default().fp += 1;
        }
    }

    let sum: f64 = counts
        .values()
        .map(|c| {
            let denom = 2 * c.tp + c.fp + c.fn_;
            if denom == 0 {
                0.0
            } else {
                (2 * c.tp) as f64 / denom as f64
            }
        })
        .sum();

    Ok(sum / counts.len() as f64)
}
