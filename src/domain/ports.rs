use crate::domain::evaluation::Label;
use crate::domain::experiment::ParameterSet;
use anyhow::Result;

/// Caller-supplied model driven by the evaluation loop.
///
/// The loop reconfigures the same instance for every parameter combination,
/// then calls `fit` once per fold before predicting the held-out samples.
pub trait Classifier {
    type Sample;

    /// Applies one parameter combination. Unknown names may be rejected.
    fn set_params(&mut self, params: &ParameterSet) -> Result<()>;

    fn fit(&mut self, x: &[Self::Sample], y: &[Label]) -> Result<()>;

    fn predict(&self, x: &[Self::Sample]) -> Result<Vec<Label>>;

    /// Predictions as class names, used by argmax-style evaluation.
    fn predict_text(&self, x: &[Self::Sample]) -> Result<Vec<String>> {
        Ok(self.predict(x)?.iter().map(Label::to_string).collect())
    }
}
