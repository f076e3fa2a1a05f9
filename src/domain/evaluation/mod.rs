// Cross-validation primitives: labels, datasets and scores
pub mod metrics;
pub mod types;

pub use metrics::{accuracy, f1_macro};
pub use types::{Dataset, EvaluationKind, Label};
