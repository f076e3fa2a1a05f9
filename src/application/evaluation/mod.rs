// Cross-validated evaluation of parameter grids and result reporting
pub mod kfold;
pub mod manager;
pub mod reporting;
pub mod summary;

pub use kfold::{FoldSplit, KFold};
pub use manager::{EvaluationOptions, ExperimentManager, FoldOutcome, RunSummary};
pub use reporting::ResultsReporter;
pub use summary::summarize_results;
