use crate::domain::experiment::{ExperimentResult, ModelSummary};
use statrs::statistics::{Data, Distribution};

fn mean_and_std(values: Vec<f64>) -> (f64, f64) {
    // statrs uses the sample (n - 1) standard deviation
    let single = values.len() < 2;
    let data = Data::new(values);
    let mean = data.mean().unwrap_or(0.0);
    let std_dev = if single {
        0.0
    } else {
        data.std_dev().filter(|s| s.is_finite()).unwrap_or(0.0)
    };
    (mean, std_dev)
}

/// Groups fold rows by model variation and aggregates their scores.
///
/// Sorted by mean macro-F1 (descending), then model id.
pub fn summarize_results(results: &[ExperimentResult]) -> Vec<ModelSummary> {
    let mut model_ids: Vec<i64> = results.iter().map(|r| r.model_id).collect();
    model_ids.sort_unstable();
    model_ids.dedup();

    let mut summaries: Vec<ModelSummary> = model_ids
        .into_iter()
        .filter_map(|model_id| {
            let rows: Vec<&ExperimentResult> =
                results.iter().filter(|r| r.model_id == model_id).collect();
            let first = rows.first()?;

            let (mean_accuracy, std_accuracy) =
                mean_and_std(rows.iter().map(|r| r.accuracy).collect());
            let (mean_f1_macro, std_f1_macro) =
                mean_and_std(rows.iter().map(|r| r.f1_macro).collect());
            let (mean_processing_time, std_processing_time) =
                mean_and_std(rows.iter().map(|r| r.processing_time).collect());

            Some(ModelSummary {
                model_id,
                parameters: first.parameters.clone(),
                folds: rows.len(),
                mean_accuracy,
                std_accuracy,
                mean_f1_macro,
                std_f1_macro,
                mean_processing_time,
                std_processing_time,
            })
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.mean_f1_macro
            .partial_cmp(&a.mean_f1_macro)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.model_id.cmp(&b.model_id))
    });

    summaries
}
