use anyhow::{Result, bail};
use prodclass::application::bootstrap::{PersistenceBootstrap, PersistenceHandle};
use prodclass::application::classifiers::TokenArgmaxClassifier;
use prodclass::application::evaluation::{EvaluationOptions, ExperimentManager};
use prodclass::domain::evaluation::{Dataset, EvaluationKind, Label};
use prodclass::domain::experiment::{NewExecution, ParameterSet, ParameterSpace};
use prodclass::domain::ports::Classifier;
use serde_json::json;

/// Predicts class 1 above a threshold `C`, class 0 otherwise.
#[derive(Default)]
struct ThresholdClassifier {
    threshold: f64,
    fitted: bool,
}

impl Classifier for ThresholdClassifier {
    type Sample = f64;

    fn set_params(&mut self, params: &ParameterSet) -> Result<()> {
        self.threshold = params.get_f64("C")?.unwrap_or(0.0);
        Ok(())
    }

    fn fit(&mut self, _x: &[f64], _y: &[Label]) -> Result<()> {
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, x: &[f64]) -> Result<Vec<Label>> {
        if !self.fitted {
            bail!("not fitted");
        }
        Ok(x.iter()
            .map(|v| Label::Class(i64::from(*v > self.threshold)))
            .collect())
    }
}

struct FailingClassifier;

impl Classifier for FailingClassifier {
    type Sample = f64;

    fn set_params(&mut self, _params: &ParameterSet) -> Result<()> {
        Ok(())
    }

    fn fit(&mut self, _x: &[f64], _y: &[Label]) -> Result<()> {
        bail!("training diverged")
    }

    fn predict(&self, _x: &[f64]) -> Result<Vec<Label>> {
        Ok(Vec::new())
    }
}

async fn setup() -> (ExperimentManager, PersistenceHandle) {
    let handle = PersistenceBootstrap::init("sqlite::memory:").await.unwrap();
    let manager = ExperimentManager::new("test-project", &handle);
    (manager, handle)
}

fn numeric_dataset(n: usize) -> Dataset<f64> {
    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let y: Vec<Label> = (0..n)
        .map(|i| Label::Class(i64::from(i >= n / 2)))
        .collect();
    Dataset::new(x, y).unwrap()
}

fn options(folds: usize, seed: Option<u64>) -> EvaluationOptions {
    EvaluationOptions {
        folds,
        seed,
        kind: EvaluationKind::Numeric,
    }
}

#[tokio::test]
async fn test_experiment_registration_is_idempotent() {
    let (manager, handle) = setup().await;

    let first = manager.add_experiment("baseline").await.unwrap();
    let second = manager.add_experiment("baseline").await.unwrap();
    assert_eq!(first, second);

    let other = manager.add_experiment("tuned").await.unwrap();
    assert_ne!(first, other);

    let experiments = handle
        .experiment_repository
        .find_by_project("test-project")
        .await
        .unwrap();
    assert_eq!(experiments.len(), 2);
}

#[tokio::test]
async fn test_model_variation_registration_is_idempotent() {
    let (manager, handle) = setup().await;
    let experiment_id = manager.add_experiment("baseline").await.unwrap();

    let params: ParameterSet = [("C", json!(1)), ("kernel", json!("linear"))]
        .into_iter()
        .collect();
    let reordered: ParameterSet = [("kernel", json!("linear")), ("C", json!(1))]
        .into_iter()
        .collect();

    let a = manager
        .add_model_variation(experiment_id, &params, Some(42))
        .await
        .unwrap();
    let b = manager
        .add_model_variation(experiment_id, &reordered, Some(42))
        .await
        .unwrap();
    assert_eq!(a, b);

    let c = manager
        .add_model_variation(experiment_id, &params, Some(7))
        .await
        .unwrap();
    assert_ne!(a, c);

    let models = handle
        .model_repository
        .find_by_experiment(experiment_id)
        .await
        .unwrap();
    assert_eq!(models.len(), 2);
}

#[tokio::test]
async fn test_five_folds_record_five_executions() {
    let (manager, handle) = setup().await;
    let experiment_id = manager.add_experiment("folds").await.unwrap();
    let params: ParameterSet = [("C", json!(4.5))].into_iter().collect();
    let model_id = manager
        .add_model_variation(experiment_id, &params, Some(42))
        .await
        .unwrap();

    let mut classifier = ThresholdClassifier::default();
    let outcomes = manager
        .evaluate_model(
            model_id,
            &mut classifier,
            &numeric_dataset(10),
            &params,
            &options(5, Some(42)),
        )
        .await
        .unwrap();
    assert_eq!(outcomes.len(), 5);

    let executions = handle
        .execution_repository
        .find_by_model(model_id)
        .await
        .unwrap();
    assert_eq!(executions.len(), 5);
    for (fold, execution) in executions.iter().enumerate() {
        assert_eq!(execution.fold, fold);
        assert!(execution.processing_time >= 0.0);
        // threshold 4.5 separates the two halves perfectly
        assert!((execution.accuracy - 1.0).abs() < 1e-12);
        assert_eq!(execution.statistics["test_size"], 2);
        assert_eq!(execution.statistics["train_size"], 8);
    }
}

#[tokio::test]
async fn test_unknown_experiment_has_no_results() {
    let (manager, _handle) = setup().await;
    manager.add_experiment("known").await.unwrap();

    let results = manager.get_experiment_results("missing").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_grid_run_registers_one_variation_per_combination() {
    let (manager, handle) = setup().await;
    let space = ParameterSpace::new().with("C", vec![1, 10]);

    let mut classifier = ThresholdClassifier::default();
    let summary = manager
        .run(
            "grid",
            &mut classifier,
            &numeric_dataset(12),
            &space,
            &options(3, Some(42)),
        )
        .await
        .unwrap();

    assert_eq!(summary.model_ids.len(), 2);
    assert_eq!(summary.executions, 6);

    let models = handle
        .model_repository
        .find_by_experiment(summary.experiment_id)
        .await
        .unwrap();
    let mut grid: Vec<_> = models
        .iter()
        .map(|m| (m.parameters.get("C").cloned(), m.seed))
        .collect();
    grid.sort_by_key(|(c, _)| c.as_ref().and_then(|v| v.as_i64()));
    assert_eq!(
        grid,
        vec![(Some(json!(1)), Some(42)), (Some(json!(10)), Some(42))]
    );

    let results = manager.get_experiment_results("grid").await.unwrap();
    assert_eq!(results.len(), 6);
    assert!(results.windows(2).all(|w| {
        (w[0].model_id, w[0].fold) <= (w[1].model_id, w[1].fold)
    }));

    // Re-running the same grid reuses the variations and appends executions
    let again = manager
        .run(
            "grid",
            &mut classifier,
            &numeric_dataset(12),
            &space,
            &options(3, Some(42)),
        )
        .await
        .unwrap();
    assert_eq!(again.model_ids, summary.model_ids);
    assert_eq!(
        manager.get_experiment_results("grid").await.unwrap().len(),
        12
    );
}

#[tokio::test]
async fn test_summary_ranks_best_variation_first() {
    let (manager, _handle) = setup().await;
    let space = ParameterSpace::new().with("C", vec![100.0, 4.5]);

    let mut classifier = ThresholdClassifier::default();
    manager
        .run(
            "ranking",
            &mut classifier,
            &numeric_dataset(10),
            &space,
            &options(5, Some(1)),
        )
        .await
        .unwrap();

    let summaries = manager.summarize("ranking").await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].parameters.get("C"), Some(&json!(4.5)));
    assert_eq!(summaries[0].folds, 5);
    assert!(summaries[0].mean_f1_macro >= summaries[1].mean_f1_macro);
}

#[tokio::test]
async fn test_argmax_evaluation_with_text_classifier() {
    let (manager, _handle) = setup().await;
    let x: Vec<String> = [
        "leite integral", "leite desnatado", "leite em po", "leite condensado",
        "arroz branco", "arroz integral", "arroz parboilizado", "arroz arborio",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    let y: Vec<Label> = ["LEITE", "LEITE", "LEITE", "LEITE", "ARROZ", "ARROZ", "ARROZ", "ARROZ"]
        .into_iter()
        .map(Label::from)
        .collect();
    let dataset = Dataset::new(x, y).unwrap();

    let mut classifier = TokenArgmaxClassifier::new();
    let summary = manager
        .run(
            "argmax",
            &mut classifier,
            &dataset,
            &ParameterSpace::new().with("alpha", vec![0.5]),
            &EvaluationOptions {
                folds: 2,
                seed: Some(3),
                kind: EvaluationKind::Argmax,
            },
        )
        .await
        .unwrap();
    assert_eq!(summary.executions, 2);

    let results = manager.get_experiment_results("argmax").await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| (0.0..=1.0).contains(&r.accuracy) && (0.0..=1.0).contains(&r.f1_macro)));
}

#[tokio::test]
async fn test_classifier_failure_aborts_evaluation() {
    let (manager, handle) = setup().await;
    let experiment_id = manager.add_experiment("broken").await.unwrap();
    let params = ParameterSet::new();
    let model_id = manager
        .add_model_variation(experiment_id, &params, None)
        .await
        .unwrap();

    let err = manager
        .evaluate_model(
            model_id,
            &mut FailingClassifier,
            &numeric_dataset(10),
            &params,
            &options(5, None),
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("training diverged"));

    let count = handle
        .execution_repository
        .count_by_model(model_id)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_too_few_samples_for_folds() {
    let (manager, _handle) = setup().await;
    let mut classifier = ThresholdClassifier::default();

    let result = manager
        .run(
            "tiny",
            &mut classifier,
            &numeric_dataset(3),
            &ParameterSpace::new().with("C", vec![1]),
            &options(5, Some(42)),
        )
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_record_execution_directly() {
    let (manager, _handle) = setup().await;
    let experiment_id = manager.add_experiment("manual").await.unwrap();
    let model_id = manager
        .add_model_variation(experiment_id, &ParameterSet::new(), Some(0))
        .await
        .unwrap();

    manager
        .record_execution(&NewExecution::new(model_id, 0, 0.8, 0.75, 0.01))
        .await
        .unwrap();

    let results = manager.get_experiment_results("manual").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].seed, Some(0));
    assert!((results[0].f1_macro - 0.75).abs() < 1e-12);
    assert!(results[0].parameters.is_empty());
}
