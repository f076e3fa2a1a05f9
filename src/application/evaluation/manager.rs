//! Experiment manager: registers experiments and model variations, drives
//! k-fold evaluation of a caller-supplied classifier, and reads results back.

use crate::application::bootstrap::{PersistenceBootstrap, PersistenceHandle};
use crate::application::evaluation::kfold::{FoldSplit, KFold};
use crate::application::evaluation::summary::summarize_results;
use crate::domain::evaluation::{Dataset, EvaluationKind, Label, metrics};
use crate::domain::experiment::{
    ExperimentResult, FoldStatistics, ModelSummary, NewExecution, ParameterSet, ParameterSpace,
};
use crate::domain::ports::Classifier;
use crate::domain::repositories::{
    ExecutionRepository, ExperimentRepository, ModelVariationRepository, ResultsRepository,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Cross-validation settings shared by every parameter combination of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOptions {
    pub folds: usize,
    pub seed: Option<u64>,
    pub kind: EvaluationKind,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            folds: 5,
            seed: None,
            kind: EvaluationKind::Numeric,
        }
    }
}

/// Scores of one evaluated fold, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldOutcome {
    pub fold: usize,
    pub accuracy: f64,
    pub f1_macro: f64,
    pub processing_time: f64,
    pub statistics: FoldStatistics,
}

/// What a `run` registered and recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub experiment_id: i64,
    pub model_ids: Vec<i64>,
    pub executions: usize,
}

pub struct ExperimentManager {
    project: String,
    experiments: Arc<dyn ExperimentRepository>,
    models: Arc<dyn ModelVariationRepository>,
    executions: Arc<dyn ExecutionRepository>,
    results: Arc<dyn ResultsRepository>,
}

impl ExperimentManager {
    pub fn new(project: impl Into<String>, handle: &PersistenceHandle) -> Self {
        Self {
            project: project.into(),
            experiments: handle.experiment_repository.clone(),
            models: handle.model_repository.clone(),
            executions: handle.execution_repository.clone(),
            results: handle.results_repository.clone(),
        }
    }

    /// Opens (creating if needed) the database at `db_url` for `project`.
    pub async fn open(project: impl Into<String>, db_url: &str) -> Result<Self> {
        let handle = PersistenceBootstrap::init(db_url).await?;
        Ok(Self::new(project, &handle))
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns the experiment id, registering `(name, project)` on first use.
    pub async fn add_experiment(&self, name: &str) -> Result<i64> {
        self.experiments.get_or_create(name, &self.project).await
    }

    /// Returns the model variation id for `(parameters, seed)` under the
    /// experiment, registering it on first use.
    pub async fn add_model_variation(
        &self,
        experiment_id: i64,
        parameters: &ParameterSet,
        seed: Option<u64>,
    ) -> Result<i64> {
        self.models
            .get_or_create(experiment_id, parameters, seed)
            .await
    }

    /// Appends one fold result.
    pub async fn record_execution(&self, execution: &NewExecution) -> Result<i64> {
        self.executions.record(execution).await
    }

    pub fn generate_parameter_combinations(space: &ParameterSpace) -> Vec<ParameterSet> {
        space.combinations()
    }

    /// Cross-validates `classifier` configured with `parameters` and records
    /// one execution per fold under `model_id`.
    ///
    /// Errors from the classifier or the database abort the loop; folds
    /// already recorded are kept.
    pub async fn evaluate_model<C>(
        &self,
        model_id: i64,
        classifier: &mut C,
        dataset: &Dataset<C::Sample>,
        parameters: &ParameterSet,
        options: &EvaluationOptions,
    ) -> Result<Vec<FoldOutcome>>
    where
        C: Classifier,
        C::Sample: Clone,
    {
        classifier.set_params(parameters)?;

        let splits = KFold::new(options.folds)
            .with_shuffle(true)
            .with_seed(options.seed)
            .split(dataset.len())?;

        let mut outcomes = Vec::with_capacity(splits.len());
        for split in &splits {
            let outcome = evaluate_fold(classifier, dataset, split, options.kind)?;
            debug!(
                "Model {} fold {}: accuracy={:.4} f1_macro={:.4} time={:.3}s",
                model_id, outcome.fold, outcome.accuracy, outcome.f1_macro, outcome.processing_time
            );

            let execution = NewExecution::new(
                model_id,
                outcome.fold,
                outcome.accuracy,
                outcome.f1_macro,
                outcome.processing_time,
            )
            .with_statistics(outcome.statistics.to_value());
            self.record_execution(&execution).await?;

            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Evaluates every combination of `space` under the named experiment.
    pub async fn run<C>(
        &self,
        experiment_name: &str,
        classifier: &mut C,
        dataset: &Dataset<C::Sample>,
        space: &ParameterSpace,
        options: &EvaluationOptions,
    ) -> Result<RunSummary>
    where
        C: Classifier,
        C::Sample: Clone,
    {
        let experiment_id = self.add_experiment(experiment_name).await?;
        let combinations = Self::generate_parameter_combinations(space);
        let total = combinations.len();

        info!(
            "Experiment '{}': evaluating {} parameter combinations with {}-fold CV ({} kind)",
            experiment_name, total, options.folds, options.kind
        );

        let mut model_ids = Vec::with_capacity(total);
        let mut executions = 0;

        for (i, parameters) in combinations.iter().enumerate() {
            let model_id = self
                .add_model_variation(experiment_id, parameters, options.seed)
                .await?;

            let outcomes = self
                .evaluate_model(model_id, classifier, dataset, parameters, options)
                .await?;

            let mean_f1 =
                outcomes.iter().map(|o| o.f1_macro).sum::<f64>() / outcomes.len().max(1) as f64;
            info!(
                "Combination {}/{} {} -> model {} mean f1_macro={:.4}",
                i + 1,
                total,
                parameters.to_json(),
                model_id,
                mean_f1
            );

            executions += outcomes.len();
            model_ids.push(model_id);
        }

        Ok(RunSummary {
            experiment_id,
            model_ids,
            executions,
        })
    }

    /// Every recorded fold of the named experiment. Empty when unknown.
    pub async fn get_experiment_results(&self, experiment_name: &str) -> Result<Vec<ExperimentResult>> {
        self.results
            .experiment_results(experiment_name, &self.project)
            .await
    }

    /// Fold scores aggregated per model variation, best mean macro-F1 first.
    pub async fn summarize(&self, experiment_name: &str) -> Result<Vec<ModelSummary>> {
        let results = self.get_experiment_results(experiment_name).await?;
        Ok(summarize_results(&results))
    }
}

fn evaluate_fold<C>(
    classifier: &mut C,
    dataset: &Dataset<C::Sample>,
    split: &FoldSplit,
    kind: EvaluationKind,
) -> Result<FoldOutcome>
where
    C: Classifier,
    C::Sample: Clone,
{
    let (x_train, y_train) = dataset.select(&split.train);
    let (x_test, y_test) = dataset.select(&split.test);

    let started = Instant::now();
    classifier.fit(&x_train, &y_train)?;

    let (accuracy, f1_macro, elapsed) = match kind {
        EvaluationKind::Numeric => {
            let predicted: Vec<Label> = classifier.predict(&x_test)?;
            let elapsed = started.elapsed();
            (
                metrics::accuracy(&y_test, &predicted)?,
                metrics::f1_macro(&y_test, &predicted)?,
                elapsed,
            )
        }
        EvaluationKind::Argmax => {
            let predicted: Vec<String> = classifier.predict_text(&x_test)?;
            let elapsed = started.elapsed();
            let truth: Vec<String> = y_test.iter().map(Label::to_string).collect();
            (
                metrics::accuracy(&truth, &predicted)?,
                metrics::f1_macro(&truth, &predicted)?,
                elapsed,
            )
        }
    };

    Ok(FoldOutcome {
        fold: split.fold,
        accuracy,
        f1_macro,
        processing_time: elapsed.as_secs_f64(),
        statistics: FoldStatistics {
            train_size: split.train.len(),
            test_size: split.test.len(),
        },
    })
}
