//! Reporting utilities for experiment results.
//!
//! Provides formatted console output plus JSON and CSV export.

use crate::application::evaluation::manager::{EvaluationOptions, RunSummary};
use crate::domain::experiment::{ExperimentResult, ModelSummary, ParameterSpace};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Reporter for experiment results output.
pub struct ResultsReporter {
    output_dir: String,
}

impl ResultsReporter {
    /// Creates a new reporter with the given output directory.
    pub fn new(output_dir: &str) -> Self {
        Self {
            output_dir: output_dir.to_string(),
        }
    }

    /// Prints the header banner for an evaluation run.
    pub fn print_header(&self, experiment: &str, project: &str, options: &EvaluationOptions) {
        println!("{}", "=".repeat(80));
        println!("📊 CROSS-VALIDATION EXPERIMENT");
        println!("{}", "=".repeat(80));
        println!("Experiment:   {}", experiment);
        println!("Project:      {}", project);
        println!("Folds:        {}", options.folds);
        println!(
            "Seed:         {}",
            options
                .seed
                .map_or_else(|| "random".to_string(), |s| s.to_string())
        );
        println!("Kind:         {}", options.kind);
        println!("{}", "=".repeat(80));
    }

    /// Prints the parameter space configuration.
    pub fn print_space_info(&self, space: &ParameterSpace) {
        println!("\n🔧 Parameter Space:");
        for name in space.names() {
            let candidates = space.candidates(name).unwrap_or_default();
            let rendered: Vec<String> = candidates.iter().map(|v| v.to_string()).collect();
            println!("  {:<16} [{}]", name, rendered.join(", "));
        }
        println!(
            "\n🔢 Total combinations to test: {}",
            space.combination_count()
        );
    }

    pub fn print_run_summary(&self, summary: &RunSummary) {
        println!(
            "✅ Recorded {} executions across {} model variations (experiment id {})\n",
            summary.executions,
            summary.model_ids.len(),
            summary.experiment_id
        );
    }

    /// Prints a formatted table of per-fold results.
    pub fn print_results_table(&self, results: &[ExperimentResult]) {
        println!("\n{}", "=".repeat(80));
        println!("📋 RESULTS - {} executions", results.len());
        println!("{}", "=".repeat(80));

        if results.is_empty() {
            println!("No results recorded for this experiment.");
            println!("{}\n", "=".repeat(80));
            return;
        }

        println!(
            "{:<6} | {:<4} | {:>8} | {:>8} | {:>9} | {}",
            "Model", "Fold", "Accuracy", "F1Macro", "Time(s)", "Parameters"
        );
        println!("{}", "-".repeat(80));

        for result in results {
            println!(
                "{:<6} | {:<4} | {:>8.4} | {:>8.4} | {:>9.4} | {}",
                result.model_id,
                result.fold,
                result.accuracy,
                result.f1_macro,
                result.processing_time,
                result.parameters.to_json()
            );
        }

        println!("{}\n", "=".repeat(80));
    }

    /// Prints model variations ranked by mean macro-F1.
    pub fn print_summary_table(&self, summaries: &[ModelSummary]) {
        println!("\n{}", "=".repeat(80));
        println!("🏆 MODEL RANKING - {} variations", summaries.len());
        println!("{}", "=".repeat(80));

        println!(
            "{:<4} | {:<6} | {:<5} | {:>15} | {:>15} | {:>15} | {}",
            "#", "Model", "Folds", "Accuracy", "F1Macro", "Time(s)", "Parameters"
        );
        println!("{}", "-".repeat(100));

        for (i, summary) in summaries.iter().enumerate() {
            println!(
                "{:<4} | {:<6} | {:<5} | {:>6.4} ± {:<6.4} | {:>6.4} ± {:<6.4} | {:>6.4} ± {:<6.4} | {}",
                i + 1,
                summary.model_id,
                summary.folds,
                summary.mean_accuracy,
                summary.std_accuracy,
                summary.mean_f1_macro,
                summary.std_f1_macro,
                summary.mean_processing_time,
                summary.std_processing_time,
                summary.parameters.to_json()
            );
        }

        println!("{}\n", "=".repeat(80));
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let output_path = if filename.contains('/') || filename.contains('\\') {
            PathBuf::from(filename)
        } else {
            Path::new(&self.output_dir).join(filename)
        };

        // Ensure directory exists
        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {:?}", parent))?;
        }

        Ok(output_path)
    }

    /// Exports results to a JSON file.
    pub fn export_json(&self, results: &[ExperimentResult], filename: &str) -> Result<PathBuf> {
        let output_path = self.resolve(filename)?;

        let json_output =
            serde_json::to_string_pretty(results).context("Failed to serialize results to JSON")?;

        std::fs::write(&output_path, json_output)
            .context(format!("Failed to write results to {}", output_path.display()))?;

        println!("💾 Results saved to: {}", output_path.display());
        Ok(output_path)
    }

    /// Exports results to a `;`-delimited CSV file.
    pub fn export_csv(&self, results: &[ExperimentResult], filename: &str) -> Result<PathBuf> {
        let output_path = self.resolve(filename)?;

        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_path(&output_path)
            .context(format!("Failed to create {}", output_path.display()))?;

        wtr.write_record([
            "model_id",
            "parameters",
            "seed",
            "fold",
            "accuracy",
            "f1_macro",
            "processing_time",
            "executed_at",
            "statistics",
        ])?;

        for result in results {
            wtr.write_record([
                result.model_id.to_string(),
                result.parameters.to_json(),
                result.seed.map(|s| s.to_string()).unwrap_or_default(),
                result.fold.to_string(),
                result.accuracy.to_string(),
                result.f1_macro.to_string(),
                result.processing_time.to_string(),
                result.executed_at.to_rfc3339(),
                result.statistics.to_string(),
            ])?;
        }
        wtr.flush()?;

        println!("💾 Results saved to: {}", output_path.display());
        Ok(output_path)
    }

    /// Chooses JSON or CSV export from the file extension.
    pub fn export(&self, results: &[ExperimentResult], filename: &str) -> Result<PathBuf> {
        if filename.to_lowercase().ends_with(".csv") {
            self.export_csv(results, filename)
        } else {
            self.export_json(results, filename)
        }
    }
}

impl Default for ResultsReporter {
    fn default() -> Self {
        Self::new(".")
    }
}
