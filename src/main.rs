//! prodclass command line
//!
//! Runs cross-validated parameter grids of the built-in product classifier
//! and reads recorded experiments back.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prodclass::application::classifiers::TokenArgmaxClassifier;
use prodclass::application::evaluation::{EvaluationOptions, ExperimentManager, ResultsReporter};
use prodclass::config::{Config, load_grid};
use prodclass::domain::evaluation::EvaluationKind;
use prodclass::domain::experiment::ParameterSpace;
use prodclass::infrastructure::dataset::{LoadOptions, Table, load_delimited, load_named_dataset};
use prodclass::infrastructure::download::download_file;
use prodclass::infrastructure::observability::init_logging;
use std::path::Path;
use std::str::FromStr;
use tracing::{Level, info};

#[derive(Parser)]
#[command(author, version, about = "Product classification experiment tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cross-validate every parameter combination of a grid and record the folds
    Run {
        /// Dataset file, or a dataset name looked up in the data directory
        #[arg(short, long)]
        dataset: String,

        /// Column holding the product description
        #[arg(long, default_value = "nm_item")]
        feature: String,

        /// Column holding the class
        #[arg(long, default_value = "nm_product")]
        target: String,

        /// Experiment name
        #[arg(short, long)]
        experiment: String,

        /// TOML file with a [parameters] grid
        #[arg(long)]
        grid: Option<String>,

        /// Number of folds (defaults to PRODCLASS_FOLDS)
        #[arg(long)]
        folds: Option<usize>,

        /// Shuffle seed (defaults to PRODCLASS_SEED)
        #[arg(long)]
        seed: Option<u64>,

        /// How predictions are compared to labels (numeric, argmax)
        #[arg(long, default_value = "numeric")]
        kind: String,
    },
    /// Print every recorded fold of an experiment
    Results {
        /// Experiment name
        #[arg(short, long)]
        experiment: String,

        /// Export file (.json or .csv)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Rank the model variations of an experiment by mean macro-F1
    Summary {
        /// Experiment name
        #[arg(short, long)]
        experiment: String,
    },
    /// Download a file unless it is already present
    Download {
        /// Source URL
        #[arg(short, long)]
        url: String,

        /// Destination folder (defaults to PRODCLASS_DATA_DIR)
        #[arg(short, long)]
        dest: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging(Level::INFO);

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let reporter = ResultsReporter::default();

    match cli.command {
        Commands::Run {
            dataset,
            feature,
            target,
            experiment,
            grid,
            folds,
            seed,
            kind,
        } => {
            let options = EvaluationOptions {
                folds: folds.unwrap_or(config.evaluation.folds),
                seed: seed.or(config.evaluation.seed),
                kind: EvaluationKind::from_str(&kind)?,
            };

            let space = match grid {
                Some(path) => {
                    info!("Loading parameter grid from: {}", path);
                    load_grid(Path::new(&path))?
                }
                None => {
                    info!("Using default parameter grid");
                    ParameterSpace::new().with("alpha", vec![1.0])
                }
            };

            reporter.print_header(&experiment, config.project(), &options);
            reporter.print_space_info(&space);

            let table = load_table(&dataset, &config.storage.data_dir)?;
            let manager = ExperimentManager::open(config.project(), config.database_url()).await?;
            let mut classifier = TokenArgmaxClassifier::new();

            let summary = match options.kind {
                EvaluationKind::Numeric => {
                    let (data, classes) = table.to_class_dataset(&feature, &target)?;
                    info!("Loaded {} samples across {} classes", data.len(), classes.len());
                    manager
                        .run(&experiment, &mut classifier, &data, &space, &options)
                        .await?
                }
                EvaluationKind::Argmax => {
                    let data = table.to_dataset(&feature, &target)?;
                    info!("Loaded {} samples", data.len());
                    manager
                        .run(&experiment, &mut classifier, &data, &space, &options)
                        .await?
                }
            };

            reporter.print_run_summary(&summary);
            reporter.print_summary_table(&manager.summarize(&experiment).await?);
        }
        Commands::Results { experiment, output } => {
            let manager = ExperimentManager::open(config.project(), config.database_url()).await?;
            let results = manager.get_experiment_results(&experiment).await?;
            reporter.print_results_table(&results);

            if let Some(path) = output {
                reporter.export(&results, &path)?;
            }
        }
        Commands::Summary { experiment } => {
            let manager = ExperimentManager::open(config.project(), config.database_url()).await?;
            reporter.print_summary_table(&manager.summarize(&experiment).await?);
        }
        Commands::Download { url, dest } => {
            let dest = dest.unwrap_or_else(|| config.storage.data_dir.clone());
            let path = download_file(&url, &dest)
                .await
                .with_context(|| format!("Download of {} failed", url))?;
            println!("📁 {}", path.display());
        }
    }

    Ok(())
}

fn load_table(dataset: &str, data_dir: &str) -> Result<Table> {
    let path = Path::new(dataset);
    if path.is_file() {
        info!("Loading dataset file: {}", path.display());
        load_delimited(path, &LoadOptions::default())
    } else {
        info!("Loading named dataset '{}' from {}", dataset, data_dir);
        load_named_dataset(data_dir, dataset)
    }
}
