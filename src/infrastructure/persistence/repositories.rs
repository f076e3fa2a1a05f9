mod execution_repository;
mod experiment_repository;
mod model_variation_repository;
mod results_repository;

pub use execution_repository::SqliteExecutionRepository;
pub use experiment_repository::SqliteExperimentRepository;
pub use model_variation_repository::SqliteModelVariationRepository;
pub use results_repository::SqliteResultsRepository;
