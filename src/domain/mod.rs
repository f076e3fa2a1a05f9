// Cross-validation domain (labels, datasets, scores)
pub mod evaluation;

// Experiment registry domain
pub mod experiment;

// Port interfaces
pub mod ports;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
