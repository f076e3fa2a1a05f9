// Repository wiring
pub mod bootstrap;

// Built-in baseline classifiers
pub mod classifiers;

// Cross-validated evaluation and reporting
pub mod evaluation;
