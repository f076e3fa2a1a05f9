// Built-in baseline classifiers
pub mod token_argmax;

pub use token_argmax::TokenArgmaxClassifier;
