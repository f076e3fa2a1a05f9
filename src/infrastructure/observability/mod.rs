//! Logging setup for the prodclass binary
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary (or to tests that want to see the output).

pub mod logging;

pub use logging::init_logging;
