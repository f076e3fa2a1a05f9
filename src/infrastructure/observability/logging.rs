use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Installs a stdout `fmt` layer filtered by `RUST_LOG` (default: info).
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(default_level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false) // cleaner
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .try_init()
        .ok();
}
