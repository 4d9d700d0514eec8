//! Logging setup for the backend
//!
//! Structured logging via `tracing`. Production gets JSON output, everything
//! else gets the human-readable formatter.

use crate::config::{Environment, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The filter honors `RUST_LOG` when set, otherwise falls back to the
/// configured level. Calling this twice returns an error from the subscriber
/// registry; callers that may race (tests) should use [`try_init`].
pub fn init(environment: Environment, config: &LoggingConfig) {
    if let Err(e) = try_init(environment, config) {
        tracing::debug!("Logging already initialized: {}", e);
    }
}

/// Fallible variant of [`init`].
pub fn try_init(
    environment: Environment,
    config: &LoggingConfig,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    match environment {
        Environment::Production => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()?,
        Environment::Development | Environment::Testing => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .try_init()?,
    }

    tracing::info!("Logging initialized for environment: {}", environment);
    Ok(())
}

/// Threshold above which an operation is reported as slow.
pub const SLOW_OPERATION_SECS: f64 = 2.0;

/// Log a completed operation, flagging it when it exceeds the slow threshold.
pub fn log_operation_timing(operation: &str, duration_secs: f64) {
    if duration_secs > SLOW_OPERATION_SECS {
        tracing::warn!(
            operation = operation,
            duration_secs = duration_secs,
            "Slow operation detected"
        );
    } else {
        tracing::debug!(
            operation = operation,
            duration_secs = duration_secs,
            "Operation completed"
        );
    }
}
