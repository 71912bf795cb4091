//! Tracing subscriber setup

use crate::config::ConfigurationError;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// `RUST_LOG` wins when set; otherwise `log_level` is used.
pub fn init(log_level: &str) -> Result<(), ConfigurationError> {
    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), log_level)?;

    // A subscriber installed earlier (tests, embedding) is left in place
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();

    Ok(())
}

/// Build the filter from an optional `RUST_LOG` value and the configured level
pub fn build_filter(rust_log: Option<&str>, log_level: &str) -> Result<EnvFilter, ConfigurationError> {
    let value = rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(log_level);

    EnvFilter::try_new(value).map_err(|source| ConfigurationError::LogFilter {
        value: value.to_string(),
        source,
    })
}
