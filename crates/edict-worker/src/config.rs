//! Configuration for the queue consumer

use crate::error::WorkerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling parameters of the consumer loop
///
/// # Examples
///
/// ```
/// use edict_worker::ConsumerConfig;
///
/// let config = ConsumerConfig::default();
/// assert_eq!(config.max_messages, 1);
/// assert_eq!(config.wait_time_secs, 10);
///
/// let config = ConsumerConfig::from_toml("max_messages = 10").unwrap();
/// assert_eq!(config.max_messages, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    /// Messages requested per receive call (1..=10)
    pub max_messages: u32,

    /// Long-poll wait per receive call, in seconds (0..=20)
    pub wait_time_secs: u64,

    /// Sleep after a failed receive call, in seconds
    pub error_backoff_secs: u64,
}

impl ConsumerConfig {
    /// Long-poll wait as a Duration
    pub fn wait_time(&self) -> Duration {
        Duration::from_secs(self.wait_time_secs)
    }

    /// Receive-error backoff as a Duration
    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), WorkerError> {
        if !(1..=10).contains(&self.max_messages) {
            return Err(WorkerError::Config(format!(
                "max_messages must be within 1..=10, got {}",
                self.max_messages
            )));
        }
        if self.wait_time_secs > 20 {
            return Err(WorkerError::Config(format!(
                "wait_time_secs must be at most 20, got {}",
                self.wait_time_secs
            )));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, WorkerError> {
        toml::from_str(toml_str)
            .map_err(|e| WorkerError::Config(format!("Failed to parse TOML: {}", e)))
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            max_messages: 1,
            wait_time_secs: 10,
            error_backoff_secs: 5,
        }
    }
}
