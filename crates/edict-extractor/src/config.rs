//! Configuration for the checklist inference step

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters passed to the inference gateway on every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Upper bound on generated tokens
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Deadline for one completion including the client's retries (seconds)
    pub timeout_secs: u64,
}

impl InferenceConfig {
    /// Get the inference timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens == 0 {
            return Err(ConfigError("max_tokens must be greater than 0".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError("timeout_secs must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError(format!("Failed to parse TOML: {}", e)))
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4000,
            temperature: 0.1,
            timeout_secs: 400,
        }
    }
}
