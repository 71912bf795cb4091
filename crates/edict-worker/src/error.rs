//! Error types for the worker

use thiserror::Error;

/// Errors that stop the consumer before it starts polling
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Invalid consumer configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
