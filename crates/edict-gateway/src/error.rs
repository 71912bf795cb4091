//! Error types for the gateway adapters

use thiserror::Error;

/// Object storage failures
#[derive(Error, Debug)]
pub enum StorageError {
    /// The storage service rejected or failed the request
    #[error("Failed to fetch '{key}': {message}")]
    Request {
        /// Object key
        key: String,
        /// Service error with context
        message: String,
    },

    /// The object body could not be read
    #[error("Failed to read body of '{key}': {message}")]
    Body {
        /// Object key
        key: String,
        /// Stream error
        message: String,
    },
}

/// Work queue failures
#[derive(Error, Debug)]
pub enum QueueError {
    /// Receive call failed
    #[error("Receive failed: {0}")]
    Receive(String),

    /// Delete (ack) call failed
    #[error("Delete failed: {0}")]
    Delete(String),
}

/// Bidding API failures
#[derive(Error, Debug)]
pub enum ReportingError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with something other than 200
    #[error("Bidding API returned {status}: {body}")]
    Status {
        /// Response status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Client could not be constructed
    #[error("Client error: {0}")]
    Client(String),
}
