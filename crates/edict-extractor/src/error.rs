//! Error types for the Extractor

use edict_domain::UnknownModelError;
use thiserror::Error;

/// The document could not be turned into text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Bytes are not a parseable document
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Document parsed but contains no extractable text (e.g. scanned pages)
    #[error("No extractable text in document ({pages} pages)")]
    NoText {
        /// Page count of the document
        pages: usize,
    },
}

/// Failures of the inference step
///
/// All of these are turned into a soft `ChecklistResult::failed` by
/// [`crate::ChecklistService::infer`].
#[derive(Error, Debug)]
pub enum ChecklistError {
    /// Requested model alias is not in the catalog
    #[error(transparent)]
    UnknownModel(#[from] UnknownModelError),

    /// Inference gateway returned an error
    #[error("Inference error: {0}")]
    Inference(String),

    /// Inference gateway did not answer in time
    #[error("Inference timed out after {0}s")]
    Timeout(u64),

    /// Model returned nothing
    #[error("Empty response from model")]
    EmptyResponse,

    /// Model output does not match any accepted schema
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Configuration validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid inference configuration: {0}")]
pub struct ConfigError(pub String);
