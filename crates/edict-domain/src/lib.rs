//! Edict Domain Layer
//!
//! Core types and capability interfaces for the bidding-notice checklist
//! pipeline. Every other crate in the workspace depends on this one; it holds
//! no I/O and no SDK types.
//!
//! ## Key Concepts
//!
//! - **Checklist**: ordered list of required/optional documents extracted
//!   from a bidding notice (`ChecklistResult`, `DocumentRequirement`)
//! - **Processing request**: the validated payload of one queue message
//! - **Model catalog**: the closed set of model aliases and the default alias
//! - **Storage reference**: the URL or key pointing at the notice PDF
//!
//! ## Architecture
//!
//! The pipeline talks to the outside world only through the traits in
//! [`traits`]. Concrete adapters (S3, SQS, OpenRouter, bidding API) live in
//! other crates and are injected at startup.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checklist;
pub mod model;
pub mod reference;
pub mod request;
pub mod traits;

// Re-exports for convenience
pub use checklist::{ChecklistPayload, ChecklistResult, DocumentRequirement, ExigenceStatus};
pub use model::{ModelCatalog, UnknownModelError};
pub use reference::{is_pdf_key, storage_key};
pub use request::{MessageBody, ProcessingRequest, QueueMessage, RequestError};
pub use traits::{ChecklistReporter, CompletionRequest, InferenceGateway, ObjectStore, QueueGateway};
