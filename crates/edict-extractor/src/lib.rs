//! Edict Extractor
//!
//! Turns a bidding-notice PDF into a structured checklist of required
//! documents using a language model.
//!
//! # Architecture
//!
//! ```text
//! PDF bytes → DocumentExtractor → text → PromptBuilder → InferenceGateway
//!           → parser → ChecklistResult
//! ```
//!
//! # Failure model
//!
//! Extraction failures are hard errors (`ExtractionError`). Everything that
//! goes wrong after the text is available is folded into a soft
//! `ChecklistResult::failed` so the caller can still report and acknowledge.
//!
//! # Example Usage
//!
//! ```no_run
//! use edict_domain::ModelCatalog;
//! use edict_extractor::{ChecklistService, InferenceConfig, PdfTextExtractor};
//! use edict_llm::MockProvider;
//!
//! # async fn example(pdf: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"checklistItems": []}"#);
//! let service = ChecklistService::new(
//!     llm,
//!     PdfTextExtractor::new(),
//!     ModelCatalog::default(),
//!     InferenceConfig::default(),
//! );
//!
//! let result = service.infer(&pdf, Some("gemma")).await?;
//! println!("{} documents", result.total_documents);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod document;
mod error;
mod parser;
mod prompt;
mod service;


pub use config::InferenceConfig;
pub use document::{DocumentExtractor, PdfTextExtractor, PAGE_SEPARATOR};
pub use error::{ChecklistError, ConfigError, ExtractionError};
pub use parser::{parse_checklist_response, strip_code_fences, ACCEPTED_LIST_KEYS};
pub use prompt::PromptBuilder;
pub use service::{ChecklistService, Completion};
