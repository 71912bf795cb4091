//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and the services
//! it depends on. Implementations are constructed once at startup and passed
//! in explicitly; none of them is mutated after construction.

use crate::checklist::ChecklistPayload;
use crate::request::QueueMessage;
use async_trait::async_trait;
use std::time::Duration;

/// Work queue the consumer polls
///
/// Implemented by the infrastructure layer (edict-gateway)
#[async_trait]
pub trait QueueGateway: Send + Sync {
    /// Error type for queue operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Receive up to `max_messages`, long-polling for at most `wait`
    async fn receive(
        &self,
        max_messages: u32,
        wait: Duration,
    ) -> Result<Vec<QueueMessage>, Self::Error>;

    /// Acknowledge (delete) a delivery
    async fn delete(&self, ack_token: &str) -> Result<(), Self::Error>;
}

/// Object storage holding the notice documents
///
/// Implemented by the infrastructure layer (edict-gateway). The bucket is
/// part of the implementation's configuration.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Error type for storage operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Download an object; `Ok(None)` when it does not exist
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;
}

/// Parameters of a single completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Full prompt text
    pub prompt: String,

    /// Provider-specific model identifier (already resolved from an alias)
    pub model_id: String,

    /// Upper bound on generated tokens
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

/// Language-model text completion
///
/// Implemented by the infrastructure layer (edict-llm)
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Error type for inference operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate text for a prompt
    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error>;
}

/// External system receiving finished checklists
///
/// Implemented by the infrastructure layer (edict-gateway)
#[async_trait]
pub trait ChecklistReporter: Send + Sync {
    /// Error type for reporting operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send a partial update for the given bidding
    async fn report(&self, bidding_id: &str, payload: &ChecklistPayload)
        -> Result<(), Self::Error>;
}
