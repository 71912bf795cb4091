//! OpenRouter Provider Implementation
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint. OpenRouter is
//! the default target; the base URL is configurable.
//!
//! # Features
//!
//! - Bearer-token authentication
//! - Retry with exponential backoff for transport errors and server failures
//! - Per-request HTTP timeout
//!
//! # Examples
//!
//! ```no_run
//! use edict_llm::OpenRouterProvider;
//!
//! let provider = OpenRouterProvider::new("https://openrouter.ai/api/v1", "sk-or-...")
//!     .expect("client")
//!     .with_max_retries(5);
//! ```

use crate::LlmError;
use async_trait::async_trait;
use edict_domain::traits::{CompletionRequest, InferenceGateway};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default OpenRouter API endpoint
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default timeout for a single completion request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per completion
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default first backoff delay between attempts
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Longest a completion can take across all attempts and backoff sleeps
pub fn retry_budget(per_attempt: Duration, max_retries: u32, backoff_base: Duration) -> Duration {
    let attempts = max_retries.max(1);
    let backoff = (1..attempts).fold(Duration::ZERO, |total, attempt| {
        total.saturating_add(backoff_base.saturating_mul(2u32.saturating_pow(attempt - 1)))
    });
    per_attempt.saturating_mul(attempts).saturating_add(backoff)
}

/// OpenAI-compatible chat completions provider
///
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct OpenRouterProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
    backoff_base: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenRouterProvider {
    /// Create a provider with the default timeout
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Other` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with an explicit per-request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
        })
    }

    /// Set the maximum number of attempts (at least one is always made)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the first backoff delay; later delays double
    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Configured endpoint without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn attempt(&self, url: &str, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &request.model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    LlmError::Authentication(error_text)
                }
                StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(request.model_id.clone()),
                StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
                _ => LlmError::Communication(format!("HTTP {}: {}", status, error_text)),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?
            .message
            .content
            .ok_or_else(|| LlmError::InvalidResponse("Choice has no content".to_string()))
    }
}

#[async_trait]
impl InferenceGateway for OpenRouterProvider {
    type Error = LlmError;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.attempt(&url, request).await {
                Ok(text) => {
                    debug!(model = %request.model_id, attempts, "Completion received");
                    return Ok(text);
                }
                Err(LlmError::Communication(msg)) if attempts < self.max_retries => {
                    // Exponential backoff: base, 2*base, 4*base, ...
                    let delay = self.backoff_base * 2u32.pow(attempts - 1);
                    warn!(
                        model = %request.model_id,
                        attempt = attempts,
                        error = %msg,
                        "Completion attempt failed, retrying in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
