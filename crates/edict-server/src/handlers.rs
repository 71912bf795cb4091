//! HTTP request handlers for the status surface.
//!
//! Liveness and metrics of the consumer, the model catalog, and a debug
//! endpoint running one completion through the inference gateway.

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use edict_domain::{InferenceGateway, ModelCatalog, UnknownModelError};
use edict_extractor::{ChecklistError, ChecklistService, Completion, DocumentExtractor};
use edict_worker::{ConsumerMetrics, Liveness};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Service name reported by the health check
pub const SERVICE_NAME: &str = "api-process-edict";

/// Completion access for the debug endpoint
#[async_trait]
pub trait CompletionProbe: Send + Sync {
    /// Model catalog used to resolve aliases
    fn catalog(&self) -> &ModelCatalog;

    /// Run one completion; `None` selects the default model
    async fn complete(&self, prompt: String, model: Option<&str>) -> Result<Completion, ChecklistError>;
}

#[async_trait]
impl<L, E> CompletionProbe for ChecklistService<L, E>
where
    L: InferenceGateway,
    E: DocumentExtractor,
{
    fn catalog(&self) -> &ModelCatalog {
        ChecklistService::catalog(self)
    }

    async fn complete(&self, prompt: String, model: Option<&str>) -> Result<Completion, ChecklistError> {
        ChecklistService::complete(self, prompt, model).await
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Inference access for the debug endpoint
    pub probe: Arc<dyn CompletionProbe>,
    /// Consumer liveness flag
    pub liveness: Liveness,
    /// Consumer counters
    pub metrics: Arc<ConsumerMetrics>,
}

/// Root endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    /// Service title
    pub message: String,
    /// Crate version
    pub version: String,
    /// Always `running`
    pub status: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Always `healthy` when the process answers
    pub status: String,
    /// Service name
    pub service: String,
    /// Whether the consumer loop is currently running
    pub consumer_running: bool,
}

/// Consumer status response
#[derive(Debug, Serialize, Deserialize)]
pub struct ConsumerStatusResponse {
    /// Whether the consumer loop is currently running
    pub consumer_running: bool,
    /// Receive calls made
    pub polls: u64,
    /// Messages received
    pub messages_received: u64,
    /// Messages processed successfully
    pub processed: u64,
    /// Messages whose processing failed
    pub failed: u64,
}

/// Model catalog response
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    /// Alias to provider identifier
    pub models: BTreeMap<String, String>,
    /// Default alias
    pub default: String,
}

/// Query parameters of the completion test endpoint
#[derive(Debug, Deserialize)]
pub struct TestLlmParams {
    /// Prompt sent as-is
    pub prompt: String,
    /// Model alias; the default model when absent
    pub model: Option<String>,
}

/// Completion test response
#[derive(Debug, Serialize, Deserialize)]
pub struct TestLlmResponse {
    /// Alias used
    pub model_used: String,
    /// Prompt that was sent
    pub prompt: String,
    /// Generated text
    pub response: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Known aliases, present when an unknown alias was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<Vec<String>>,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The consumer loop was never started
    ConsumerNotStarted,
    /// Requested alias is not in the catalog
    UnknownModel(UnknownModelError),
    /// The completion failed
    Inference(ChecklistError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ConsumerNotStarted => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse {
                    error: "Consumer was not started".to_string(),
                    available: None,
                },
            ),
            AppError::UnknownModel(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: e.to_string(),
                    available: Some(e.available),
                },
            ),
            AppError::Inference(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: e.to_string(),
                    available: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChecklistError> for AppError {
    fn from(e: ChecklistError) -> Self {
        match e {
            ChecklistError::UnknownModel(e) => AppError::UnknownModel(e),
            other => AppError::Inference(other),
        }
    }
}

/// GET / - Service banner
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "API Process Edict".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
    })
}

/// GET /health - Process health with consumer liveness
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        consumer_running: state.liveness.is_running(),
    })
}

/// GET /consumer/status - Consumer liveness and counters
async fn consumer_status(
    State(state): State<AppState>,
) -> Result<Json<ConsumerStatusResponse>, AppError> {
    if !state.liveness.has_started() {
        return Err(AppError::ConsumerNotStarted);
    }

    let snapshot = state.metrics.snapshot();
    Ok(Json(ConsumerStatusResponse {
        consumer_running: state.liveness.is_running(),
        polls: snapshot.polls,
        messages_received: snapshot.messages_received,
        processed: snapshot.processed,
        failed: snapshot.failed,
    }))
}

/// GET /api/v1/models - Model catalog
async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let catalog = state.probe.catalog();
    Json(ModelsResponse {
        models: catalog.aliases().clone(),
        default: catalog.default_alias().to_string(),
    })
}

/// POST /api/v1/test-llm - Run one completion
async fn test_llm(
    State(state): State<AppState>,
    Query(params): Query<TestLlmParams>,
) -> Result<Json<TestLlmResponse>, AppError> {
    info!(model = ?params.model, "Test completion requested");

    let completion = state
        .probe
        .complete(params.prompt.clone(), params.model.as_deref())
        .await
        .map_err(|e| {
            warn!("Test completion failed: {}", e);
            AppError::from(e)
        })?;

    Ok(Json(TestLlmResponse {
        model_used: completion.alias,
        prompt: params.prompt,
        response: completion.text,
    }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/consumer/status", get(consumer_status))
        .route("/api/v1/models", get(list_models))
        .route("/api/v1/test-llm", post(test_llm))
        .with_state(state)
}
