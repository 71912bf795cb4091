//! Integration tests for the HTTP status surface

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use edict_domain::{ModelCatalog, QueueGateway, QueueMessage};
use edict_extractor::{ChecklistService, InferenceConfig, PdfTextExtractor};
use edict_llm::MockProvider;
use edict_server::handlers::{
    create_router, AppState, ConsumerStatusResponse, ErrorResponse, HealthCheckResponse,
    ModelsResponse, RootResponse, TestLlmResponse,
};
use edict_worker::{ConsumerConfig, MessageHandler, QueueConsumer};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for oneshot

#[derive(Debug, thiserror::Error)]
#[error("unreachable")]
struct NeverError;

/// Queue that never has messages
struct IdleQueue;

#[async_trait]
impl QueueGateway for IdleQueue {
    type Error = NeverError;

    async fn receive(&self, _max: u32, _wait: Duration) -> Result<Vec<QueueMessage>, NeverError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _ack_token: &str) -> Result<(), NeverError> {
        Ok(())
    }
}

struct NoopHandler;

#[async_trait]
impl MessageHandler for NoopHandler {
    async fn handle(&self, _content: &Value) -> bool {
        true
    }
}

fn idle_consumer() -> QueueConsumer<IdleQueue, NoopHandler> {
    QueueConsumer::new(
        IdleQueue,
        NoopHandler,
        ConsumerConfig {
            wait_time_secs: 0,
            ..ConsumerConfig::default()
        },
    )
}

fn create_test_state(llm: MockProvider, consumer: &QueueConsumer<IdleQueue, NoopHandler>) -> AppState {
    let probe = ChecklistService::new(
        llm,
        PdfTextExtractor::new(),
        ModelCatalog::default(),
        InferenceConfig::default(),
    );

    AppState {
        probe: Arc::new(probe),
        liveness: consumer.liveness(),
        metrics: consumer.metrics(),
    }
}

fn create_test_app(llm: MockProvider) -> Router {
    create_router(create_test_state(llm, &idle_consumer()))
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_root_endpoint() {
    let (status, body) = send(create_test_app(MockProvider::new("ok")), "GET", "/").await;

    assert_eq!(status, StatusCode::OK);
    let root: RootResponse = parse(&body);
    assert_eq!(root.message, "API Process Edict");
    assert_eq!(root.status, "running");
    assert_eq!(root.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_check_reports_consumer_liveness() {
    let (status, body) = send(create_test_app(MockProvider::new("ok")), "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    let health: HealthCheckResponse = parse(&body);
    assert_eq!(health.status, "healthy");
    assert_eq!(health.service, "api-process-edict");
    assert!(!health.consumer_running);
}

#[tokio::test]
async fn test_consumer_status_before_start_is_unavailable() {
    let (status, body) =
        send(create_test_app(MockProvider::new("ok")), "GET", "/consumer/status").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let error: ErrorResponse = parse(&body);
    assert!(error.error.contains("not started"));
}

#[tokio::test]
async fn test_consumer_status_reports_counters() {
    let consumer = idle_consumer();
    consumer.run_cycles(2).await.unwrap();
    let app = create_router(create_test_state(MockProvider::new("ok"), &consumer));

    let (status, body) = send(app, "GET", "/consumer/status").await;

    assert_eq!(status, StatusCode::OK);
    let consumer_status: ConsumerStatusResponse = parse(&body);
    assert!(!consumer_status.consumer_running);
    assert_eq!(consumer_status.polls, 2);
    assert_eq!(consumer_status.messages_received, 0);
    assert_eq!(consumer_status.processed, 0);
    assert_eq!(consumer_status.failed, 0);
}

#[tokio::test]
async fn test_list_models() {
    let (status, body) =
        send(create_test_app(MockProvider::new("ok")), "GET", "/api/v1/models").await;

    assert_eq!(status, StatusCode::OK);
    let models: ModelsResponse = parse(&body);
    assert_eq!(models.default, "dolphin");
    assert_eq!(models.models.len(), 3);
    assert_eq!(models.models["gemma"], "google/gemma-3n-e4b-it:free");
}

#[tokio::test]
async fn test_llm_with_default_model() {
    let llm = MockProvider::new("Olá!");
    let (status, body) = send(
        create_test_app(llm.clone()),
        "POST",
        "/api/v1/test-llm?prompt=diga%20oi",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: TestLlmResponse = parse(&body);
    assert_eq!(response.model_used, "dolphin");
    assert_eq!(response.prompt, "diga oi");
    assert_eq!(response.response, "Olá!");
    assert_eq!(llm.requests()[0].prompt, "diga oi");
}

#[tokio::test]
async fn test_llm_with_explicit_model() {
    let llm = MockProvider::new("ok");
    let (status, _) = send(
        create_test_app(llm.clone()),
        "POST",
        "/api/v1/test-llm?prompt=hi&model=deepseek",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(llm.requests()[0].model_id, "tngtech/deepseek-r1t2-chimera:free");
}

#[tokio::test]
async fn test_llm_unknown_model_is_bad_request() {
    let llm = MockProvider::new("ok");
    let (status, body) = send(
        create_test_app(llm.clone()),
        "POST",
        "/api/v1/test-llm?prompt=hi&model=gpt-9",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&body);
    assert!(error.error.contains("gpt-9"));
    assert_eq!(
        error.available,
        Some(vec![
            "deepseek".to_string(),
            "dolphin".to_string(),
            "gemma".to_string()
        ])
    );
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_llm_gateway_failure_is_server_error() {
    let (status, body) = send(
        create_test_app(MockProvider::failing("upstream down")),
        "POST",
        "/api/v1/test-llm?prompt=hi",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: ErrorResponse = parse(&body);
    assert!(error.error.contains("upstream down"));
    assert!(error.available.is_none());
}

#[tokio::test]
async fn test_llm_requires_prompt() {
    let (status, _) = send(
        create_test_app(MockProvider::new("ok")),
        "POST",
        "/api/v1/test-llm",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
