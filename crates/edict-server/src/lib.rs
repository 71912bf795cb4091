//! Edict Server
//!
//! Wires the gateways into the processing pipeline, runs the queue consumer
//! in the background and serves the HTTP status surface.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod telemetry;

use config::{AppConfig, ConfigurationError};
use edict_extractor::{ChecklistService, PdfTextExtractor};
use edict_gateway::{load_sdk_config, BiddingApiClient, ReportingError, S3ObjectStore, SqsQueue};
use edict_llm::{LlmError, OpenRouterProvider};
use edict_worker::{MessageProcessor, QueueConsumer};
use handlers::{create_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// How long the consumer gets to finish after the HTTP server stops
const CONSUMER_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),

    /// Inference client could not be built
    #[error("Inference client error: {0}")]
    Llm(#[from] LlmError),

    /// Bidding API client could not be built
    #[error("Bidding API client error: {0}")]
    Reporting(#[from] ReportingError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the consumer and the HTTP server
///
/// Validates the configuration, builds every client once, spawns the queue
/// consumer and serves until Ctrl+C.
pub async fn start_server(config: AppConfig) -> Result<(), ServerError> {
    config.validate()?;

    info!("Starting edict service");
    info!("Bind address: {}", config.server.bind_addr());
    info!("Queue: {}", config.aws.queue_url);
    info!("Bucket: {}", config.aws.bucket);
    info!(
        "Models: {} (default: {})",
        config.models.aliases().len(),
        config.models.default_alias()
    );

    let sdk_config = load_sdk_config(&config.aws.settings()).await;
    let store = S3ObjectStore::new(&sdk_config, config.aws.bucket.clone());
    let queue = SqsQueue::new(&sdk_config, config.aws.queue_url.clone());

    let llm = OpenRouterProvider::with_timeout(
        config.openrouter.base_url.clone(),
        config.openrouter.api_key.clone(),
        config.openrouter.timeout(),
    )?
    .with_max_retries(config.openrouter.max_retries);
    let reporter = BiddingApiClient::new(
        config.bidding_api.base_url.clone(),
        config.bidding_api.timeout(),
    )?;

    let checklist = ChecklistService::new(
        llm.clone(),
        PdfTextExtractor::new(),
        config.models.clone(),
        config.inference.clone(),
    );
    let probe = ChecklistService::new(
        llm,
        PdfTextExtractor::new(),
        config.models.clone(),
        config.inference.clone(),
    );

    let processor = MessageProcessor::new(store, checklist, reporter);
    let consumer = QueueConsumer::new(queue, processor, config.consumer.clone());

    let state = AppState {
        probe: Arc::new(probe),
        liveness: consumer.liveness(),
        metrics: consumer.metrics(),
    };

    let mut consumer_task = tokio::spawn(async move {
        if let Err(e) = consumer.run().await {
            error!("Queue consumer stopped with error: {}", e);
        }
    });

    let app = create_router(state);
    let listener = TcpListener::bind(config.server.bind_addr()).await?;
    info!("Listening on {}", config.server.bind_addr());

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()));

    if tokio::time::timeout(CONSUMER_SHUTDOWN_GRACE, &mut consumer_task)
        .await
        .is_err()
    {
        warn!("Queue consumer did not stop in time, aborting");
        consumer_task.abort();
    }

    info!("Edict service stopped");
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
