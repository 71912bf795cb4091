//! Per-message pipeline: storage → extraction/inference → reporting

use async_trait::async_trait;
use edict_domain::traits::{ChecklistReporter, InferenceGateway, ObjectStore};
use edict_domain::{is_pdf_key, storage_key, ChecklistResult, ProcessingRequest};
use edict_extractor::{ChecklistService, DocumentExtractor};
use serde_json::Value;
use tracing::{error, info, warn};

/// Handles the content of one queue message
///
/// Returns a success indicator and never fails past this boundary. The
/// consumer acknowledges the message whatever the outcome.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Process the message content
    async fn handle(&self, content: &Value) -> bool;
}

/// Drives a processing request through download, inference and reporting
pub struct MessageProcessor<S, L, E, R> {
    store: S,
    checklist: ChecklistService<L, E>,
    reporter: R,
}

impl<S, L, E, R> MessageProcessor<S, L, E, R>
where
    S: ObjectStore,
    L: InferenceGateway,
    E: DocumentExtractor,
    R: ChecklistReporter,
{
    /// Create a new processor
    pub fn new(store: S, checklist: ChecklistService<L, E>, reporter: R) -> Self {
        Self {
            store,
            checklist,
            reporter,
        }
    }

    /// Checklist service used for inference
    pub fn checklist(&self) -> &ChecklistService<L, E> {
        &self.checklist
    }

    /// Process one message payload
    ///
    /// Returns `true` once the document was downloaded and the inference
    /// step produced a result, even a soft error result. A failed report
    /// does not change the outcome.
    pub async fn process(&self, payload: &Value) -> bool {
        let request = match ProcessingRequest::from_value(payload) {
            Ok(request) => request,
            Err(e) => {
                error!("Invalid processing request: {}", e);
                return false;
            }
        };

        let bidding_id = request.bidding_id.as_str();
        let model = request.model_preference.as_deref();
        info!(
            bidding_id = %bidding_id,
            model = model.unwrap_or(self.checklist.catalog().default_alias()),
            "Processing bidding notice {}",
            request.document_reference
        );

        let Some(bytes) = self.download(&request).await else {
            return false;
        };

        let result = match self.checklist.infer(&bytes, model).await {
            Ok(result) => result,
            Err(e) => {
                error!(bidding_id = %bidding_id, "Document extraction failed: {}", e);
                return false;
            }
        };

        if result.processing_error {
            warn!(
                bidding_id = %bidding_id,
                "Checklist inference failed softly: {}",
                result.error_message.as_deref().unwrap_or("unknown error")
            );
        } else {
            log_checklist(bidding_id, &result);
        }

        if let Err(e) = self.reporter.report(bidding_id, &result.to_payload()).await {
            error!(bidding_id = %bidding_id, "Failed to report checklist: {}", e);
        }

        true
    }

    async fn download(&self, request: &ProcessingRequest) -> Option<Vec<u8>> {
        let bidding_id = request.bidding_id.as_str();

        let Some(key) = storage_key(&request.document_reference) else {
            error!(bidding_id = %bidding_id, "No storage key in '{}'", request.document_reference);
            return None;
        };

        if !is_pdf_key(&key) {
            warn!(bidding_id = %bidding_id, key = %key, "Not a PDF, skipping");
            return None;
        }

        match self.store.get(&key).await {
            Ok(Some(bytes)) if !bytes.is_empty() => Some(bytes),
            Ok(Some(_)) => {
                error!(bidding_id = %bidding_id, key = %key, "Downloaded document is empty");
                None
            }
            Ok(None) => {
                error!(bidding_id = %bidding_id, key = %key, "Document not found");
                None
            }
            Err(e) => {
                error!(bidding_id = %bidding_id, key = %key, "Download failed: {}", e);
                None
            }
        }
    }
}

fn log_checklist(bidding_id: &str, result: &ChecklistResult) {
    info!(
        bidding_id = %bidding_id,
        "Checklist: {} documents ({} mandatory, {} optional)",
        result.total_documents,
        result.mandatory_count,
        result.optional_count
    );
    for (idx, document) in result.documents.iter().enumerate() {
        info!(
            bidding_id = %bidding_id,
            "  {}. {} [{}]",
            idx + 1,
            document.name,
            document.exigence_status
        );
    }
}

#[async_trait]
impl<S, L, E, R> MessageHandler for MessageProcessor<S, L, E, R>
where
    S: ObjectStore,
    L: InferenceGateway,
    E: DocumentExtractor,
    R: ChecklistReporter,
{
    async fn handle(&self, content: &Value) -> bool {
        self.process(content).await
    }
}
