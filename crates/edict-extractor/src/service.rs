//! Checklist inference service

use crate::config::InferenceConfig;
use crate::document::DocumentExtractor;
use crate::error::{ChecklistError, ExtractionError};
use crate::parser::parse_checklist_response;
use crate::prompt::PromptBuilder;
use edict_domain::traits::{CompletionRequest, InferenceGateway};
use edict_domain::{ChecklistResult, ModelCatalog};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Raw output of one completion call
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Alias that was used
    pub alias: String,

    /// Provider identifier the alias resolved to
    pub model_id: String,

    /// Generated text
    pub text: String,
}

/// Turns notice documents into checklists
///
/// Runs the document extractor, prompts the model selected from the
/// catalog and parses its answer.
pub struct ChecklistService<L, E> {
    llm: L,
    extractor: Arc<E>,
    catalog: ModelCatalog,
    config: InferenceConfig,
}

impl<L, E> ChecklistService<L, E>
where
    L: InferenceGateway,
    E: DocumentExtractor,
{
    /// Create a new service
    pub fn new(llm: L, extractor: E, catalog: ModelCatalog, config: InferenceConfig) -> Self {
        Self {
            llm,
            extractor: Arc::new(extractor),
            catalog,
            config,
        }
    }

    /// Model catalog used to resolve preferences
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Inference parameters
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Build a checklist from document bytes
    ///
    /// Only an extraction failure is returned as `Err`. Every later failure
    /// (unknown model, gateway error, timeout, unusable answer) becomes a
    /// soft `ChecklistResult::failed`.
    pub async fn infer(
        &self,
        document: &[u8],
        model: Option<&str>,
    ) -> Result<ChecklistResult, ExtractionError> {
        let text = self.extract(document).await?;
        info!("Extracted {} characters from document", text.chars().count());

        match self.infer_from_text(&text, model).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!(
                    model = model.unwrap_or(self.catalog.default_alias()),
                    "Checklist inference failed: {}",
                    e
                );
                Ok(ChecklistResult::failed(e.to_string()))
            }
        }
    }

    /// Run the extractor on the blocking pool
    ///
    /// A panicking extractor is reported as an invalid document.
    async fn extract(&self, document: &[u8]) -> Result<String, ExtractionError> {
        let extractor = Arc::clone(&self.extractor);
        let bytes = document.to_vec();

        match tokio::task::spawn_blocking(move || extractor.extract_text(&bytes)).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => {
                error!("Document extractor panicked");
                Err(ExtractionError::InvalidDocument(
                    "extractor panicked while parsing the document".to_string(),
                ))
            }
            Err(e) => Err(ExtractionError::InvalidDocument(format!(
                "extraction task failed: {}",
                e
            ))),
        }
    }

    /// Build a checklist from already extracted text
    pub async fn infer_from_text(
        &self,
        text: &str,
        model: Option<&str>,
    ) -> Result<ChecklistResult, ChecklistError> {
        let prompt = PromptBuilder::new(text).build();
        debug!("Prompt length: {} chars", prompt.len());

        let completion = self.complete(prompt, model).await?;
        debug!("Model response length: {} chars", completion.text.len());

        let documents = parse_checklist_response(&completion.text)?;
        let result = ChecklistResult::from_documents(documents);

        info!(
            model = %completion.alias,
            "Checklist generated: {} documents ({} mandatory, {} optional)",
            result.total_documents,
            result.mandatory_count,
            result.optional_count
        );
        Ok(result)
    }

    /// Run one completion with the configured parameters
    ///
    /// `None` selects the default alias; an explicit unknown alias is
    /// rejected, never substituted.
    pub async fn complete(
        &self,
        prompt: String,
        model: Option<&str>,
    ) -> Result<Completion, ChecklistError> {
        let (alias, model_id) = self.catalog.resolve_preference(model)?;

        let request = CompletionRequest {
            prompt,
            model_id: model_id.to_string(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        info!(model = %alias, model_id = %model_id, "Requesting completion");

        // Call the gateway with timeout
        let text = timeout(self.config.timeout(), self.llm.complete(&request))
            .await
            .map_err(|_| ChecklistError::Timeout(self.config.timeout_secs))?
            .map_err(|e| ChecklistError::Inference(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(ChecklistError::EmptyResponse);
        }

        Ok(Completion {
            alias: alias.to_string(),
            model_id: request.model_id,
            text,
        })
    }
}
