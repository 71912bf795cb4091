//! Bidding API reporter

use crate::error::ReportingError;
use async_trait::async_trait;
use edict_domain::traits::ChecklistReporter;
use edict_domain::ChecklistPayload;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{error, info};

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Characters escaped in the bidding id path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Sends checklists to `PATCH {base}/v1/bidding/checklist/{id}`
#[derive(Debug, Clone)]
pub struct BiddingApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl BiddingApiClient {
    /// Create a client with the given request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ReportingError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReportingError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// URL of the checklist resource for a bidding
    pub fn checklist_url(&self, bidding_id: &str) -> String {
        format!(
            "{}/v1/bidding/checklist/{}",
            self.base_url,
            utf8_percent_encode(bidding_id, PATH_SEGMENT)
        )
    }
}

#[async_trait]
impl ChecklistReporter for BiddingApiClient {
    type Error = ReportingError;

    async fn report(&self, bidding_id: &str, payload: &ChecklistPayload) -> Result<(), Self::Error> {
        let url = self.checklist_url(bidding_id);
        info!(bidding_id = %bidding_id, items = payload.len(), "Sending checklist to {}", url);

        let response = self
            .client
            .patch(&url)
            .header(ACCEPT, "*/*")
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!(bidding_id = %bidding_id, status = status.as_u16(), "Checklist update rejected");
            return Err(ReportingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(bidding_id = %bidding_id, "Checklist updated");
        Ok(())
    }
}
