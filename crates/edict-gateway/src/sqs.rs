//! SQS work queue

use crate::error::QueueError;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sqs::error::DisplayErrorContext;
use edict_domain::traits::QueueGateway;
use edict_domain::QueueMessage;
use std::time::Duration;
use tracing::{debug, warn};

/// Largest batch SQS returns from one receive call
pub const MAX_BATCH_SIZE: u32 = 10;

/// Longest long-poll SQS allows (seconds)
pub const MAX_WAIT_SECS: u64 = 20;

/// One SQS queue addressed by URL
#[derive(Debug, Clone)]
pub struct SqsQueue {
    client: aws_sdk_sqs::Client,
    queue_url: String,
}

impl SqsQueue {
    /// Create a queue handle
    pub fn new(sdk_config: &SdkConfig, queue_url: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_sqs::Client::new(sdk_config),
            queue_url: queue_url.into(),
        }
    }

    /// Queue URL
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

#[async_trait]
impl QueueGateway for SqsQueue {
    type Error = QueueError;

    async fn receive(
        &self,
        max_messages: u32,
        wait: Duration,
    ) -> Result<Vec<QueueMessage>, Self::Error> {
        let max_messages = max_messages.clamp(1, MAX_BATCH_SIZE) as i32;
        let wait_secs = wait.as_secs().min(MAX_WAIT_SECS) as i32;

        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_secs)
            .send()
            .await
            .map_err(|e| QueueError::Receive(DisplayErrorContext(&e).to_string()))?;

        let messages: Vec<QueueMessage> = output
            .messages()
            .iter()
            .filter_map(|message| {
                let Some(receipt_handle) = message.receipt_handle() else {
                    warn!(
                        message_id = message.message_id().unwrap_or("?"),
                        "Dropping message without receipt handle"
                    );
                    return None;
                };
                Some(QueueMessage {
                    message_id: message.message_id().map(str::to_string),
                    body: message.body().unwrap_or_default().to_string(),
                    ack_token: receipt_handle.to_string(),
                })
            })
            .collect();

        debug!("Received {} messages", messages.len());
        Ok(messages)
    }

    async fn delete(&self, ack_token: &str) -> Result<(), Self::Error> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(ack_token)
            .send()
            .await
            .map_err(|e| QueueError::Delete(DisplayErrorContext(&e).to_string()))?;

        debug!("Message deleted");
        Ok(())
    }
}
