//! Queue consumer loop

use crate::config::ConsumerConfig;
use crate::error::WorkerError;
use crate::liveness::Liveness;
use crate::metrics::ConsumerMetrics;
use crate::processor::MessageHandler;
use edict_domain::traits::QueueGateway;
use edict_domain::{MessageBody, QueueMessage};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Long-running poll → process → acknowledge loop
///
/// Messages in a batch are handled one at a time. Every message is
/// acknowledged after its handler returns, whatever the outcome, so a
/// failing message is attempted once per delivery. A panicking handler
/// counts as a failure.
///
/// # Examples
///
/// ```no_run
/// use edict_worker::{ConsumerConfig, MessageHandler, QueueConsumer};
/// # async fn example<Q, H>(queue: Q, handler: H) -> Result<(), edict_worker::WorkerError>
/// # where
/// #     Q: edict_domain::QueueGateway,
/// #     H: MessageHandler,
/// # {
/// let consumer = QueueConsumer::new(queue, handler, ConsumerConfig::default());
///
/// // Run until Ctrl+C
/// consumer.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct QueueConsumer<Q, H> {
    queue: Q,
    handler: H,
    config: ConsumerConfig,
    metrics: Arc<ConsumerMetrics>,
    liveness: Liveness,
}

impl<Q, H> QueueConsumer<Q, H>
where
    Q: QueueGateway,
    H: MessageHandler,
{
    /// Create a new consumer
    pub fn new(queue: Q, handler: H, config: ConsumerConfig) -> Self {
        Self {
            queue,
            handler,
            config,
            metrics: Arc::new(ConsumerMetrics::new()),
            liveness: Liveness::new(),
        }
    }

    /// Shared handle to the consumer's counters
    pub fn metrics(&self) -> Arc<ConsumerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Shared handle to the liveness flag
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    /// Run until a shutdown signal (Ctrl+C) is received
    pub async fn run(&self) -> Result<(), WorkerError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Run until `shutdown` completes
    ///
    /// A message in flight when `shutdown` fires is abandoned before its
    /// acknowledgment and will be redelivered by the queue.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<(), WorkerError>
    where
        F: Future<Output = ()>,
    {
        self.config.validate()?;
        let running = self.liveness.running();
        info!(
            "Queue consumer started (batch: {}, wait: {:?})",
            self.config.max_messages,
            self.config.wait_time()
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = self.poll_once() => {}
                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping consumer");
                    break;
                }
            }
        }

        drop(running);
        info!("Queue consumer stopped. Final metrics:\n{}", self.metrics.summary());
        Ok(())
    }

    /// Run exactly `cycles` polls (useful for testing)
    pub async fn run_cycles(&self, cycles: usize) -> Result<(), WorkerError> {
        self.config.validate()?;
        let running = self.liveness.running();
        info!("Queue consumer started for {} cycles", cycles);

        for cycle in 0..cycles {
            debug!("Poll cycle {}/{}", cycle + 1, cycles);
            self.poll_once().await;
        }

        drop(running);
        info!(
            "Queue consumer finished {} cycles. Final metrics:\n{}",
            cycles,
            self.metrics.summary()
        );
        Ok(())
    }

    /// Receive one batch and drain it; returns the number of messages handled
    ///
    /// A receive error is logged and followed by the configured backoff.
    pub async fn poll_once(&self) -> usize {
        self.metrics.record_poll();

        let messages = match self
            .queue
            .receive(self.config.max_messages, self.config.wait_time())
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                self.metrics.record_receive_error();
                warn!(
                    "Failed to receive messages: {}; retrying in {:?}",
                    e,
                    self.config.error_backoff()
                );
                tokio::time::sleep(self.config.error_backoff()).await;
                return 0;
            }
        };

        if messages.is_empty() {
            debug!("No messages");
            return 0;
        }

        self.metrics.record_received(messages.len());
        info!("Received {} messages", messages.len());

        let count = messages.len();
        for message in messages {
            self.handle_message(message).await;
        }
        count
    }

    async fn handle_message(&self, message: QueueMessage) {
        let message_id = message.message_id.as_deref().unwrap_or("-");
        let body = MessageBody::parse(&message.body);
        debug!(message_id = %message_id, kind = body.kind(), "Handling message");

        match body.into_content() {
            None => {
                self.metrics.record_empty();
                info!(message_id = %message_id, "Empty message body, nothing to process");
            }
            Some(content) => {
                let success = match AssertUnwindSafe(self.handler.handle(&content))
                    .catch_unwind()
                    .await
                {
                    Ok(success) => success,
                    Err(_) => {
                        error!(message_id = %message_id, "Message handler panicked");
                        false
                    }
                };
                self.metrics.record_outcome(success);
                if success {
                    info!(message_id = %message_id, "Message processed");
                } else {
                    warn!(message_id = %message_id, "Message processing failed");
                }
            }
        }

        // Acknowledge regardless of outcome
        match self.queue.delete(&message.ack_token).await {
            Ok(()) => self.metrics.record_ack(true),
            Err(e) => {
                self.metrics.record_ack(false);
                error!(message_id = %message_id, "Failed to acknowledge message: {}", e);
            }
        }
    }
}
