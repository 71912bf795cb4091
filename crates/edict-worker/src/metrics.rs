//! Metrics collection for the consumer loop
//!
//! Counters are atomic so the HTTP status surface can read them while the
//! consumer is running.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by the consumer loop
#[derive(Debug, Default)]
pub struct ConsumerMetrics {
    polls: AtomicU64,
    receive_errors: AtomicU64,
    messages_received: AtomicU64,
    empty_messages: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
    acks: AtomicU64,
    ack_failures: AtomicU64,
}

/// Point-in-time copy of [`ConsumerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Receive calls issued
    pub polls: u64,

    /// Receive calls that failed
    pub receive_errors: u64,

    /// Messages delivered by the queue
    pub messages_received: u64,

    /// Messages with an empty body
    pub empty_messages: u64,

    /// Messages the processor reported as successful
    pub processed: u64,

    /// Messages the processor reported as failed
    pub failed: u64,

    /// Successful acknowledgments
    pub acks: u64,

    /// Failed acknowledgments
    pub ack_failures: u64,
}

impl ConsumerMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a receive call
    pub fn record_poll(&self) {
        self.polls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed receive call
    pub fn record_receive_error(&self) {
        self.receive_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record delivered messages
    pub fn record_received(&self, count: usize) {
        self.messages_received
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record an empty-body message
    pub fn record_empty(&self) {
        self.empty_messages.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the processor outcome for one message
    pub fn record_outcome(&self, success: bool) {
        if success {
            self.processed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record the acknowledgment outcome for one message
    pub fn record_ack(&self, success: bool) {
        if success {
            self.acks.fetch_add(1, Ordering::Relaxed);
        } else {
            self.ack_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Copy the current counter values
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            polls: self.polls.load(Ordering::Relaxed),
            receive_errors: self.receive_errors.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            empty_messages: self.empty_messages.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            acks: self.acks.load(Ordering::Relaxed),
            ack_failures: self.ack_failures.load(Ordering::Relaxed),
        }
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        self.snapshot().summary()
    }
}

impl MetricsSnapshot {
    /// Generate a summary report
    pub fn summary(&self) -> String {
        [
            "Consumer Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Polls: {} ({} failed)", self.polls, self.receive_errors),
            format!(
                "Messages received: {} ({} empty)",
                self.messages_received, self.empty_messages
            ),
            format!("Processed: {}", self.processed),
            format!("Failed: {}", self.failed),
            format!("Acknowledged: {} ({} failed)", self.acks, self.ack_failures),
        ]
        .join("\n")
    }
}
