//! Edict Worker
//!
//! The message-consumption pipeline: a queue consumer loop and the
//! per-message processor it drives.
//!
//! # Overview
//!
//! ```text
//! QueueGateway::receive → MessageBody::parse → MessageProcessor::process
//!     → ObjectStore::get → ChecklistService::infer → ChecklistReporter::report
//! → QueueGateway::delete
//! ```
//!
//! - **At most one attempt per delivery**: every received message is
//!   deleted after processing, successful or not.
//! - **Error isolation**: nothing raised while handling a message escapes
//!   the loop; only receive failures trigger a fixed backoff.
//! - **Observability**: [`ConsumerMetrics`] counters and a [`Liveness`]
//!   flag readable by the HTTP status surface.
//!
//! # Configuration
//!
//! ```toml
//! [consumer]
//! max_messages = 1
//! wait_time_secs = 10
//! error_backoff_secs = 5
//! ```

#![warn(missing_docs)]

mod config;
mod consumer;
mod error;
mod liveness;
mod metrics;
mod processor;

pub use config::ConsumerConfig;
pub use consumer::QueueConsumer;
pub use error::WorkerError;
pub use liveness::Liveness;
pub use metrics::{ConsumerMetrics, MetricsSnapshot};
pub use processor::{MessageHandler, MessageProcessor};
