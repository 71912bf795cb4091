//! Edict Gateway Adapters
//!
//! Concrete implementations of the capability traits in `edict-domain`:
//!
//! - [`SqsQueue`]: `QueueGateway` over Amazon SQS
//! - [`S3ObjectStore`]: `ObjectStore` over Amazon S3
//! - [`BiddingApiClient`]: `ChecklistReporter` over the bidding HTTP API
//!
//! Clients are built once at startup and never mutated afterwards.

#![warn(missing_docs)]

pub mod aws;
pub mod bidding;
pub mod error;
pub mod s3;
pub mod sqs;

pub use aws::{load_sdk_config, AwsSettings};
pub use bidding::BiddingApiClient;
pub use error::{QueueError, ReportingError, StorageError};
pub use s3::S3ObjectStore;
pub use sqs::SqsQueue;
