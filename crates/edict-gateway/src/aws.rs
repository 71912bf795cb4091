//! Shared AWS SDK configuration

use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::{Credentials, Region};

/// Connection settings for the AWS services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsSettings {
    /// Access key id
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Region name, e.g. `us-east-1`
    pub region: String,

    /// Endpoint override (LocalStack, tests); `None` uses the AWS endpoints
    pub endpoint_url: Option<String>,
}

/// Build an SDK config with static credentials
///
/// Both the S3 and the SQS clients are created from the returned config.
pub async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    let credentials = Credentials::new(
        settings.access_key.clone(),
        settings.secret_key.clone(),
        None,
        None,
        "edict-static",
    );

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()))
        .credentials_provider(credentials);

    if let Some(endpoint) = &settings.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}
