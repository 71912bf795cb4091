//! Application configuration.
//!
//! Settings come from an optional TOML file and are then overridden by
//! environment variables. Every non-secret field has a default; the secrets
//! and resource locations are required and checked by [`AppConfig::validate`].
//!
//! ```toml
//! log_level = "info"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [aws]
//! region = "us-east-1"
//! queue_url = "https://sqs.us-east-1.amazonaws.com/123/edicts"
//! bucket = "edicts"
//!
//! [openrouter]
//! base_url = "https://openrouter.ai/api/v1"
//!
//! [bidding_api]
//! base_url = "http://localhost:8080"
//! timeout_secs = 30
//!
//! [consumer]
//! max_messages = 1
//! wait_time_secs = 10
//!
//! [inference]
//! max_tokens = 4000
//!
//! [models]
//! default_model = "dolphin"
//!
//! [models.aliases]
//! dolphin = "cognitivecomputations/dolphin3.0-r1-mistral-24b:free"
//! ```

use edict_domain::{ModelCatalog, UnknownModelError};
use edict_extractor::InferenceConfig;
use edict_gateway::AwsSettings;
use edict_llm::openrouter::{retry_budget, DEFAULT_BACKOFF_BASE};
use edict_worker::ConsumerConfig;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration error, fatal at startup
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// One or more required settings are absent
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingField(Vec<String>),

    /// An environment override could not be parsed
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue {
        /// Environment variable name
        key: String,
        /// Raw value found
        value: String,
    },

    /// A section failed its own validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The default model alias is not in the catalog
    #[error("Invalid model catalog: {0}")]
    InvalidCatalog(#[from] UnknownModelError),

    /// The log filter could not be parsed
    #[error("Invalid log filter '{value}': {source}")]
    LogFilter {
        /// Filter string that was rejected
        value: String,
        /// Parser error
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerSettings {
    /// Full bind address (host:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Queue and object storage settings
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Access key id
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Region name
    pub region: String,

    /// Endpoint override (LocalStack)
    pub endpoint_url: Option<String>,

    /// URL of the work queue
    pub queue_url: String,

    /// Bucket holding the notice documents
    pub bucket: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            secret_key: String::new(),
            region: "us-east-1".to_string(),
            endpoint_url: None,
            queue_url: String::new(),
            bucket: String::new(),
        }
    }
}

impl std::fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsConfig")
            .field("access_key", &redact(&self.access_key))
            .field("secret_key", &redact(&self.secret_key))
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("queue_url", &self.queue_url)
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl AwsConfig {
    /// Connection settings for the SDK clients
    pub fn settings(&self) -> AwsSettings {
        AwsSettings {
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }
}

/// Inference provider settings
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    /// API key sent as bearer token
    pub api_key: String,

    /// OpenAI-compatible endpoint
    pub base_url: String,

    /// HTTP timeout per attempt, in seconds
    pub timeout_secs: u64,

    /// Attempts per completion
    pub max_retries: u32,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: edict_llm::openrouter::DEFAULT_BASE_URL.to_string(),
            timeout_secs: edict_llm::openrouter::DEFAULT_TIMEOUT_SECS,
            max_retries: edict_llm::openrouter::DEFAULT_MAX_RETRIES,
        }
    }
}

impl std::fmt::Debug for OpenRouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl OpenRouterConfig {
    /// HTTP timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Bidding API settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BiddingApiConfig {
    /// Base URL of the bidding API
    pub base_url: String,

    /// Request timeout, in seconds
    pub timeout_secs: u64,
}

impl Default for BiddingApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: edict_gateway::bidding::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BiddingApiConfig {
    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log level or filter directives, used when `RUST_LOG` is unset
    pub log_level: String,

    /// HTTP listener
    pub server: ServerSettings,

    /// Queue and storage
    pub aws: AwsConfig,

    /// Inference provider
    pub openrouter: OpenRouterConfig,

    /// Bidding API
    pub bidding_api: BiddingApiConfig,

    /// Consumer loop
    pub consumer: ConsumerConfig,

    /// Completion parameters
    pub inference: InferenceConfig,

    /// Model aliases
    pub models: ModelCatalog,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerSettings::default(),
            aws: AwsConfig::default(),
            openrouter: OpenRouterConfig::default(),
            bidding_api: BiddingApiConfig::default(),
            consumer: ConsumerConfig::default(),
            inference: InferenceConfig::default(),
            models: ModelCatalog::default(),
        }
    }
}

impl AppConfig {
    /// Load from an optional TOML file, then apply the process environment
    ///
    /// Does not validate; call [`AppConfig::validate`] before use.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigurationError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Override fields from environment variables
    ///
    /// `lookup` returns the value of a variable; blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("AWS_ACCESS_KEY") {
            self.aws.access_key = v;
        }
        if let Some(v) = get("AWS_SECRET_KEY") {
            self.aws.secret_key = v;
        }
        if let Some(v) = get("AWS_REGION") {
            self.aws.region = v;
        }
        if let Some(v) = get("AWS_ENDPOINT_URL") {
            self.aws.endpoint_url = Some(v);
        }
        if let Some(v) = get("SQS_QUEUE_URL") {
            self.aws.queue_url = v;
        }
        if let Some(v) = get("AWS_S3_BUCKET") {
            self.aws.bucket = v;
        }
        if let Some(v) = get("OPENROUTER_API_KEY") {
            self.openrouter.api_key = v;
        }
        if let Some(v) = get("OPENROUTER_BASE_URL") {
            self.openrouter.base_url = v;
        }
        if let Some(v) = get("BIDDING_API_BASE_URL") {
            self.bidding_api.base_url = v;
        }
        if let Some(v) = get("BIDDING_API_TIMEOUT") {
            self.bidding_api.timeout_secs = parse_env("BIDDING_API_TIMEOUT", &v)?;
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = get("MAX_MESSAGES_PER_POLL") {
            self.consumer.max_messages = parse_env("MAX_MESSAGES_PER_POLL", &v)?;
        }
        if let Some(v) = get("POLL_WAIT_TIME") {
            self.consumer.wait_time_secs = parse_env("POLL_WAIT_TIME", &v)?;
        }
        if let Some(v) = get("APP_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("APP_PORT") {
            self.server.port = parse_env("APP_PORT", &v)?;
        }

        Ok(())
    }

    /// Check required settings and every section
    ///
    /// All missing required settings are reported together.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let required = [
            ("AWS_ACCESS_KEY", &self.aws.access_key),
            ("AWS_SECRET_KEY", &self.aws.secret_key),
            ("SQS_QUEUE_URL", &self.aws.queue_url),
            ("AWS_S3_BUCKET", &self.aws.bucket),
            ("OPENROUTER_API_KEY", &self.openrouter.api_key),
            ("BIDDING_API_BASE_URL", &self.bidding_api.base_url),
        ];

        let mut missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name.to_string())
            .collect();
        if self.bidding_api.timeout_secs == 0 {
            missing.push("BIDDING_API_TIMEOUT".to_string());
        }
        if !missing.is_empty() {
            return Err(ConfigurationError::MissingField(missing));
        }

        self.consumer
            .validate()
            .map_err(|e| ConfigurationError::Invalid(e.to_string()))?;
        self.inference
            .validate()
            .map_err(|e| ConfigurationError::Invalid(e.to_string()))?;

        // The completion deadline must leave room for every retry
        let budget = retry_budget(
            self.openrouter.timeout(),
            self.openrouter.max_retries,
            DEFAULT_BACKOFF_BASE,
        );
        if self.inference.timeout() <= budget {
            return Err(ConfigurationError::Invalid(format!(
                "inference.timeout_secs ({}) must exceed the retry budget of {}s ({} attempts of {}s plus backoff)",
                self.inference.timeout_secs,
                budget.as_secs(),
                self.openrouter.max_retries.max(1),
                self.openrouter.timeout_secs
            )));
        }

        self.models.validate()?;

        Ok(())
    }

    /// Human-readable summary without secrets
    pub fn summary(&self) -> String {
        format!(
            "Listen:        {}\n\
             Log level:     {}\n\
             Region:        {}\n\
             Queue:         {}\n\
             Bucket:        {}\n\
             Inference API: {}\n\
             Bidding API:   {} (timeout {}s)\n\
             Consumer:      {} message(s) per poll, wait {}s\n\
             Models:        {} (default: {})",
            self.server.bind_addr(),
            self.log_level,
            self.aws.region,
            self.aws.queue_url,
            self.aws.bucket,
            self.openrouter.base_url,
            self.bidding_api.base_url,
            self.bidding_api.timeout_secs,
            self.consumer.max_messages,
            self.consumer.wait_time_secs,
            self.models
                .aliases()
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            self.models.default_alias(),
        )
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigurationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigurationError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
