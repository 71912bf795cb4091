//! Queue messages and the processing requests they carry

use serde_json::{json, Value};
use thiserror::Error;

/// A message received from the work queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// Provider-assigned message id, if any (logging only)
    pub message_id: Option<String>,

    /// Raw body, usually JSON
    pub body: String,

    /// Token used to acknowledge (delete) this delivery
    pub ack_token: String,
}

impl QueueMessage {
    /// Create a message with no provider id
    pub fn new(body: impl Into<String>, ack_token: impl Into<String>) -> Self {
        Self {
            message_id: None,
            body: body.into(),
            ack_token: ack_token.into(),
        }
    }
}

/// Interpretation of a raw message body
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    /// Empty or whitespace-only body
    Empty,

    /// Body parsed as JSON
    Json(Value),

    /// Body that is not JSON
    Text(String),
}

impl MessageBody {
    /// Classify a raw body
    ///
    /// # Examples
    ///
    /// ```
    /// use edict_domain::MessageBody;
    ///
    /// assert_eq!(MessageBody::parse("  "), MessageBody::Empty);
    /// assert!(matches!(MessageBody::parse(r#"{"id": "B1"}"#), MessageBody::Json(_)));
    /// assert!(matches!(MessageBody::parse("hello"), MessageBody::Text(_)));
    /// ```
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return MessageBody::Empty;
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(value) => MessageBody::Json(value),
            Err(_) => MessageBody::Text(raw.to_string()),
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            MessageBody::Empty => "empty",
            MessageBody::Json(_) => "json",
            MessageBody::Text(_) => "text",
        }
    }

    /// Content handed to the message processor
    ///
    /// Text bodies are wrapped as `{"message": <raw>, "type": "text"}`.
    /// Empty bodies have no content.
    pub fn into_content(self) -> Option<Value> {
        match self {
            MessageBody::Empty => None,
            MessageBody::Json(value) => Some(value),
            MessageBody::Text(raw) => Some(json!({ "message": raw, "type": "text" })),
        }
    }
}

/// Reasons a payload is not a valid processing request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Payload is not a JSON object
    #[error("Payload is not a JSON object")]
    NotAnObject,

    /// A required field is absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// A validated request to build the checklist for one bidding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingRequest {
    /// Bidding identifier on the external API (wire key `id`)
    pub bidding_id: String,

    /// URL or key of the notice PDF (wire key `filename`)
    pub document_reference: String,

    /// Model alias requested by the producer (wire key `model`)
    pub model_preference: Option<String>,
}

impl ProcessingRequest {
    /// Parse a message payload
    ///
    /// `id` may be a string or an integer. Blank strings count as missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use edict_domain::ProcessingRequest;
    /// use serde_json::json;
    ///
    /// let request = ProcessingRequest::from_value(&json!({
    ///     "id": "B1",
    ///     "filename": "https://x/a%2Fb.pdf",
    /// })).unwrap();
    /// assert_eq!(request.bidding_id, "B1");
    /// assert_eq!(request.model_preference, None);
    /// ```
    pub fn from_value(payload: &Value) -> Result<Self, RequestError> {
        let obj = payload.as_object().ok_or(RequestError::NotAnObject)?;

        let bidding_id = match obj.get("id") {
            Some(Value::String(s)) => non_blank(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
        .ok_or(RequestError::MissingField("id"))?;

        let document_reference = obj
            .get("filename")
            .and_then(Value::as_str)
            .and_then(non_blank)
            .ok_or(RequestError::MissingField("filename"))?;

        let model_preference = obj.get("model").and_then(Value::as_str).and_then(non_blank);

        Ok(Self {
            bidding_id,
            document_reference,
            model_preference,
        })
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
