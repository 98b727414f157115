//! The chat operation: validate a submitted message and produce the reply.

use cvbot_host::BodyError;
use serde::Serialize;
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// What the bot currently says to everything.
pub const REPLY: &str = "hello world";

/// Why a chat submission was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("No data provided")]
    NoData,
    #[error("Message is required")]
    MessageRequired,
}

/// A validated chat submission. The message is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Result<Self, ChatError> {
        let message = message.into();
        if message.is_empty() {
            return Err(ChatError::MessageRequired);
        }
        Ok(Self { message })
    }

    /// Validates a decoded request body.
    ///
    /// An empty body (`{}`, `null`, `[]`, or no body at all) is "no data", which is
    /// reported separately from a body that has data but no usable `message`.
    pub fn from_body(body: &Result<Value, BodyError>) -> Result<Self, ChatError> {
        let body = body
            .as_ref()
            .map_err(|e| ChatError::InvalidJson(e.to_string()))?;
        if is_empty(body) {
            return Err(ChatError::NoData);
        }
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Self::new(message)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// The bot's answer to one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub timestamp: String,
}

impl ChatResponse {
    pub fn reply_to(request: &ChatRequest, now: OffsetDateTime) -> Result<Self, time::error::Format> {
        log::debug!("replying to a {} byte message", request.message().len());
        Ok(Self {
            message: REPLY.to_string(),
            timestamp: now.format(&Rfc3339)?,
        })
    }
}

/// The envelope `POST /chat` answers with.
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub status: &'static str,
    pub response: ChatResponse,
}

impl From<ChatResponse> for ChatReply {
    fn from(response: ChatResponse) -> Self {
        Self {
            status: "success",
            response,
        }
    }
}
