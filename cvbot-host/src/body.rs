//! Request body decoding
//!
//! Gateways hand over bodies in whatever shape the client and the integration
//! settled on: plain JSON, base64 of JSON when the gateway treated the body as
//! binary, or text with a byte order mark or a stray invalid byte. Each
//! [Strategy] tries one reading of the bytes and the first success wins.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Map, Value};

/// The body could not be read as JSON.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BodyError {
    /// Every strategy failed. Carries the description of the first failure.
    #[error("{0}")]
    Malformed(String),
}

/// One way of reading raw body bytes as a JSON value.
pub type Strategy = fn(&[u8]) -> Result<Value, String>;

/// Body strategies in the order they are attempted.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("json", parse_json),
    ("base64", parse_base64_json),
    ("text", parse_text_json),
];

/// Decode a request body into a JSON value.
///
/// An absent or zero-length body is not malformed: it decodes to an empty object.
/// A body of only whitespace is data, and goes through the strategies like any other.
pub fn decode_body(raw: Option<&[u8]>) -> Result<Value, BodyError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(Value::Object(Map::new())),
    };

    let mut first_failure = None;
    for (name, strategy) in STRATEGIES {
        match strategy(raw) {
            Ok(value) => {
                log::debug!("decoded request body with the {name} strategy");
                return Ok(value);
            }
            Err(e) => {
                log::debug!("{name} body strategy failed: {e}");
                first_failure.get_or_insert(e);
            }
        }
    }
    Err(BodyError::Malformed(
        first_failure.unwrap_or_else(|| "no body strategy available".to_string()),
    ))
}

fn parse_json(raw: &[u8]) -> Result<Value, String> {
    serde_json::from_slice(raw).map_err(|e| e.to_string())
}

fn parse_base64_json(raw: &[u8]) -> Result<Value, String> {
    let decoded = STANDARD.decode(raw.trim_ascii()).map_err(|e| e.to_string())?;
    serde_json::from_slice(&decoded).map_err(|e| e.to_string())
}

fn parse_text_json(raw: &[u8]) -> Result<Value, String> {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim_start_matches('\u{feff}').trim();
    serde_json::from_str(text).map_err(|e| e.to_string())
}
