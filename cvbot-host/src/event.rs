//! Canonical request and response types shared by every gateway adapter

use std::collections::{BTreeMap, HashMap};

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::body::{BodyError, decode_body};

/// Content type attached to responses that do not name their own.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Metadata about the request that the gateway attaches to the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Deployment stage, e.g. `prod`.
    pub stage: String,
    /// The gateway's id for this request.
    pub request_id: String,
    /// Address of the caller.
    pub source_ip: String,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            stage: "prod".to_string(),
            request_id: "lambda-request".to_string(),
            source_ip: "127.0.0.1".to_string(),
        }
    }
}

/// One inbound HTTP request, normalized from whichever event shape the gateway delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Request path relative to the deployment, always starting with `/`.
    pub path: String,
    /// Request headers. Names are lower-cased.
    pub headers: HashMap<String, String>,
    /// Query string parameters. Repeated parameters keep the last value.
    pub query_parameters: HashMap<String, String>,
    /// The body as it appeared in the event, if there was one.
    pub body: Option<Vec<u8>>,
    /// Whether the gateway base64-encoded the body.
    pub is_base64_encoded: bool,
    /// Gateway metadata.
    pub context: RequestContext,
}

impl Default for InboundEvent {
    fn default() -> Self {
        Self::new("GET", "/")
    }
}

impl InboundEvent {
    /// Creates a bodiless request.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: HashMap::new(),
            query_parameters: HashMap::new(),
            body: None,
            is_base64_encoded: false,
            context: RequestContext::default(),
        }
    }

    /// Adds a header. The name is lower-cased.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets the body and whether the gateway base64-encoded it.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>, is_base64_encoded: bool) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = is_base64_encoded;
        self
    }

    /// Parses the body and produces the request handed to the application.
    ///
    /// This never fails: a body that cannot be read is recorded on the
    /// returned request instead.
    pub fn decode(self) -> DecodedRequest {
        let Self {
            method,
            path,
            headers,
            query_parameters,
            body,
            is_base64_encoded,
            context,
        } = self;

        let body = body.map(|raw| {
            if !is_base64_encoded {
                return raw;
            }
            match STANDARD.decode(raw.trim_ascii()) {
                Ok(decoded) => decoded,
                Err(e) => {
                    log::debug!("body flagged as base64 but is not: {e}");
                    raw
                }
            }
        });

        DecodedRequest {
            method: method.to_ascii_uppercase(),
            path: if path.is_empty() { "/".to_string() } else { path },
            headers,
            query_parameters,
            context,
            body: decode_body(body.as_deref()),
        }
    }
}

/// A request whose body has been parsed, or whose parse failure has been recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRequest {
    /// Upper-cased HTTP method.
    pub method: String,
    /// Request path, always starting with `/`.
    pub path: String,
    /// Request headers. Names are lower-cased.
    pub headers: HashMap<String, String>,
    /// Query string parameters.
    pub query_parameters: HashMap<String, String>,
    /// Gateway metadata: stage, request id and caller address.
    pub context: RequestContext,
    /// The parsed body. An absent body is an empty object.
    pub body: Result<Value, BodyError>,
}

impl DecodedRequest {
    /// Looks up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// What the application wants to send back, before the gateway shape is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundResult {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, as supplied.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl OutboundResult {
    /// A JSON `{"error": message}` result.
    pub fn error(status: u16, message: impl AsRef<str>) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
            body: json!({ "error": message.as_ref() }).to_string().into_bytes(),
        }
    }

    /// Applies the gateway's response shape.
    ///
    /// Text bodies are passed through; anything that is not UTF-8 is base64-encoded
    /// and flagged. A JSON content type is attached when none was supplied.
    pub fn encode(self) -> GatewayResponse {
        let mut headers: BTreeMap<String, String> = self.headers.into_iter().collect();
        if !headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("content-type"))
        {
            headers.insert("content-type".to_string(), JSON_CONTENT_TYPE.to_string());
        }
        let (body, is_base64_encoded) = match String::from_utf8(self.body) {
            Ok(text) => (text, false),
            Err(e) => (STANDARD.encode(e.into_bytes()), true),
        };
        GatewayResponse {
            status_code: self.status,
            headers,
            body,
            is_base64_encoded,
        }
    }
}

/// The response shape API Gateway expects from a proxy integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    pub headers: BTreeMap<String, String>,
    /// Response body text, base64 when `is_base64_encoded` is set.
    pub body: String,
    /// Whether `body` is base64.
    pub is_base64_encoded: bool,
}

impl GatewayResponse {
    /// Parses the body as JSON.
    pub fn json_body(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_flagged_body_decodes_like_plain_json() {
        let encoded = STANDARD.encode(br#"{"message":"hi"}"#);
        let flagged = InboundEvent::new("POST", "/chat")
            .with_body(encoded, true)
            .decode();
        let plain = InboundEvent::new("POST", "/chat")
            .with_body(r#"{"message":"hi"}"#, false)
            .decode();
        assert_eq!(flagged.body, plain.body);
        assert_eq!(flagged.body, Ok(json!({"message": "hi"})));
    }

    #[test]
    fn wrongly_flagged_body_still_decodes() {
        let request = InboundEvent::new("POST", "/chat")
            .with_body(r#"{"message":"hi"}"#, true)
            .decode();
        assert_eq!(request.body, Ok(json!({"message": "hi"})));
    }

    #[test]
    fn decode_normalizes_method_and_path() {
        let request = InboundEvent::new("post", "")
            .with_header("Content-Type", "application/json")
            .decode();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/");
        assert_eq!(request.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(request.context, RequestContext::default());
        assert_eq!(request.body, Ok(json!({})));
    }

    #[test]
    fn encode_attaches_json_content_type() {
        let response = OutboundResult {
            status: 201,
            headers: vec![("x-extra".to_string(), "1".to_string())],
            body: b"{}".to_vec(),
        }
        .encode();
        assert_eq!(response.status_code, 201);
        assert_eq!(response.headers["content-type"], JSON_CONTENT_TYPE);
        assert_eq!(response.headers["x-extra"], "1");
        assert_eq!(response.body, "{}");
        assert!(!response.is_base64_encoded);
    }

    #[test]
    fn encode_keeps_supplied_content_type() {
        let response = OutboundResult {
            status: 200,
            headers: vec![("Content-Type".to_string(), "text/html".to_string())],
            body: b"<p>hi</p>".to_vec(),
        }
        .encode();
        assert_eq!(response.headers.len(), 1);
        assert_eq!(response.headers["Content-Type"], "text/html");
    }

    #[test]
    fn encode_flags_binary_bodies() {
        let response = OutboundResult {
            status: 200,
            headers: vec![],
            body: vec![0xff, 0x00],
        }
        .encode();
        assert!(response.is_base64_encoded);
        assert_eq!(response.body, STANDARD.encode([0xff, 0x00]));
    }

    #[test]
    fn error_results_are_json() {
        let response = OutboundResult::error(500, "boom").encode();
        assert_eq!(response.status_code, 500);
        assert_eq!(response.json_body().ok(), Some(json!({"error": "boom"})));
    }

    #[test]
    fn gateway_response_wire_names() {
        let value = serde_json::to_value(OutboundResult::error(400, "nope").encode())
            .expect("response serializes");
        assert_eq!(value["statusCode"], 400);
        assert_eq!(value["isBase64Encoded"], false);
        assert_eq!(value["headers"]["content-type"], JSON_CONTENT_TYPE);
        assert!(value["body"].is_string());
    }
}
