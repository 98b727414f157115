//! Gateway adapters
//!
//! An [Adapter] bridges one gateway event format and the canonical
//! [InboundEvent]. [Adapters] holds the registered formats and picks the one
//! that understands a given event.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::{
    Error, FunctionResult,
    event::{DecodedRequest, InboundEvent, OutboundResult, RequestContext},
};

/// Translates between one gateway event format and the plain request/response contract.
pub trait Adapter: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Whether this adapter understands the shape of `event`.
    fn accepts(&self, event: &Value) -> bool;

    /// Reads the event into the canonical request.
    fn inbound(&self, event: Value) -> FunctionResult<InboundEvent>;

    /// Reads the event and parses its body.
    fn decode(&self, event: Value) -> FunctionResult<DecodedRequest> {
        Ok(self.inbound(event)?.decode())
    }

    /// Writes a result in the shape the gateway expects.
    fn encode(&self, result: OutboundResult) -> FunctionResult<Value> {
        serde_json::to_value(result.encode()).map_err(Error::Encoding)
    }
}

/// The set of gateway formats a function understands.
pub struct Adapters {
    adapters: Vec<Box<dyn Adapter>>,
}

impl Default for Adapters {
    /// HTTP API events carry an explicit version, so they are checked before the
    /// REST format, which accepts any object.
    fn default() -> Self {
        Self::empty().with(HttpApiAdapter).with(RestApiAdapter)
    }
}

impl Adapters {
    /// A registry with no adapters. Every event is unsupported.
    pub fn empty() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Registers another adapter. Earlier registrations are checked first.
    pub fn with(mut self, adapter: impl Adapter + 'static) -> Self {
        self.adapters.push(Box::new(adapter));
        self
    }

    /// Finds the first adapter that accepts `event`.
    pub fn select(&self, event: &Value) -> FunctionResult<&dyn Adapter> {
        self.adapters
            .iter()
            .find(|adapter| adapter.accepts(event))
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| Error::UnsupportedEvent(kind(event)))
    }
}

fn kind(event: &Value) -> &'static str {
    match event {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn lowercase_keys(headers: Option<HashMap<String, String>>) -> HashMap<String, String> {
    headers
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value))
        .collect()
}

/// API Gateway REST API proxy integration events (payload format 1.0).
///
/// Missing fields are defaulted, so any JSON object is accepted.
pub struct RestApiAdapter;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RestApiEvent {
    http_method: Option<String>,
    path: Option<String>,
    headers: Option<HashMap<String, String>>,
    query_string_parameters: Option<HashMap<String, String>>,
    body: Option<String>,
    is_base64_encoded: Option<bool>,
    request_context: Option<RestApiRequestContext>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RestApiRequestContext {
    http_method: Option<String>,
    stage: Option<String>,
    request_id: Option<String>,
    identity: Option<RestApiIdentity>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RestApiIdentity {
    source_ip: Option<String>,
}

impl Adapter for RestApiAdapter {
    fn name(&self) -> &'static str {
        "rest-api"
    }

    fn accepts(&self, event: &Value) -> bool {
        event.is_object()
    }

    fn inbound(&self, event: Value) -> FunctionResult<InboundEvent> {
        let event: RestApiEvent =
            serde_json::from_value(event).map_err(|source| Error::MalformedEvent {
                adapter: self.name(),
                source,
            })?;
        let request_context = event.request_context.unwrap_or_default();
        let defaults = RequestContext::default();

        Ok(InboundEvent {
            method: event
                .http_method
                .or(request_context.http_method)
                .unwrap_or_else(|| "GET".to_string()),
            path: event.path.unwrap_or_else(|| "/".to_string()),
            headers: lowercase_keys(event.headers),
            query_parameters: event.query_string_parameters.unwrap_or_default(),
            body: event.body.map(String::into_bytes),
            is_base64_encoded: event.is_base64_encoded.unwrap_or(false),
            context: RequestContext {
                stage: request_context.stage.unwrap_or(defaults.stage),
                request_id: request_context.request_id.unwrap_or(defaults.request_id),
                source_ip: request_context
                    .identity
                    .and_then(|identity| identity.source_ip)
                    .unwrap_or(defaults.source_ip),
            },
        })
    }
}

/// API Gateway HTTP API events (payload format 2.0).
pub struct HttpApiAdapter;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct HttpApiEvent {
    raw_path: Option<String>,
    cookies: Option<Vec<String>>,
    headers: Option<HashMap<String, String>>,
    query_string_parameters: Option<HashMap<String, String>>,
    body: Option<String>,
    is_base64_encoded: Option<bool>,
    request_context: Option<HttpApiRequestContext>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct HttpApiRequestContext {
    stage: Option<String>,
    request_id: Option<String>,
    http: Option<HttpApiHttp>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct HttpApiHttp {
    method: Option<String>,
    path: Option<String>,
    source_ip: Option<String>,
}

impl Adapter for HttpApiAdapter {
    fn name(&self) -> &'static str {
        "http-api"
    }

    fn accepts(&self, event: &Value) -> bool {
        event.get("version").and_then(Value::as_str) == Some("2.0")
    }

    fn inbound(&self, event: Value) -> FunctionResult<InboundEvent> {
        let event: HttpApiEvent =
            serde_json::from_value(event).map_err(|source| Error::MalformedEvent {
                adapter: self.name(),
                source,
            })?;
        let request_context = event.request_context.unwrap_or_default();
        let http = request_context.http.unwrap_or_default();
        let defaults = RequestContext::default();
        let stage = request_context.stage.unwrap_or(defaults.stage);

        let path = http
            .path
            .or(event.raw_path)
            .unwrap_or_else(|| "/".to_string());
        let path = strip_stage(path, &stage);

        let mut headers = lowercase_keys(event.headers);
        if let Some(cookies) = event.cookies.filter(|cookies| !cookies.is_empty()) {
            headers.insert("cookie".to_string(), cookies.join("; "));
        }

        Ok(InboundEvent {
            method: http.method.unwrap_or_else(|| "GET".to_string()),
            path,
            headers,
            query_parameters: event.query_string_parameters.unwrap_or_default(),
            body: event.body.map(String::into_bytes),
            is_base64_encoded: event.is_base64_encoded.unwrap_or(false),
            context: RequestContext {
                stage,
                request_id: request_context.request_id.unwrap_or(defaults.request_id),
                source_ip: http.source_ip.unwrap_or(defaults.source_ip),
            },
        })
    }
}

// Named HTTP API stages show up as a path prefix; `$default` does not.
fn strip_stage(path: String, stage: &str) -> String {
    if stage == "$default" {
        return path;
    }
    let prefix = format!("/{stage}");
    match path.strip_prefix(&prefix) {
        Some("") => "/".to_string(),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rest_api_defaults_missing_fields() {
        let adapters = Adapters::default();
        let event = json!({});
        let adapter = adapters.select(&event).expect("objects are accepted");
        assert_eq!(adapter.name(), "rest-api");

        let inbound = adapter.inbound(event).expect("defaults fill the event");
        assert_eq!(inbound, InboundEvent::new("GET", "/"));
    }

    #[test]
    fn rest_api_reads_fields() {
        let event = json!({
            "httpMethod": "POST",
            "path": "/chat",
            "headers": {"Content-Type": "application/json"},
            "queryStringParameters": null,
            "pathParameters": null,
            "body": "{\"message\":\"hi\"}",
            "isBase64Encoded": false,
            "requestContext": {
                "stage": "prod",
                "requestId": "abc-123",
                "identity": {"sourceIp": "192.168.1.1"}
            }
        });
        let inbound = RestApiAdapter.inbound(event).expect("well-formed event");
        assert_eq!(inbound.context.stage, "prod");
        assert_eq!(inbound.method, "POST");
        assert_eq!(inbound.path, "/chat");
        assert_eq!(inbound.headers["content-type"], "application/json");
        assert_eq!(inbound.body.as_deref(), Some(br#"{"message":"hi"}"#.as_slice()));
        assert_eq!(inbound.context.request_id, "abc-123");
        assert_eq!(inbound.context.source_ip, "192.168.1.1");
    }

    #[test]
    fn rest_api_method_falls_back_to_request_context() {
        let event = json!({"requestContext": {"httpMethod": "DELETE"}});
        let inbound = RestApiAdapter.inbound(event).expect("well-formed event");
        assert_eq!(inbound.method, "DELETE");
    }

    #[test]
    fn rest_api_rejects_wrongly_typed_fields() {
        let event = json!({"httpMethod": 7});
        assert!(matches!(
            RestApiAdapter.inbound(event),
            Err(Error::MalformedEvent {
                adapter: "rest-api",
                ..
            })
        ));
    }

    #[test]
    fn http_api_reads_fields() {
        let event = json!({
            "version": "2.0",
            "rawPath": "/prod/chat",
            "cookies": ["a=1", "b=2"],
            "headers": {"content-type": "application/json"},
            "body": "eyJtZXNzYWdlIjoiaGkifQ==",
            "isBase64Encoded": true,
            "requestContext": {
                "stage": "prod",
                "requestId": "xyz",
                "http": {"method": "POST", "path": "/prod/chat", "sourceIp": "10.0.0.1"}
            }
        });
        let adapters = Adapters::default();
        let adapter = adapters.select(&event).expect("version 2.0 is accepted");
        assert_eq!(adapter.name(), "http-api");

        let request = adapter.decode(event).expect("well-formed event");
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/chat");
        assert_eq!(request.header("cookie"), Some("a=1; b=2"));
        assert_eq!(request.context.request_id, "xyz");
        assert_eq!(request.context.stage, "prod");
        assert_eq!(request.context.source_ip, "10.0.0.1");
        assert_eq!(request.body, Ok(json!({"message": "hi"})));
    }

    #[test]
    fn default_stage_keeps_path() {
        assert_eq!(strip_stage("/chat".to_string(), "$default"), "/chat");
        assert_eq!(strip_stage("/prod".to_string(), "prod"), "/");
        assert_eq!(strip_stage("/production".to_string(), "prod"), "/production");
    }

    #[test]
    fn non_objects_are_unsupported() {
        let adapters = Adapters::default();
        for event in [json!([1, 2]), json!("GET /"), json!(null)] {
            assert!(matches!(
                adapters.select(&event),
                Err(Error::UnsupportedEvent(_))
            ));
        }
        let error = adapters
            .select(&json!(["GET"]))
            .err()
            .map(|e| e.to_string());
        assert_eq!(
            error.as_deref(),
            Some("no gateway adapter available for array event")
        );
    }

    #[test]
    fn empty_registry_supports_nothing() {
        assert!(Adapters::empty().select(&json!({})).is_err());
    }
}
