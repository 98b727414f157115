//! Request routing for the function's single catch-all gateway route.

use cvbot_functions::{WebError, WebResponse, WebResult};
use cvbot_host::{
    encoding::{Html, Json},
    event::{DecodedRequest, JSON_CONTENT_TYPE},
};
use serde::Serialize;
use serde_json::json;
use time::OffsetDateTime;

use crate::chat::{ChatReply, ChatRequest, ChatResponse};

const INDEX_HTML: &str = include_str!("../templates/index.html");
const SERVICE: &str = "cvbot";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Landing,
    Health,
    Chat,
}

impl Route {
    fn of(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Self::Landing),
            "/health" => Some(Self::Health),
            "/chat" => Some(Self::Chat),
            _ => None,
        }
    }

    fn allow(self) -> &'static str {
        match self {
            Self::Landing | Self::Health => "GET, HEAD, OPTIONS",
            Self::Chat => "POST, OPTIONS",
        }
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    service: &'static str,
}

/// Answers one request. Every response except the landing page is JSON.
///
/// `HEAD` gets the status and headers `GET` would, without a body.
pub fn process(request: DecodedRequest) -> WebResult<WebResponse> {
    if request.method != "HEAD" {
        return route(&request);
    }
    match route(&request) {
        Ok(response) => Ok(response.with_body(())?),
        Err(e) => {
            if e.status() >= 500 {
                log::error!("HEAD {} failed: {e}", request.path);
            }
            Ok(WebResponse::new()
                .with_status(e.status())
                .header("content-type", JSON_CONTENT_TYPE))
        }
    }
}

fn route(request: &DecodedRequest) -> WebResult<WebResponse> {
    let Some(route) = Route::of(&request.path) else {
        log::debug!("no route for {}", request.path);
        return Err(WebError::with_status(404, "Not Found"));
    };

    match (route, request.method.as_str()) {
        (Route::Landing, "GET" | "HEAD") => Ok(WebResponse::new()
            .header("content-type", "text/html; charset=utf-8")
            .with_body(Html(INDEX_HTML))?),
        (Route::Health, "GET" | "HEAD") => json(
            200,
            Health {
                status: "healthy",
                service: SERVICE,
            },
        ),
        (Route::Chat, "POST") => chat(request),
        (_, "OPTIONS") => Ok(WebResponse::new()
            .with_status(204)
            .header("allow", route.allow())),
        (_, method) => {
            log::debug!("{method} is not allowed on {}", request.path);
            Ok(json(405, json!({ "error": "Method Not Allowed" }))?.header("allow", route.allow()))
        }
    }
}

fn chat(request: &DecodedRequest) -> WebResult<WebResponse> {
    let chat_request = ChatRequest::from_body(&request.body).map_err(|e| {
        log::info!("rejected chat request {}: {e}", request.context.request_id);
        WebError::with_status(400, e.to_string())
    })?;
    let response = ChatResponse::reply_to(&chat_request, OffsetDateTime::now_utc())?;
    json(200, ChatReply::from(response))
}

fn json(status: u16, body: impl Serialize) -> WebResult<WebResponse> {
    Ok(WebResponse::new()
        .with_status(status)
        .header("content-type", JSON_CONTENT_TYPE)
        .with_body(Json(body))?)
}

#[cfg(test)]
mod tests {
    use cvbot_functions::IntoWebResponse;
    use cvbot_host::event::{InboundEvent, OutboundResult};
    use serde_json::Value;

    use super::*;

    fn call(event: InboundEvent) -> OutboundResult {
        process(event.decode()).response()
    }

    fn body(result: &OutboundResult) -> Value {
        serde_json::from_slice(&result.body).expect("json body")
    }

    #[test]
    fn routes_ignore_trailing_slash() {
        assert_eq!(Route::of("/"), Some(Route::Landing));
        assert_eq!(Route::of("/health/"), Some(Route::Health));
        assert_eq!(Route::of("/chat"), Some(Route::Chat));
        assert_eq!(Route::of("/chatter"), None);
    }

    #[test]
    fn landing_page_is_html() {
        let result = call(InboundEvent::new("GET", "/"));
        assert_eq!(result.status, 200);
        assert_eq!(
            result.headers,
            vec![(
                "content-type".to_string(),
                "text/html; charset=utf-8".to_string()
            )]
        );
        assert_eq!(result.body, INDEX_HTML.as_bytes());
    }

    #[test]
    fn health() {
        let result = call(InboundEvent::new("GET", "/health"));
        assert_eq!(result.status, 200);
        assert_eq!(body(&result), json!({"status": "healthy", "service": "cvbot"}));
    }

    #[test]
    fn head_is_served_like_get_without_a_body() {
        for path in ["/", "/health"] {
            let get = call(InboundEvent::new("GET", path));
            let head = call(InboundEvent::new("HEAD", path));
            assert_eq!(head.status, get.status, "{path}");
            assert_eq!(head.headers, get.headers, "{path}");
            assert!(!get.body.is_empty(), "{path}");
            assert!(head.body.is_empty(), "{path}");
        }
    }

    #[test]
    fn head_errors_have_no_body() {
        let missing = call(InboundEvent::new("HEAD", "/admin"));
        assert_eq!(missing.status, 404);
        assert!(missing.body.is_empty());

        let not_allowed = call(InboundEvent::new("HEAD", "/chat"));
        assert_eq!(not_allowed.status, 405);
        assert!(
            not_allowed
                .headers
                .contains(&("allow".to_string(), "POST, OPTIONS".to_string()))
        );
        assert!(not_allowed.body.is_empty());
    }

    #[test]
    fn unknown_path_is_404() {
        let result = call(InboundEvent::new("GET", "/admin"));
        assert_eq!(result.status, 404);
        assert_eq!(body(&result), json!({"error": "Not Found"}));
    }

    #[test]
    fn wrong_method_is_405() {
        let result = call(InboundEvent::new("GET", "/chat"));
        assert_eq!(result.status, 405);
        assert_eq!(body(&result), json!({"error": "Method Not Allowed"}));
        assert!(
            result
                .headers
                .contains(&("allow".to_string(), "POST, OPTIONS".to_string()))
        );
    }

    #[test]
    fn options_lists_methods() {
        let result = call(InboundEvent::new("OPTIONS", "/health"));
        assert_eq!(result.status, 204);
        assert_eq!(
            result.headers,
            vec![("allow".to_string(), "GET, HEAD, OPTIONS".to_string())]
        );
    }

    #[test]
    fn chat_rejections_are_400() {
        let cases = [
            (None, "No data provided"),
            (Some("{}"), "No data provided"),
            (Some(r#"{"message": ""}"#), "Message is required"),
            (Some(r#"{"name": "kvc"}"#), "Message is required"),
        ];
        for (payload, error) in cases {
            let mut event = InboundEvent::new("POST", "/chat");
            if let Some(payload) = payload {
                event = event.with_body(payload, false);
            }
            let result = call(event);
            assert_eq!(result.status, 400, "{payload:?}");
            assert_eq!(body(&result), json!({ "error": error }), "{payload:?}");
        }
    }

    #[test]
    fn chat_with_unreadable_body() {
        let result = call(InboundEvent::new("POST", "/chat").with_body("{message: hi", false));
        assert_eq!(result.status, 400);
        let error = body(&result)["error"].as_str().map(str::to_string);
        assert!(error.is_some_and(|error| error.starts_with("Invalid JSON: ")));
    }

    #[test]
    fn chat_replies() {
        let result =
            call(InboundEvent::new("POST", "/chat").with_body(r#"{"message": "hi"}"#, false));
        assert_eq!(result.status, 200);
        let reply = body(&result);
        assert_eq!(reply["status"], "success");
        assert_eq!(reply["response"]["message"], "hello world");
        assert!(reply["response"]["timestamp"].is_string());
    }
}
