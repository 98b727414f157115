use crate::IntoWebResponse;
use cvbot_host::encoding::{Html, Json, Payload};
use cvbot_host::event::{JSON_CONTENT_TYPE, OutboundResult};
use serde::Serialize;

macro_rules! content_type {
    ($content_type:expr) => {
        vec![("content-type".to_string(), $content_type.to_string())]
    };
}

impl IntoWebResponse for Vec<u8> {
    fn response(self) -> OutboundResult {
        OutboundResult {
            status: 200,
            headers: content_type!("application/octet-stream"),
            body: self,
        }
    }
}

impl IntoWebResponse for String {
    fn response(self) -> OutboundResult {
        OutboundResult {
            status: 200,
            headers: content_type!("text/plain; charset=utf-8"),
            body: self.into_bytes(),
        }
    }
}

impl IntoWebResponse for &str {
    fn response(self) -> OutboundResult {
        OutboundResult {
            status: 200,
            headers: content_type!("text/plain; charset=utf-8"),
            body: self.as_bytes().to_vec(),
        }
    }
}

impl IntoWebResponse for () {
    fn response(self) -> OutboundResult {
        OutboundResult {
            status: 204,
            headers: vec![],
            body: vec![],
        }
    }
}

impl IntoWebResponse for serde_json::Value {
    fn response(self) -> OutboundResult {
        Json(self).response()
    }
}

impl<T: Serialize> IntoWebResponse for Json<T> {
    fn response(self) -> OutboundResult {
        match self.try_serialize() {
            Ok(body) => OutboundResult {
                status: 200,
                headers: content_type!(JSON_CONTENT_TYPE),
                body,
            },
            Err(e) => OutboundResult::error(500, format!("Failed to encode response: {e}")),
        }
    }
}

impl<T: Into<String>> IntoWebResponse for Html<T> {
    fn response(self) -> OutboundResult {
        OutboundResult {
            status: 200,
            headers: content_type!("text/html; charset=utf-8"),
            body: self.0.into().into_bytes(),
        }
    }
}
