use cvbot_host::encoding::Payload;
use cvbot_host::event::OutboundResult;
use cvbot_host::FunctionResult;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Values returned by a function implemented with the [crate::web!] macro must implement this trait.
pub trait IntoWebResponse {
    fn response(self) -> OutboundResult;
}

/// A WebError represents an error result produced by a function execution.
/// Functionally, it is also just an HTTP response with a `{"error": ...}` JSON body.
/// It allows for writing functions with a return signature of `WebResult`, where `?`
/// turns any error into a 500 carrying the error's description.
#[derive(Debug)]
pub struct WebError {
    source: Option<Box<dyn Error>>,
    status: u16,
    message: String,
}

impl WebError {
    /// A 500 with the given message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_status(500, message)
    }

    /// An error response with any status, for example a 400 for a request that
    /// failed validation.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            source: None,
            status,
            message: message.into(),
        }
    }

    /// The status code this error will be reported with.
    pub fn status(&self) -> u16 {
        self.status
    }
}

impl<E: Error + 'static> From<E> for WebError {
    fn from(e: E) -> Self {
        Self {
            message: e.to_string(),
            source: Some(Box::new(e)),
            status: 500,
        }
    }
}

impl Display for WebError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{} ({source:?})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// A Result type for implementing functions. Allows you to use `?` within your function body
/// to return a 500 with the error details.
pub type WebResult<T> = Result<T, WebError>;

impl<R> IntoWebResponse for Result<R, WebError>
where
    R: IntoWebResponse,
{
    fn response(self) -> OutboundResult {
        match self {
            Ok(r) => r.response(),
            Err(e) => e.response(),
        }
    }
}

impl IntoWebResponse for WebError {
    fn response(self) -> OutboundResult {
        if self.status >= 500 {
            log::error!("request failed: {self}");
        }
        OutboundResult::error(self.status, self.message)
    }
}

/// This represents a response from a web function.
/// When constructed, it's a 200 response with no headers or body.
/// You can set the status, headers, and body via [WebResponse::with_status], [WebResponse::header],
/// and [WebResponse::with_body] respectfully.
#[derive(Debug)]
pub struct WebResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Default for WebResponse {
    fn default() -> Self {
        Self {
            status: 200,
            headers: vec![],
            body: vec![],
        }
    }
}

impl WebResponse {
    /// Creates a new default response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Adds a header to the response.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Sets the response body. If encoding the body fails, returns an error.
    pub fn with_body<P: Payload>(mut self, body: P) -> FunctionResult<Self> {
        self.body = body.try_serialize()?;
        Ok(self)
    }
}

impl IntoWebResponse for WebResponse {
    fn response(self) -> OutboundResult {
        OutboundResult {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}
