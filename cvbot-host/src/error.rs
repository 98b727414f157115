//! Common error types

/// An alias for Result<T, Error> for convenience.
pub type FunctionResult<T> = std::result::Result<T, Error>;

/// An error during the execution of a Function.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// None of the registered adapters understands the shape of the event.
    #[error("no gateway adapter available for {0} event")]
    UnsupportedEvent(&'static str),

    /// An adapter accepted the event but could not read it.
    #[error("malformed {adapter} event: {source}")]
    MalformedEvent {
        /// The adapter that tried to read the event.
        adapter: &'static str,
        /// What went wrong.
        source: serde_json::Error,
    },

    /// A payload or response could not be serialized.
    #[error("failed to serialize json: {0}")]
    Encoding(#[source] serde_json::Error),

    /// A catch-all error with a message.
    #[error("{0}")]
    MessageError(String),
}
