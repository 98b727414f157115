//! `log` adapter for the cvbot function
//!
//! This crate adapts [`log`](https://docs.rs/log) to a Lambda function. The platform
//! captures whatever the function writes to its standard streams and forwards it to
//! the function's log group, so each record becomes one line on a stream.
//!
//! You are likely to be interested in the sibling crates:
//! * `cvbot-functions`: response builders and the invocation entrypoint.
//! * `cvbot-host`: gateway event model and adapters.

use log::SetLoggerError;
use thiserror::Error;

mod stream_logger;

/// Which logging mode to use?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// Write to standard error. This is what the platform forwards by default.
    #[default]
    Stderr,
    /// Write to standard output.
    Stdout,
}

#[derive(Debug, Error)]
pub enum LogConfigError {
    #[error("Failed to initialize stream logger: {cause}")]
    StreamInit { cause: SetLoggerError },
}

/// Initializes the logging system with the specified log level and mode.
///
/// Only the first call installs a logger; later calls return an error.
pub fn configure_logging(level: log::LevelFilter, mode: LogMode) -> Result<(), LogConfigError> {
    stream_logger::StreamLog::init(level, mode)
        .map_err(|e| LogConfigError::StreamInit { cause: e })
}
