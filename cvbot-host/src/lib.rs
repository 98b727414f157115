#![deny(missing_docs)]

//! Gateway-facing tools for the cvbot function
//!
//! This crate sits between the HTTP gateway and the application. It knows the
//! shapes of the events API Gateway delivers to a Lambda function, turns them
//! into one canonical request, and turns the application's result back into the
//! response shape the gateway expects.
//!
//! You are likely to be interested in the sibling crates:
//! * `cvbot-functions`: response builders and the invocation entrypoint.
//! * `cvbot-log`: Standard `log` adapter.

pub mod adapter;
pub mod body;
pub mod encoding;
pub mod environment;
mod error;
pub mod event;

pub use body::BodyError;
pub use error::{Error, FunctionResult};
