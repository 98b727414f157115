//! Response builders and the invocation entrypoint for the cvbot function
//!
//! This crate turns a plain Rust handler into a Lambda function behind API Gateway.
//! The [web!] macro generates the binary's `main`; [invoke_template] runs a single
//! gateway event through the same path, which is what tests and local tooling use.
//!
//! You are likely to be interested in the sibling crates:
//! * `cvbot-host`: gateway event model, adapters, and payload encodings.
//! * `cvbot-log`: Standard `log` adapter.
mod encode_response_bridge;
mod macros;
mod response;

pub use macros::function_web::{invoke_template, invoke_with, serve};
pub use response::{IntoWebResponse, WebError, WebResponse, WebResult};

/// The error a function binary exits with when the runtime loop cannot run.
pub type ServeError = lambda_runtime::Error;
