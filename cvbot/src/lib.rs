//! cvbot: a chat endpoint served as a Lambda function behind API Gateway.
//!
//! The gateway forwards every path and method to one function. [process] routes
//! the decoded request:
//! * `GET /`: the landing page.
//! * `GET /health`: `{"status": "healthy", "service": "cvbot"}`.
//! * `POST /chat` with `{"message": "..."}`: a canned reply.

pub mod chat;
pub mod routes;

pub use routes::process;
