//! An example Function that reads a JSON body and returns a JSON response.
//!
//! Invoke this Function with a body like `{"name": "kvc"}` and it will respond with
//! `{"message": "Hello, kvc!"}`. A body without a name is answered with a 400.

use cvbot_functions::{WebError, WebResult};
use cvbot_host::{encoding::Json, event::DecodedRequest};

#[derive(serde::Serialize)]
struct Response {
    message: String,
}

cvbot_functions::web!(greet);
fn greet(request: DecodedRequest) -> WebResult<Json<Response>> {
    let body = request
        .body
        .map_err(|e| WebError::with_status(400, format!("Invalid JSON: {e}")))?;
    let name = body
        .get("name")
        .and_then(|name| name.as_str())
        .ok_or_else(|| WebError::with_status(400, "Name is required"))?;
    Ok(Json(Response {
        message: format!("Hello, {name}!"),
    }))
}
