use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use cvbot_host::{
    FunctionResult,
    adapter::Adapters,
    environment::FunctionEnvironment,
    event::{DecodedRequest, OutboundResult},
};
use cvbot_log::LogMode;
use lambda_runtime::{LambdaEvent, service_fn};
use serde_json::{Value, json};

use crate::IntoWebResponse;

/// Create a Lambda function binary whose `main` serves every invocation with `handler`.
///
/// The handler receives the [DecodedRequest] and must return a value which implements
/// the [IntoWebResponse] trait. Implementations of this trait are provided for
/// - [crate::WebResponse]: A basic response representation and builder
/// - `WebResult<impl IntoWebResponse>`: Allows you to return results where errors will be
///   converted to `{"error": ...}` responses.
/// - [()]: Results in an empty 204.
/// - [String] and [&str]: Results in a 200 with the string body.
/// - [cvbot_host::encoding::Json]: Results in a 200 with the Json body, or a 500 if the Json could not be serialized.
/// - [cvbot_host::encoding::Html]: Results in a 200 with an HTML body.
///
/// ```rust,no_run
/// use cvbot_host::{encoding::Json, event::DecodedRequest};
///
/// #[derive(serde::Serialize)]
/// struct Response {
///     path: String,
/// }
///
/// cvbot_functions::web!(echo_path);
/// fn echo_path(request: DecodedRequest) -> Json<Response> {
///     Json(Response { path: request.path })
/// }
/// ```
#[macro_export]
macro_rules! web {
    ($handler: ident) => {
        fn main() -> Result<(), $crate::ServeError> {
            $crate::serve($handler)
        }
    };
}

/// Runs the Lambda runtime loop, answering every event with `handler`.
///
/// Logging is configured from the [FunctionEnvironment] before the first event is read.
pub fn serve<TResponse>(
    handler: fn(request: DecodedRequest) -> TResponse,
) -> Result<(), crate::ServeError>
where
    TResponse: IntoWebResponse + 'static,
{
    let environment = FunctionEnvironment::get_function_environment();
    cvbot_log::configure_logging(environment.log_level(), LogMode::Stderr)?;
    log::info!(
        "starting {} (debug: {})",
        environment.function_name(),
        environment.debug()
    );

    let adapters = Adapters::default();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(lambda_runtime::run(service_fn(
        move |event: LambdaEvent<Value>| {
            log::debug!("received event {}", event.context.request_id);
            let response = invoke_with(&adapters, event.payload, handler);
            async move { Ok::<Value, crate::ServeError>(response) }
        },
    )))
}

/// Handles one gateway event with the default adapters.
pub fn invoke_template<TResponse>(
    event: Value,
    handler: fn(request: DecodedRequest) -> TResponse,
) -> Value
where
    TResponse: IntoWebResponse,
{
    invoke_with(&Adapters::default(), event, handler)
}

/// Handles one gateway event.
///
/// This is the outermost boundary of an invocation: whatever happens while the
/// event is decoded, handled, or encoded, including a panic, the gateway gets a
/// well-formed response with a status code.
pub fn invoke_with<TResponse>(
    adapters: &Adapters,
    event: Value,
    handler: fn(request: DecodedRequest) -> TResponse,
) -> Value
where
    TResponse: IntoWebResponse,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        invoke_unguarded(adapters, event, handler)
    }));
    match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            log::error!("invocation failed: {e}");
            fallback(e.to_string())
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            log::error!("invocation panicked: {message}");
            fallback(message)
        }
    }
}

fn invoke_unguarded<TResponse>(
    adapters: &Adapters,
    event: Value,
    handler: fn(request: DecodedRequest) -> TResponse,
) -> FunctionResult<Value>
where
    TResponse: IntoWebResponse,
{
    let adapter = adapters.select(&event)?;
    let request = adapter.decode(event)?;
    let method = request.method.clone();
    let path = request.path.clone();
    let context = request.context.clone();

    let result = handler(request).response();
    log::info!(
        "{method} {path} -> {status} [{adapter} {stage}] {request_id} from {source_ip}",
        status = result.status,
        adapter = adapter.name(),
        stage = context.stage,
        request_id = context.request_id,
        source_ip = context.source_ip,
    );
    adapter.encode(result)
}

// Built directly so that producing it cannot fail.
fn fallback(message: String) -> Value {
    let result = OutboundResult::error(500, message).encode();
    json!({
        "statusCode": result.status_code,
        "headers": result.headers,
        "body": result.body,
        "isBase64Encoded": result.is_base64_encoded,
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
