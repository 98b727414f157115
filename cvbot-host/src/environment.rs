//! Process-wide configuration read from the function's environment

use std::{env, sync::LazyLock};

use log::LevelFilter;

static NOT_FOUND: &str = "<not found>";
// The environment of a function does not change after it starts, so it is read once.
static GET_ENVIRONMENT_ONCE: LazyLock<FunctionEnvironment> =
    LazyLock::new(|| FunctionEnvironment::from_lookup(|key| env::var(key).ok()));

/// Data structure containing easy-to-access configuration for the running function.
///
/// ```rust,no_run
/// use cvbot_host::environment::FunctionEnvironment;
/// let function_environment = FunctionEnvironment::get_function_environment();
///
/// log::info!("Function: {}", function_environment.function_name());
/// log::info!("Debug: {}", function_environment.debug());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEnvironment {
    function_name: String,
    debug: bool,
    log_level: LevelFilter,
}

impl FunctionEnvironment {
    /// Returns a singleton object built from the process environment. This is safe
    /// to call multiple times.
    pub fn get_function_environment() -> &'static FunctionEnvironment {
        &GET_ENVIRONMENT_ONCE
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Recognized variables:
    /// * `CVBOT_DEBUG` (or `FLASK_DEBUG`): `true`, `1`, `yes` or `on` turn on debug logging.
    /// * `CVBOT_LOG_LEVEL`: an explicit level filter, overriding the debug default.
    /// * `AWS_LAMBDA_FUNCTION_NAME`: set by the Lambda platform.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let debug = lookup("CVBOT_DEBUG")
            .or_else(|| lookup("FLASK_DEBUG"))
            .is_some_and(|value| parse_flag(&value));
        let default_level = if debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        let log_level = match lookup("CVBOT_LOG_LEVEL") {
            Some(level) => level.trim().parse().unwrap_or(default_level),
            None => default_level,
        };
        let function_name =
            lookup("AWS_LAMBDA_FUNCTION_NAME").unwrap_or_else(|| NOT_FOUND.to_string());
        Self {
            function_name,
            debug,
            log_level,
        }
    }

    /// The name of the function, as deployed.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Whether local diagnostic verbosity was requested. This never changes
    /// what the function returns.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// The level filter the function's logger should use.
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
