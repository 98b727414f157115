//! Runs one gateway event through the cvbot function without deploying it.
//!
//! ```text
//! cvbot-invoke                          # a GET / REST API event
//! cvbot-invoke cvbot/events/post-chat.json
//! cat event.json | cvbot-invoke - --raw
//! ```

use std::error::Error;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use cvbot::process;
use cvbot_functions::invoke_template;
use cvbot_host::{environment::FunctionEnvironment, event::GatewayResponse};
use cvbot_log::LogMode;
use itertools::Itertools;
use log::LevelFilter;
use serde_json::Value;

const DEFAULT_EVENT: &str = include_str!("../../events/get-root.json");

#[derive(Debug, Parser)]
#[command(about = "Run a gateway event through the cvbot function locally")]
struct Args {
    /// Event file, or `-` to read stdin. Defaults to a `GET /` REST API event.
    event: Option<PathBuf>,

    /// Print debug logs to stderr.
    #[arg(long)]
    debug: bool,

    /// Print the gateway response as JSON instead of a summary.
    #[arg(long)]
    raw: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let level = if args.debug {
        LevelFilter::Debug
    } else {
        FunctionEnvironment::get_function_environment().log_level()
    };
    cvbot_log::configure_logging(level, LogMode::Stderr)?;

    let event = read_event(args.event.as_deref())?;
    let response = invoke_template(event, process);
    if args.raw {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let response: GatewayResponse = serde_json::from_value(response)?;
    println!("Status Code: {}", response.status_code);
    println!(
        "Headers: {}",
        response
            .headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .join(", ")
    );
    if response.status_code == 200 {
        println!("Success! Body length: {}", response.body.len());
    } else {
        println!("Error: {}", response.body);
    }
    Ok(())
}

fn read_event(path: Option<&Path>) -> Result<Value, Box<dyn Error>> {
    let text = match path {
        None => DEFAULT_EVENT.to_string(),
        Some(path) if path == Path::new("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?,
    };
    Ok(serde_json::from_str(&text)?)
}
