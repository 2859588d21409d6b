//! Log Shipper demo - ships a single record to a collector
//!
//! Stands in for an embedding application: it reads where the collector lives
//! from the environment, injects a sink, and logs one record.
//!
//! ## Usage
//!
//! ```text
//! log-shipper <level> <package> <message...>
//! ```
//!
//! ## Configuration
//!
//! - `LOG_SHIPPER_COLLECTOR_URL`: Collector base URL (default: http://localhost:8000)
//! - `LOG_SHIPPER_ACCESS_TOKEN`: Bearer token (required)
//! - `LOG_SHIPPER_PROFILE`: `frontend` or `backend` (default: frontend)
//! - `RUST_LOG`: Logging level filter (default: info)

use std::env;

use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use log_shipper::{create_logger_or_console, LogLevel, ShipperConfig, Stack};

/// Default collector URL for local development
const DEFAULT_COLLECTOR_URL: &str = "http://localhost:8000";

/// Error type for invalid demo invocations
#[derive(Debug, Error)]
enum DemoError {
    #[error("Configuration error for {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("usage: log-shipper <level> <package> <message...>")]
    Usage,

    #[error(transparent)]
    Token(#[from] log_shipper::ParseTokenError),
}

/// One record to ship, parsed from argv.
#[derive(Debug)]
struct Invocation {
    level: LogLevel,
    package: String,
    message: String,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match load_config() {
        Ok(config) => {
            info!(
                collector_url = %config.collector_url,
                stack = %config.default_stack,
                max_attempts = config.max_attempts,
                "Configuration loaded"
            );
            config
        }
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    let invocation = match parse_args(env::args().skip(1)) {
        Ok(invocation) => invocation,
        Err(e) => {
            error!(error = %e, "Invalid arguments");
            std::process::exit(2);
        }
    };

    let sink = create_logger_or_console(config);
    let stack = sink.default_stack();

    match sink
        .log(stack, invocation.level, &invocation.package, &invocation.message)
        .await
    {
        Some(ack) => info!(log_id = %ack.log_id, message = %ack.message, "Record delivered"),
        None => info!("Record not delivered"),
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Build a shipper configuration from environment variables.
fn load_config() -> Result<ShipperConfig, DemoError> {
    let collector_url = env::var("LOG_SHIPPER_COLLECTOR_URL")
        .unwrap_or_else(|_| DEFAULT_COLLECTOR_URL.to_string());

    let access_token = env::var("LOG_SHIPPER_ACCESS_TOKEN").map_err(|_| DemoError::Env {
        var: "LOG_SHIPPER_ACCESS_TOKEN",
        message: "must be set".to_string(),
    })?;

    let profile = match env::var("LOG_SHIPPER_PROFILE") {
        Ok(value) => value.parse::<Stack>().map_err(|e| DemoError::Env {
            var: "LOG_SHIPPER_PROFILE",
            message: e.to_string(),
        })?,
        Err(_) => Stack::Frontend,
    };

    Ok(match profile {
        Stack::Frontend => ShipperConfig::frontend(collector_url, access_token),
        Stack::Backend => ShipperConfig::backend(collector_url, access_token),
    })
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Invocation, DemoError> {
    let level = args.next().ok_or(DemoError::Usage)?.parse::<LogLevel>()?;
    let package = args.next().ok_or(DemoError::Usage)?;
    let message = args.collect::<Vec<_>>().join(" ");

    if message.is_empty() {
        return Err(DemoError::Usage);
    }

    Ok(Invocation {
        level,
        package,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args() {
        let invocation = parse_args(args(&["warn", "api", "slow", "response"])).unwrap();
        assert_eq!(invocation.level, LogLevel::Warn);
        assert_eq!(invocation.package, "api");
        assert_eq!(invocation.message, "slow response");
    }

    #[test]
    fn test_parse_args_rejects_unknown_level() {
        let err = parse_args(args(&["loud", "api", "x"])).unwrap_err();
        assert!(matches!(err, DemoError::Token(_)));
    }

    #[test]
    fn test_parse_args_requires_message() {
        assert!(matches!(parse_args(args(&["info", "api"])), Err(DemoError::Usage)));
        assert!(matches!(parse_args(args(&[])), Err(DemoError::Usage)));
    }
}
