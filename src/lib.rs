//! Log Shipper Library
//!
//! A best-effort client that ships structured log records to a remote HTTP
//! collector. Logging never breaks the application: every call resolves, and
//! failures show up only on the local console.
//!
//! - **record**: record, level, stack and acknowledgement types
//! - **config**: shipper configuration and tier profiles
//! - **console**: console echo formatting and output sinks
//! - **shipper**: remote shipper with bounded retry and linear backoff
//! - **sink**: the shipping capability and its console-only fallback
//! - **factory**: convenience constructors
//!
//! # Example
//!
//! ```no_run
//! use log_shipper::factory::create_logger_or_console;
//! use log_shipper::record::package;
//! use log_shipper::{LogSink, ShipperConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     // Build once at startup and hand the sink to every consumer
//!     let sink = create_logger_or_console(ShipperConfig::frontend(
//!         "http://localhost:8000",
//!         "secret-token",
//!     ));
//!
//!     sink.warn(package::API, "shorten request took 4s").await;
//! }
//! ```

// Module declarations
pub mod config;
pub mod console;
pub mod factory;
pub mod record;
pub mod shipper;
pub mod sink;

// Re-export commonly used types at crate root for convenience
pub use config::ShipperConfig;
pub use console::{CapturedConsole, Console, ConsoleChannel, TracingConsole};
pub use factory::{
    create_backend_logger, create_frontend_logger, create_logger, create_logger_or_console,
};
pub use record::{DeliveryResponse, LogLevel, LogRecord, ParseTokenError, Stack};
pub use shipper::{DeliveryError, LogShipper, ShipperError, ShipperStats};
pub use sink::{dispatch, ConsoleOnlyShipper, LogSink};
