//! Convenience constructors for the two tier profiles.

use std::sync::Arc;

use tracing::warn;

use crate::config::ShipperConfig;
use crate::shipper::{LogShipper, ShipperError};
use crate::sink::{ConsoleOnlyShipper, LogSink};

/// Create a shipper from an explicit configuration.
pub fn create_logger(config: ShipperConfig) -> Result<LogShipper, ShipperError> {
    LogShipper::new(config)
}

/// Create a shipper with the frontend profile.
pub fn create_frontend_logger(
    collector_url: impl Into<String>,
    access_token: impl Into<String>,
) -> Result<LogShipper, ShipperError> {
    LogShipper::new(ShipperConfig::frontend(collector_url, access_token))
}

/// Create a shipper with the backend profile.
pub fn create_backend_logger(
    collector_url: impl Into<String>,
    access_token: impl Into<String>,
) -> Result<LogShipper, ShipperError> {
    LogShipper::new(ShipperConfig::backend(collector_url, access_token))
}

/// Create the sink an application should inject into its consumers.
///
/// Falls back to a [`ConsoleOnlyShipper`] when the remote shipper cannot be
/// built, so callers always receive something that accepts records.
pub fn create_logger_or_console(config: ShipperConfig) -> Arc<dyn LogSink> {
    let stack = config.default_stack;

    match LogShipper::new(config) {
        Ok(shipper) => Arc::new(shipper),
        Err(e) => {
            warn!(error = %e, "Remote log shipping unavailable, using console only");
            Arc::new(ConsoleOnlyShipper::new(stack))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Stack;
    use std::time::Duration;

    #[test]
    fn test_frontend_logger_defaults() {
        let shipper = create_frontend_logger("http://collector", "t").unwrap();
        let config = shipper.config();
        assert_eq!(config.default_stack, Stack::Frontend);
        assert!(config.console_echo);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_retry_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_backend_logger_defaults() {
        let shipper = create_backend_logger("http://collector", "t").unwrap();
        let config = shipper.config();
        assert_eq!(config.default_stack, Stack::Backend);
        assert!(!config.console_echo);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.base_retry_delay, Duration::from_millis(2000));
    }

    #[test]
    fn test_create_logger_keeps_config() {
        let config = ShipperConfig::new("http://collector/", "t").with_max_attempts(7);
        let shipper = create_logger(config.clone()).unwrap();
        assert_eq!(shipper.config(), config);
        assert_eq!(shipper.logs_url(), "http://collector/logs");
    }

    #[test]
    fn test_create_logger_or_console_keeps_stack() {
        let config = ShipperConfig::backend("http://collector", "t");
        let sink = create_logger_or_console(config);
        assert_eq!(sink.default_stack(), Stack::Backend);
    }
}
