//! Configuration module for the log shipper.
//!
//! A `ShipperConfig` is supplied by the embedding application. Only the
//! collector URL and access token are mandatory; everything else falls back
//! to the defaults below.

use std::time::Duration;

use crate::record::Stack;

/// Default number of delivery attempts per record
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay between attempts
pub const DEFAULT_BASE_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend profile attempt count
const BACKEND_MAX_ATTEMPTS: u32 = 5;

/// Backend profile base delay
const BACKEND_BASE_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Configuration for a log shipper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipperConfig {
    /// Base URL of the collector, without the `/logs` suffix
    pub collector_url: String,

    /// Bearer credential attached to every request
    pub access_token: String,

    /// Stack applied by the severity convenience methods
    pub default_stack: Stack,

    /// Echo every record to the local console before delivery
    pub console_echo: bool,

    /// Attempts per record, including the first one
    pub max_attempts: u32,

    /// Base delay; the wait after attempt `n` is `n * base_retry_delay`
    pub base_retry_delay: Duration,

    /// Upper bound on a single HTTP attempt
    pub request_timeout: Duration,
}

impl ShipperConfig {
    /// Create a config with the given collector and token and default settings.
    pub fn new(collector_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            collector_url: collector_url.into(),
            access_token: access_token.into(),
            default_stack: Stack::Frontend,
            console_echo: true,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_retry_delay: DEFAULT_BASE_RETRY_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Frontend profile: console echo on, 3 attempts, 1s base delay.
    pub fn frontend(collector_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::new(collector_url, access_token)
    }

    /// Backend profile: console echo off, 5 attempts, 2s base delay.
    pub fn backend(collector_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::new(collector_url, access_token)
            .with_default_stack(Stack::Backend)
            .with_console_echo(false)
            .with_max_attempts(BACKEND_MAX_ATTEMPTS)
            .with_base_retry_delay(BACKEND_BASE_RETRY_DELAY)
    }

    pub fn with_default_stack(mut self, stack: Stack) -> Self {
        self.default_stack = stack;
        self
    }

    pub fn with_console_echo(mut self, enabled: bool) -> Self {
        self.console_echo = enabled;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_base_retry_delay(mut self, delay: Duration) -> Self {
        self.base_retry_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL of the ingestion endpoint.
    pub fn logs_url(&self) -> String {
        format!("{}/logs", self.collector_url.trim_end_matches('/'))
    }

    /// Number of attempts actually made. A zero setting still makes one.
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}
