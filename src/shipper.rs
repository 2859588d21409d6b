//! Remote log shipper.
//!
//! `LogShipper` posts each record to the collector's `/logs` endpoint with
//! bounded, linearly backed-off retries. Delivery failures never reach the
//! caller: they are reported on the local console (when echo is enabled) and
//! surface as `None`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::config::ShipperConfig;
use crate::console::{self, Console, ConsoleChannel, TracingConsole};
use crate::record::{DeliveryResponse, LogRecord, Stack};
use crate::sink::LogSink;

/// Errors that can occur while constructing a shipper.
#[derive(Debug, Error)]
pub enum ShipperError {
    /// The underlying HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Outcome of a single failed delivery attempt.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Collector answered with something other than 200
    #[error("Collector returned {code}: {message}")]
    Status { code: StatusCode, message: String },

    /// Collector answered 200 with nothing in the body
    #[error("Collector returned an empty response body")]
    EmptyBody,

    /// Response body was not a valid acknowledgement
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DeliveryError::Timeout
        } else {
            DeliveryError::Request(err)
        }
    }
}

impl DeliveryError {
    /// Only credential rejections (401/403) are final; everything else may
    /// succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            DeliveryError::Status { code, .. }
                if *code == StatusCode::UNAUTHORIZED || *code == StatusCode::FORBIDDEN
        )
    }
}

/// Delay before attempt `attempt + 1` after attempt `attempt` failed.
///
/// Grows linearly with the attempt index: `base * attempt`.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt)
}

/// Whole milliseconds in `delay`, saturating at `u64::MAX`.
fn delay_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// Snapshot of shipper counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipperStats {
    /// Records handed to `ship`
    pub records: u64,

    /// HTTP attempts issued
    pub attempts: u64,

    /// Backoff waits performed between attempts
    pub backoff_waits: u64,

    /// Total time spent in backoff waits, in milliseconds
    pub backoff_ms: u64,

    /// Records acknowledged by the collector
    pub delivered: u64,

    /// Records dropped after every attempt failed
    pub exhausted: u64,

    /// Records dropped after a credential rejection
    pub aborted: u64,
}

#[derive(Debug, Default)]
struct StatCounters {
    records: AtomicU64,
    attempts: AtomicU64,
    backoff_waits: AtomicU64,
    backoff_ms: AtomicU64,
    delivered: AtomicU64,
    exhausted: AtomicU64,
    aborted: AtomicU64,
}

impl StatCounters {
    fn bump(counter: &AtomicU64, by: u64) {
        let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
            Some(current.saturating_add(by))
        });
    }

    fn snapshot(&self) -> ShipperStats {
        ShipperStats {
            records: self.records.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
            backoff_waits: self.backoff_waits.load(Ordering::Relaxed),
            backoff_ms: self.backoff_ms.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            aborted: self.aborted.load(Ordering::Relaxed),
        }
    }
}

/// Ships log records to a remote HTTP collector.
///
/// The shipper owns its HTTP connection pool. Concurrent `ship` calls run
/// independent attempt loops; the access token is the only state they
/// share and it is re-read for every attempt.
///
/// # Example
///
/// ```no_run
/// use log_shipper::{LogShipper, LogSink, ShipperConfig};
/// use log_shipper::record::package;
///
/// #[tokio::main]
/// async fn main() {
///     let config = ShipperConfig::frontend("http://localhost:8000", "secret");
///     let shipper = LogShipper::new(config).expect("Failed to create shipper");
///
///     if let Some(ack) = shipper.info(package::AUTH, "user signed in").await {
///         println!("stored as {}", ack.log_id);
///     }
/// }
/// ```
pub struct LogShipper {
    /// The underlying HTTP client (reused for connection pooling)
    client: Client,

    /// URL for the log ingestion endpoint
    logs_url: String,

    /// Current configuration; only the token changes after construction
    config: RwLock<ShipperConfig>,

    /// Destination for echoed records and diagnostics
    console: Arc<dyn Console>,

    counters: StatCounters,
}

impl LogShipper {
    /// Create a shipper that echoes to `tracing`.
    ///
    /// No network I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns `ShipperError::Client` if the HTTP client cannot be built.
    pub fn new(config: ShipperConfig) -> Result<Self, ShipperError> {
        Self::with_console(config, Arc::new(TracingConsole))
    }

    /// Create a shipper that writes echoes and diagnostics to `console`.
    pub fn with_console(
        config: ShipperConfig,
        console: Arc<dyn Console>,
    ) -> Result<Self, ShipperError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(ShipperError::Client)?;

        Ok(Self {
            client,
            logs_url: config.logs_url(),
            config: RwLock::new(config),
            console,
            counters: StatCounters::default(),
        })
    }

    /// Replace the bearer token used by every request issued from now on.
    ///
    /// Requests already in flight keep the token they were sent with.
    pub fn update_access_token(&self, token: impl Into<String>) {
        let token = token.into();
        match self.config.write() {
            Ok(mut config) => config.access_token = token,
            Err(poisoned) => poisoned.into_inner().access_token = token,
        }
        debug!("Access token updated");
    }

    /// Copy of the current configuration.
    pub fn config(&self) -> ShipperConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Current counter values.
    pub fn stats(&self) -> ShipperStats {
        self.counters.snapshot()
    }

    /// Get the configured ingestion URL.
    pub fn logs_url(&self) -> &str {
        &self.logs_url
    }

    /// Backoff applied after attempt `attempt` fails.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        backoff_delay(self.config().base_retry_delay, attempt)
    }

    fn current_token(&self) -> String {
        match self.config.read() {
            Ok(config) => config.access_token.clone(),
            Err(poisoned) => poisoned.into_inner().access_token.clone(),
        }
    }

    /// Run the attempt loop for one record.
    async fn deliver(
        &self,
        record: &LogRecord,
        settings: &ShipperConfig,
    ) -> Option<DeliveryResponse> {
        let max_attempts = settings.effective_attempts();
        let mut last_error: Option<DeliveryError> = None;
        let mut attempts_made = 0;

        for attempt in 1..=max_attempts {
            attempts_made = attempt;
            StatCounters::bump(&self.counters.attempts, 1);

            match self.send_request(record).await {
                Ok(response) => {
                    debug!(
                        attempt = attempt,
                        log_id = %response.log_id,
                        "Log record delivered"
                    );
                    StatCounters::bump(&self.counters.delivered, 1);
                    return Some(response);
                }
                Err(e) if !e.is_retryable() => {
                    debug!(
                        error = %e,
                        attempt = attempt,
                        "Collector rejected credentials, not retrying"
                    );
                    StatCounters::bump(&self.counters.aborted, 1);
                    last_error = Some(e);
                    break;
                }
                Err(e) => {
                    if attempt < max_attempts {
                        let delay = backoff_delay(settings.base_retry_delay, attempt);
                        debug!(
                            error = %e,
                            attempt = attempt,
                            max_attempts = max_attempts,
                            delay_ms = delay_millis(delay),
                            "Delivery attempt failed, backing off"
                        );
                        StatCounters::bump(&self.counters.backoff_waits, 1);
                        StatCounters::bump(&self.counters.backoff_ms, delay_millis(delay));
                        tokio::time::sleep(delay).await;
                    } else {
                        StatCounters::bump(&self.counters.exhausted, 1);
                    }
                    last_error = Some(e);
                }
            }
        }

        if settings.console_echo {
            self.report_failure(record, attempts_made, last_error.as_ref());
        }
        None
    }

    fn report_failure(&self, record: &LogRecord, attempts: u32, error: Option<&DeliveryError>) {
        let reason = error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        let payload = serde_json::to_string(record).unwrap_or_else(|_| format!("{:?}", record));

        self.console.write(
            ConsoleChannel::Error,
            &format!(
                "Failed to ship log after {} attempt(s): {}. Record: {}",
                attempts, reason, payload
            ),
        );
    }

    /// Send a single HTTP request without retry logic.
    async fn send_request(&self, record: &LogRecord) -> Result<DeliveryResponse, DeliveryError> {
        let response = self
            .client
            .post(&self.logs_url)
            .bearer_auth(self.current_token())
            .json(record)
            .send()
            .await?;

        let status = response.status();

        if status != StatusCode::OK {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DeliveryError::Status {
                code: status,
                message,
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(DeliveryError::EmptyBody);
        }
        serde_json::from_str(&body).map_err(|e| DeliveryError::Parse(e.to_string()))
    }
}

#[async_trait]
impl LogSink for LogShipper {
    fn default_stack(&self) -> Stack {
        self.config().default_stack
    }

    async fn ship(&self, record: LogRecord) -> Option<DeliveryResponse> {
        StatCounters::bump(&self.counters.records, 1);
        let settings = self.config();

        if settings.console_echo {
            console::echo(self.console.as_ref(), &record);
        }

        self.deliver(&record, &settings).await
    }
}
