use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log_shipper::record::package;
use log_shipper::{LogShipper, LogSink, ShipperConfig};
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Collects everything the fmt subscriber writes.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install an `info`-level fmt subscriber for the current thread.
fn capture_info() -> (SharedBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(buffer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

async fn collector_answering(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logs"))
        .respond_with(ResponseTemplate::new(status).set_body_string("invalid token"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_credential_failure_is_silent_without_echo() {
    let server = collector_answering(401).await;
    let (output, _guard) = capture_info();

    let shipper = LogShipper::new(ShipperConfig::backend(server.uri(), "stale")).unwrap();
    assert!(shipper.error(package::HANDLER, "lookup failed").await.is_none());

    assert_eq!(shipper.stats().aborted, 1);
    assert_eq!(output.contents(), "");
}

#[tokio::test]
async fn test_exhausted_retries_are_silent_without_echo() {
    let server = collector_answering(500).await;
    let (output, _guard) = capture_info();

    let config = ShipperConfig::backend(server.uri(), "token")
        .with_max_attempts(2)
        .with_base_retry_delay(Duration::from_millis(1));
    let shipper = LogShipper::new(config).unwrap();
    assert!(shipper.warn(package::DB, "slow query").await.is_none());

    assert_eq!(shipper.stats().exhausted, 1);
    assert_eq!(output.contents(), "");
}

#[tokio::test]
async fn test_echo_reaches_tracing_output() {
    let server = collector_answering(403).await;
    let (output, _guard) = capture_info();

    let shipper = LogShipper::new(ShipperConfig::frontend(server.uri(), "stale")).unwrap();
    assert!(shipper.error(package::API, "shorten failed").await.is_none());

    let contents = output.contents();
    assert!(contents.contains("[FRONTEND] [ERROR] [api] shorten failed"));
    assert!(contents.contains("Failed to ship log after 1 attempt(s)"));
}
