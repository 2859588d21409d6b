//! The shipping capability shared by the remote and console-only shippers.
//!
//! Consumers hold an `Arc<dyn LogSink>` injected at startup and never need to
//! know whether records actually leave the process.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::console::{self, Console, TracingConsole};
use crate::record::{DeliveryResponse, LogLevel, LogRecord, Stack};

/// Something that accepts log records.
///
/// Every method resolves; none of them can fail. `None` means the record was
/// not acknowledged by a collector.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Stack applied by the severity methods.
    fn default_stack(&self) -> Stack;

    /// Deliver one record.
    async fn ship(&self, record: LogRecord) -> Option<DeliveryResponse>;

    /// Build a record from the parts and ship it. This is the only entry
    /// point that can override the default stack.
    async fn log(
        &self,
        stack: Stack,
        level: LogLevel,
        package: &str,
        message: &str,
    ) -> Option<DeliveryResponse> {
        self.ship(LogRecord::new(stack, level, package, message)).await
    }

    async fn debug(&self, package: &str, message: &str) -> Option<DeliveryResponse> {
        self.log(self.default_stack(), LogLevel::Debug, package, message)
            .await
    }

    async fn info(&self, package: &str, message: &str) -> Option<DeliveryResponse> {
        self.log(self.default_stack(), LogLevel::Info, package, message)
            .await
    }

    async fn warn(&self, package: &str, message: &str) -> Option<DeliveryResponse> {
        self.log(self.default_stack(), LogLevel::Warn, package, message)
            .await
    }

    async fn error(&self, package: &str, message: &str) -> Option<DeliveryResponse> {
        self.log(self.default_stack(), LogLevel::Error, package, message)
            .await
    }

    async fn fatal(&self, package: &str, message: &str) -> Option<DeliveryResponse> {
        self.log(self.default_stack(), LogLevel::Fatal, package, message)
            .await
    }
}

/// Fallback sink used when a remote shipper cannot be constructed.
///
/// Every record is echoed to the console and nothing is sent anywhere.
pub struct ConsoleOnlyShipper {
    default_stack: Stack,
    console: Arc<dyn Console>,
}

impl ConsoleOnlyShipper {
    pub fn new(default_stack: Stack) -> Self {
        Self::with_console(default_stack, Arc::new(TracingConsole))
    }

    pub fn with_console(default_stack: Stack, console: Arc<dyn Console>) -> Self {
        Self {
            default_stack,
            console,
        }
    }
}

#[async_trait]
impl LogSink for ConsoleOnlyShipper {
    fn default_stack(&self) -> Stack {
        self.default_stack
    }

    async fn ship(&self, record: LogRecord) -> Option<DeliveryResponse> {
        console::echo(self.console.as_ref(), &record);
        None
    }
}

/// Ship `record` on its own task.
///
/// The handle may be dropped; the delivery loop keeps running to completion.
pub fn dispatch(sink: Arc<dyn LogSink>, record: LogRecord) -> JoinHandle<Option<DeliveryResponse>> {
    tokio::spawn(async move { sink.ship(record).await })
}
