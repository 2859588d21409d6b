//! Local console output for echoed records and delivery diagnostics.
//!
//! The default console forwards every line to `tracing`, so the embedding
//! application's subscriber decides where echoed records end up.

use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::record::{LogLevel, LogRecord};

/// Tracing target used by [`TracingConsole`].
pub const CONSOLE_TARGET: &str = "log_shipper::console";

/// Console severity channel a line is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleChannel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for ConsoleChannel {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => ConsoleChannel::Debug,
            LogLevel::Info => ConsoleChannel::Info,
            LogLevel::Warn => ConsoleChannel::Warn,
            LogLevel::Error | LogLevel::Fatal => ConsoleChannel::Error,
        }
    }
}

/// Sink for human-readable console lines.
pub trait Console: Send + Sync {
    fn write(&self, channel: ConsoleChannel, line: &str);
}

/// Console that emits each line as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingConsole;

impl Console for TracingConsole {
    fn write(&self, channel: ConsoleChannel, line: &str) {
        match channel {
            ConsoleChannel::Debug => tracing::debug!(target: CONSOLE_TARGET, "{}", line),
            ConsoleChannel::Info => tracing::info!(target: CONSOLE_TARGET, "{}", line),
            ConsoleChannel::Warn => tracing::warn!(target: CONSOLE_TARGET, "{}", line),
            ConsoleChannel::Error => tracing::error!(target: CONSOLE_TARGET, "{}", line),
        }
    }
}

/// A line captured by [`CapturedConsole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub channel: ConsoleChannel,
    pub text: String,
}

/// In-memory console, useful for tests and for embedding applications that
/// render their own developer overlay.
#[derive(Debug, Default)]
pub struct CapturedConsole {
    lines: Mutex<Vec<ConsoleLine>>,
}

impl CapturedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<ConsoleLine> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.lines.lock() {
            Ok(lines) => lines.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Console for CapturedConsole {
    fn write(&self, channel: ConsoleChannel, line: &str) {
        let entry = ConsoleLine {
            channel,
            text: line.to_string(),
        };
        match self.lines.lock() {
            Ok(mut lines) => lines.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

/// Format a record as a single console line:
/// `[<timestamp>] [<STACK>] [<LEVEL>] [<package>] <message>`.
pub fn format_line(record: &LogRecord, at: DateTime<Utc>) -> String {
    format!(
        "[{}] [{}] [{}] [{}] {}",
        at.to_rfc3339_opts(SecondsFormat::Millis, true),
        record.stack.as_str().to_uppercase(),
        record.level.as_str().to_uppercase(),
        record.package,
        record.message
    )
}

/// Echo a record to the console on the channel matching its level.
pub fn echo(console: &dyn Console, record: &LogRecord) {
    console.write(record.level.into(), &format_line(record, Utc::now()));
}
