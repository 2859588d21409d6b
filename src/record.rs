//! Log record types shipped to the collector.
//!
//! This module defines the canonical record that is built fresh for every
//! `log` call, together with the collector's acknowledgement envelope.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string that names no known stack or level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseTokenError {
    pub kind: &'static str,
    pub value: String,
}

/// Runtime tier that emitted a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stack {
    Frontend,
    Backend,
}

impl Stack {
    /// Wire token for this stack.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stack::Frontend => "frontend",
            Stack::Backend => "backend",
        }
    }
}

impl FromStr for Stack {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frontend" => Ok(Stack::Frontend),
            "backend" => Ok(Stack::Backend),
            _ => Err(ParseTokenError {
                kind: "stack",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log severity levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// Get all possible log levels, in severity order.
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
            LogLevel::Fatal,
        ]
    }

    /// Wire token for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LogLevel::all()
            .iter()
            .copied()
            .find(|level| level.as_str() == wanted)
            .ok_or_else(|| ParseTokenError {
                kind: "level",
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Documented package tags.
///
/// The taxonomy is open: any string is accepted and shipped verbatim, these
/// constants only name the categories the collector knows about.
pub mod package {
    pub const API: &str = "api";
    pub const COMPONENT: &str = "component";
    pub const PAGE: &str = "page";
    pub const STATE: &str = "state";
    pub const UTILS: &str = "utils";
    pub const AUTH: &str = "auth";
    pub const CONFIG: &str = "config";
    pub const MIDDLEWARE: &str = "middleware";
    pub const HOOK: &str = "hook";
    pub const STYLE: &str = "style";

    // Backend-oriented tags
    pub const CACHE: &str = "cache";
    pub const CONTROLLER: &str = "controller";
    pub const CRON_JOB: &str = "cron_job";
    pub const DB: &str = "db";
    pub const DOMAIN: &str = "domain";
    pub const HANDLER: &str = "handler";
    pub const REPOSITORY: &str = "repository";
    pub const ROUTE: &str = "route";
    pub const SERVICE: &str = "service";
}

/// A single structured log record.
///
/// Serializes to the collector's request body:
/// `{"stack": ..., "level": ..., "package": ..., "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Tier that emitted the record
    pub stack: Stack,

    /// Severity
    pub level: LogLevel,

    /// Caller-supplied category tag, not validated
    pub package: String,

    /// Free-form message content
    pub message: String,
}

impl LogRecord {
    /// Create a new record. No field is validated.
    pub fn new(
        stack: Stack,
        level: LogLevel,
        package: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stack,
            level,
            package: package.into(),
            message: message.into(),
        }
    }
}

/// Acknowledgement returned by the collector on successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResponse {
    /// Identifier assigned by the collector
    pub log_id: String,

    /// Status message from the collector
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);

        let mut sorted = LogLevel::all().to_vec();
        sorted.sort();
        assert_eq!(sorted, LogLevel::all());
    }

    #[test]
    fn test_display_matches_wire_tokens() {
        for level in LogLevel::all() {
            let json = serde_json::to_string(level).unwrap();
            assert_eq!(json, format!("\"{}\"", level));
        }
        assert_eq!(Stack::Frontend.to_string(), "frontend");
        assert_eq!(Stack::Backend.to_string(), "backend");
    }

    #[test]
    fn test_parse_tokens() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" fatal ".parse::<LogLevel>(), Ok(LogLevel::Fatal));
        assert_eq!("Backend".parse::<Stack>(), Ok(Stack::Backend));

        let err = "verbose".parse::<LogLevel>().unwrap_err();
        assert_eq!(err.to_string(), "unknown level 'verbose'");
        assert!("mobile".parse::<Stack>().is_err());
    }

    #[test]
    fn test_record_serialization() {
        let record = LogRecord::new(Stack::Frontend, LogLevel::Warn, package::API, "slow response");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"stack":"frontend","level":"warn","package":"api","message":"slow response"}"#
        );
    }

    #[test]
    fn test_record_accepts_unknown_package() {
        let record = LogRecord::new(Stack::Backend, LogLevel::Info, "not-a-known-tag", "");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["package"], "not-a-known-tag");
        assert_eq!(value["message"], "");
    }

    #[test]
    fn test_delivery_response_deserialization() {
        let json = r#"{"logId": "a1b2", "message": "log created successfully"}"#;
        let response: DeliveryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.log_id, "a1b2");
        assert_eq!(response.message, "log created successfully");
    }

    #[test]
    fn test_delivery_response_requires_log_id() {
        let json = r#"{"message": "ok"}"#;
        assert!(serde_json::from_str::<DeliveryResponse>(json).is_err());
    }
}
