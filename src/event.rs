//! Log event construction
//!
//! A [`LogEvent`] is the canonical emittable record: timestamp, code,
//! message, derived level, correlation id and an optional structured
//! payload. The level is a pure function of the code's severity segment; an
//! event can never be built around a malformed code.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::Severity;
use crate::code;
use crate::errors::{WeaveError, WeaveResult};

/// Emission level of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl Severity {
    /// Total severity-to-level mapping: I→info, W→warn, E→error, D→debug.
    pub fn level(&self) -> LogLevel {
        match self {
            Severity::Info => LogLevel::Info,
            Severity::Warn => LogLevel::Warn,
            Severity::Error => LogLevel::Error,
            Severity::Debug => LogLevel::Debug,
        }
    }
}

/// A structured record of one log emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    /// RFC 3339 UTC timestamp with millisecond precision, captured at build
    /// time.
    pub timestamp: String,
    pub code: String,
    pub message: String,
    pub level: LogLevel,
    pub correlation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl LogEvent {
    /// Build an event around a code string. Fails with
    /// [`WeaveError::InvalidCode`] when the code does not satisfy the
    /// six-segment grammar. The payload is passed through unredacted;
    /// redaction is the interception pipeline's responsibility.
    pub fn build(
        code: &str,
        message: impl Into<String>,
        correlation_id: impl Into<String>,
        data: Option<Value>,
    ) -> WeaveResult<LogEvent> {
        let segments = code::parse(code).ok_or_else(|| WeaveError::invalid_code(code))?;
        Ok(LogEvent {
            timestamp: now_timestamp(),
            code: code.to_string(),
            message: message.into(),
            level: segments.severity.level(),
            correlation_id: correlation_id.into(),
            data,
        })
    }
}

/// Current instant as an RFC 3339 UTC string with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
