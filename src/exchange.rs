//! Shared interception contract for HTTP exchanges
//!
//! Both instrumentation points (the outbound client and the inbound server
//! middleware) drive one [`ExchangeLogger`] per exchange. It owns the
//! exchange-local state (correlation id, start instant, direction) and walks
//! the event sequence: a request event first, then exactly one response or
//! error event, plus optional debug-severity payload events in between.
//! Events for concurrent exchanges interleave freely and are correlated only
//! by id.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};

use crate::catalog::{
    self, CatalogEntry, Severity, ACT_RECEIVE, ACT_SEND, CAT_REQUEST, CAT_RESPONSE, OUT_FAILURE,
    OUT_SUCCESS,
};
use crate::code;
use crate::event::LogEvent;
use crate::redact;
use crate::sink::LogSink;

/// Which side of the wire an exchange is observed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Outbound client call.
    Egress,
    /// Inbound server request.
    Ingress,
}

impl Direction {
    /// Action segment for the request event: egress sends requests, ingress
    /// receives them.
    fn request_action(self) -> &'static CatalogEntry {
        match self {
            Direction::Egress => &ACT_SEND,
            Direction::Ingress => &ACT_RECEIVE,
        }
    }

    /// Action segment for the response event, mirrored.
    fn response_action(self) -> &'static CatalogEntry {
        match self {
            Direction::Egress => &ACT_RECEIVE,
            Direction::Ingress => &ACT_SEND,
        }
    }
}

/// Outcome and severity derived from a completed exchange's wire status.
/// Egress treats any non-2xx as a warn-level failure; ingress warns from 400
/// and escalates to error from 500.
pub fn classify_status(direction: Direction, status: u16) -> (&'static CatalogEntry, Severity) {
    match direction {
        Direction::Egress => {
            if (200..300).contains(&status) {
                (&OUT_SUCCESS, Severity::Info)
            } else {
                (&OUT_FAILURE, Severity::Warn)
            }
        }
        Direction::Ingress => {
            if status >= 500 {
                (&OUT_FAILURE, Severity::Error)
            } else if status >= 400 {
                (&OUT_FAILURE, Severity::Warn)
            } else {
                (&OUT_SUCCESS, Severity::Info)
            }
        }
    }
}

/// Per-exchange event emitter. Constructed when an exchange begins and
/// dropped once its terminal event is out; holds no shared mutable state
/// beyond the injected sink handle.
pub struct ExchangeLogger {
    direction: Direction,
    correlation_id: String,
    method: String,
    target: String,
    started: Instant,
    sink: Arc<dyn LogSink>,
}

impl ExchangeLogger {
    pub fn begin(
        direction: Direction,
        sink: Arc<dyn LogSink>,
        correlation_id: String,
        method: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            direction,
            correlation_id,
            method: method.into(),
            target: target.into(),
            started: Instant::now(),
            sink,
        }
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Emit the request event: outcome/severity are fixed success/info, the
    /// request is only recorded here, not judged.
    pub fn request(&self, extra: Option<Value>) {
        let log_code = code::encode(
            &catalog::ENV_BACKEND,
            &catalog::SVC_HTTP,
            &CAT_REQUEST,
            self.direction.request_action(),
            &OUT_SUCCESS,
            Severity::Info,
        );
        let message = match self.direction {
            Direction::Egress => format!("Outbound request: {} {}", self.method, self.target),
            Direction::Ingress => format!("Inbound request: {} {}", self.method, self.target),
        };
        let mut payload = self.base_payload();
        merge_extra(&mut payload, extra);
        self.emit(&log_code, message, Some(Value::Object(payload)));
    }

    /// Emit the response event with outcome/severity derived from the
    /// status and the elapsed duration attached.
    pub fn response(&self, status: u16, extra: Option<Value>) {
        let (outcome, severity) = classify_status(self.direction, status);
        let log_code = code::encode(
            &catalog::ENV_BACKEND,
            &catalog::SVC_HTTP,
            &CAT_RESPONSE,
            self.direction.response_action(),
            outcome,
            severity,
        );
        let message = format!(
            "Response: {} {} -> {} ({} ms)",
            self.method,
            self.target,
            status,
            self.elapsed_ms()
        );
        let mut payload = self.base_payload();
        payload.insert("status".to_string(), Value::from(status));
        payload.insert("durationMs".to_string(), Value::from(self.elapsed_ms()));
        merge_extra(&mut payload, extra);
        self.emit(&log_code, message, Some(Value::Object(payload)));
    }

    /// Emit the error event for an exchange that failed outright. The
    /// detail payload carries the error's message and debug representation,
    /// plus the call-site origin when the caller captured one.
    pub fn error(&self, error_message: &str, extra: Option<Value>) {
        let log_code = code::encode(
            &catalog::ENV_BACKEND,
            &catalog::SVC_HTTP,
            &CAT_RESPONSE,
            self.direction.response_action(),
            &OUT_FAILURE,
            Severity::Error,
        );
        let message = format!(
            "Request failed: {} {} ({} ms)",
            self.method,
            self.target,
            self.elapsed_ms()
        );
        let mut payload = self.base_payload();
        payload.insert("error".to_string(), Value::from(error_message));
        payload.insert("durationMs".to_string(), Value::from(self.elapsed_ms()));
        merge_extra(&mut payload, extra);
        self.emit(&log_code, message, Some(Value::Object(payload)));
    }

    /// Emit a supplementary debug-severity event on the request side
    /// (parameters, captured request body).
    pub fn request_payload(&self, message: impl Into<String>, data: Value) {
        self.payload_event(&CAT_REQUEST, self.direction.request_action(), message, data);
    }

    /// Emit a supplementary debug-severity event on the response side
    /// (captured response body).
    pub fn response_payload(&self, message: impl Into<String>, data: Value) {
        self.payload_event(
            &CAT_RESPONSE,
            self.direction.response_action(),
            message,
            data,
        );
    }

    fn payload_event(
        &self,
        category: &'static CatalogEntry,
        action: &'static CatalogEntry,
        message: impl Into<String>,
        data: Value,
    ) {
        let log_code = code::encode(
            &catalog::ENV_BACKEND,
            &catalog::SVC_HTTP,
            category,
            action,
            &OUT_SUCCESS,
            Severity::Debug,
        );
        let mut payload = self.base_payload();
        merge_extra(&mut payload, Some(data));
        self.emit(&log_code, message, Some(Value::Object(payload)));
    }

    fn base_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("method".to_string(), Value::from(self.method.as_str()));
        payload.insert("target".to_string(), Value::from(self.target.as_str()));
        payload
    }

    /// Redact and hand the event to the sink. Emission must never alter the
    /// outcome the instrumented caller observes, so a build failure is
    /// reported on the error channel and swallowed.
    fn emit(&self, log_code: &code::LogCode, message: impl Into<String>, data: Option<Value>) {
        let data = data.map(|value| redact::redact(&value));
        match LogEvent::build(log_code.as_str(), message, self.correlation_id.clone(), data) {
            Ok(event) => self.sink.emit(&event),
            Err(err) => tracing::error!(target: "logweave", "failed to build log event: {err}"),
        }
    }
}

/// Fold extra object fields into the payload; a non-object extra lands under
/// a `detail` key.
fn merge_extra(payload: &mut Map<String, Value>, extra: Option<Value>) {
    match extra {
        Some(Value::Object(map)) => payload.extend(map),
        Some(other) => {
            payload.insert("detail".to_string(), other);
        }
        None => {}
    }
}
