//! Log event emission sinks
//!
//! The pipeline hands finished events to an injected [`LogSink`]. The
//! console sink writes one self-contained JSON record per event through the
//! tracing macros, with error-level events on the error channel. The memory
//! sink captures events for assertions in tests.

use std::sync::Mutex;

use crate::event::{LogEvent, LogLevel};

/// Destination for emitted log events.
pub trait LogSink: Send + Sync {
    fn emit(&self, event: &LogEvent);
}

/// Emits each event as a single JSON record via `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        ConsoleSink
    }
}

impl LogSink for ConsoleSink {
    fn emit(&self, event: &LogEvent) {
        // Event payloads are serde_json::Value, so serialization is total;
        // the fallback record keeps the sink infallible regardless.
        let record = serde_json::to_string(event).unwrap_or_else(|_| {
            format!(
                r#"{{"code":"{}","correlationId":"{}","message":"unserializable event payload"}}"#,
                event.code, event.correlation_id
            )
        });
        match event.level {
            LogLevel::Error => tracing::error!(target: "logweave", "{record}"),
            LogLevel::Warn => tracing::warn!(target: "logweave", "{record}"),
            LogLevel::Debug => tracing::debug!(target: "logweave", "{record}"),
            LogLevel::Info => tracing::info!(target: "logweave", "{record}"),
        }
    }
}

/// Captures events in memory. Test support.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// Snapshot of everything emitted so far, in emission order.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().expect("memory sink poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("memory sink poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn emit(&self, event: &LogEvent) {
        self.events
            .lock()
            .expect("memory sink poisoned")
            .push(event.clone());
    }
}
