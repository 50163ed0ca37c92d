//! Library root for the `logweave` crate
//!
//! Structured six-segment log codes plus correlated, redacted HTTP
//! instrumentation for outbound client calls and inbound server requests.

// Core error handling
pub mod errors;

// Log code model
pub mod catalog;
pub mod code;

// Event construction & emission
pub mod correlation;
pub mod event;
pub mod sink;

// Payload shaping
pub mod body;
pub mod redact;

// Interception pipeline
pub mod client;
pub mod exchange;
pub mod server;

// Configuration & CLI
pub mod cli;
pub mod config;

// Re-export key types so callers get by with one import
pub use catalog::{CatalogEntry, Segment, Severity};
pub use client::{ClientResponse, HttpClient};
pub use code::{
    decode, describe, encode, is_valid, parse, DecodedCode, DecodedSegment, LogCode, Segments,
};
pub use config::{
    load_config, EgressConfig, IngressConfig, WeaveConfig, DEFAULT_CORRELATION_HEADER,
};
pub use errors::{WeaveError, WeaveResult};
pub use event::{LogEvent, LogLevel};
pub use exchange::{classify_status, Direction, ExchangeLogger};
pub use redact::{redact, REDACTION_MARKER};
pub use server::{add_instrumentation, ServerInstrumentation};
pub use sink::{ConsoleSink, LogSink, MemorySink};
