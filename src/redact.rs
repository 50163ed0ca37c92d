//! Sensitive-field redaction for structured payloads
//!
//! Scans a payload recursively and replaces values whose key looks
//! credential-like with a fixed marker. Works on `serde_json::Value`, whose
//! scalar/object/array shape gives deterministic recursion and rules out
//! cycles. The input is never mutated.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

/// Placeholder substituted for sensitive values.
pub const REDACTION_MARKER: &str = "[REDACTED]";

lazy_static! {
    static ref SENSITIVE_KEY: Regex = Regex::new(
        r"(?i)(?:password|passwd|pwd|secret|token|auth|key|credential|ssn|social|card|cvv)"
    )
    .expect("valid sensitive-key pattern");
}

/// True when a field name matches one of the fixed case-insensitive
/// sensitive-name patterns.
pub fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEY.is_match(key)
}

/// Return a redacted copy of `value`. Scalars pass through unchanged,
/// objects are rebuilt with sensitive keys replaced by
/// [`REDACTION_MARKER`] and the rest recursed, arrays redact element-wise.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, nested)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String(REDACTION_MARKER.to_string()))
                    } else {
                        (key.clone(), redact(nested))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        scalar => scalar.clone(),
    }
}
