//! Content-type-aware body extraction
//!
//! Turns a body snapshot into a loggable value: parsed JSON for structured
//! content types, capped text for textual ones, a placeholder for opaque
//! binary. Always operates on caller-owned bytes; it never consumes a stream
//! the caller still needs.

use serde_json::Value;

/// Cap on logged text bodies, in characters.
pub const MAX_BODY_CHARS: usize = 1000;

/// Marker appended when a text body was cut at [`MAX_BODY_CHARS`].
pub const TRUNCATION_MARKER: &str = "... (truncated)";

/// Decode a body snapshot according to its declared content type.
///
/// Structured types that fail to deserialize degrade to the text branch
/// rather than erroring; binary types are never decoded.
pub fn extract(bytes: &[u8], content_type: &str) -> Value {
    let declared = media_type(content_type);
    if is_structured(&declared) {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => return value,
            Err(_) => return Value::String(truncate(&String::from_utf8_lossy(bytes))),
        }
    }
    if is_text(&declared) {
        return Value::String(truncate(&String::from_utf8_lossy(bytes)));
    }
    Value::String(format!("[unsupported content type: {declared}]"))
}

/// Truncate to [`MAX_BODY_CHARS`] characters, appending the fixed marker
/// when anything was cut.
pub fn truncate(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(MAX_BODY_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}{TRUNCATION_MARKER}")
    } else {
        head
    }
}

/// Media type without parameters, lowercased.
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

fn is_structured(media_type: &str) -> bool {
    media_type == "application/json" || media_type.ends_with("+json")
}

fn is_text(media_type: &str) -> bool {
    media_type.starts_with("text/")
        || media_type == "application/x-www-form-urlencoded"
        || media_type == "application/xml"
}
