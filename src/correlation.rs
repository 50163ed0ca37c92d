//! Correlation identifier generation
//!
//! Every HTTP exchange gets one correlation id that threads through all of
//! its log events. Uniqueness relies on wall-clock millis plus a random
//! suffix; there is no persistence or cross-process coordination.

use chrono::Utc;
use uuid::Uuid;

/// Prefix used when the caller does not supply one.
pub const DEFAULT_PREFIX: &str = "log";

/// Produce `"<prefix>-<unix-millis>-<8 char suffix>"`, matching
/// `^<prefix>-\d+-[a-z0-9]{8}$`. The suffix is the head of a v4 UUID in
/// simple (lowercase hex) form.
pub fn generate(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{millis}-{}", &uuid[..8])
}

/// [`generate`] with the default `"log"` prefix.
pub fn generate_default() -> String {
    generate(DEFAULT_PREFIX)
}
