//! Log code model: encode, validate, parse, decode, describe
//!
//! The wire format is `EE.SSSS.CC.AA.OO.V`: two uppercase letters, four
//! digits, three two-digit groups and a severity letter from {I, W, E, D},
//! joined by `.`. Grammar and catalog membership are separate concerns: a
//! string with the right shape but unknown segment values is still a valid
//! code and decodes with a fallback description.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, CatalogEntry, Segment, Severity};

/// Segment delimiter in the wire format.
pub const DELIMITER: char = '.';

/// Fixed description returned by [`describe`] for strings that fail the
/// grammar.
pub const INVALID_CODE_DESCRIPTION: &str = "Invalid log code format";

lazy_static! {
    static ref CODE_PATTERN: Regex =
        Regex::new(r"^[A-Z]{2}\.\d{4}\.\d{2}\.\d{2}\.\d{2}\.[IWED]$").expect("valid code pattern");
}

/// An encoded six-segment log code. Immutable value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogCode(String);

impl LogCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for LogCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LogCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Raw segment values split out of a well-formed code string. Catalog
/// membership is not checked; severity is typed because its domain is closed
/// at the grammar level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    pub environment: String,
    pub service: String,
    pub category: String,
    pub action: String,
    pub outcome: String,
    pub severity: Severity,
}

/// One decoded segment: the raw code plus the catalog row when the value is
/// known. Unknown values keep `key: None` and a fallback description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedSegment {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub description: String,
}

/// Catalog-resolved view of a well-formed code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedCode {
    pub environment: DecodedSegment,
    pub service: DecodedSegment,
    pub category: DecodedSegment,
    pub action: DecodedSegment,
    pub outcome: DecodedSegment,
    pub severity: DecodedSegment,
}

/// Join six typed segment values into a log code. The inputs come from the
/// catalog, so the result always satisfies the grammar.
pub fn encode(
    environment: &CatalogEntry,
    service: &CatalogEntry,
    category: &CatalogEntry,
    action: &CatalogEntry,
    outcome: &CatalogEntry,
    severity: Severity,
) -> LogCode {
    LogCode(format!(
        "{env}{d}{svc}{d}{cat}{d}{act}{d}{out}{d}{sev}",
        env = environment.code,
        svc = service.code,
        cat = category.code,
        act = action.code,
        out = outcome.code,
        sev = severity.code(),
        d = DELIMITER,
    ))
}

/// True iff `text` matches the six-segment grammar. Does not consult the
/// catalog.
pub fn is_valid(text: &str) -> bool {
    CODE_PATTERN.is_match(text)
}

/// Split a code string into raw segment values, or `None` when the grammar
/// rejects it.
pub fn parse(text: &str) -> Option<Segments> {
    if !is_valid(text) {
        return None;
    }
    let parts: Vec<&str> = text.split(DELIMITER).collect();
    // The grammar guarantees six parts and a severity in {I, W, E, D}.
    let severity = Severity::from_code(parts[5])?;
    Some(Segments {
        environment: parts[0].to_string(),
        service: parts[1].to_string(),
        category: parts[2].to_string(),
        action: parts[3].to_string(),
        outcome: parts[4].to_string(),
        severity,
    })
}

fn decode_segment(segment: Segment, code: &str) -> DecodedSegment {
    match catalog::lookup(segment, code) {
        Some(entry) => DecodedSegment {
            code: code.to_string(),
            key: Some(entry.key.to_string()),
            description: entry.description.to_string(),
        },
        None => DecodedSegment {
            code: code.to_string(),
            key: None,
            description: format!("Unknown {}", segment.display_name()),
        },
    }
}

/// Resolve a code string against the catalog. Unknown segment values decode
/// with the fallback description instead of failing; `None` only when the
/// grammar rejects the string.
pub fn decode(text: &str) -> Option<DecodedCode> {
    let segments = parse(text)?;
    Some(DecodedCode {
        environment: decode_segment(Segment::Environment, &segments.environment),
        service: decode_segment(Segment::Service, &segments.service),
        category: decode_segment(Segment::Category, &segments.category),
        action: decode_segment(Segment::Action, &segments.action),
        outcome: decode_segment(Segment::Outcome, &segments.outcome),
        severity: decode_segment(Segment::Severity, segments.severity.code()),
    })
}

/// Human sentence for a code, built from the six segment descriptions.
pub fn describe(text: &str) -> String {
    match decode(text) {
        Some(decoded) => format!(
            "{} {} service: {} {} {} ({})",
            decoded.environment.description,
            decoded.service.description,
            decoded.category.description,
            decoded.action.description,
            decoded.outcome.description,
            decoded.severity.description,
        ),
        None => INVALID_CODE_DESCRIPTION.to_string(),
    }
}
