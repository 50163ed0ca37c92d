//! Static catalog of log code segment domains
//!
//! A log code is built from six segments: Environment, Service, Category,
//! Action, Outcome and Severity. Each domain is a closed set of
//! code/key/description triples; there is no runtime registration.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// One catalog row: fixed-width code, short key, human description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub key: &'static str,
    pub description: &'static str,
}

/// The six segment positions of a log code, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Environment,
    Service,
    Category,
    Action,
    Outcome,
    Severity,
}

impl Segment {
    /// Display name used in catalog output and unknown-value fallbacks.
    pub fn display_name(&self) -> &'static str {
        match self {
            Segment::Environment => "Environment",
            Segment::Service => "Service",
            Segment::Category => "Category",
            Segment::Action => "Action",
            Segment::Outcome => "Outcome",
            Segment::Severity => "Severity",
        }
    }

    /// All segments in wire order.
    pub fn all() -> &'static [Segment] {
        &[
            Segment::Environment,
            Segment::Service,
            Segment::Category,
            Segment::Action,
            Segment::Outcome,
            Segment::Severity,
        ]
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// --- Environment (2 uppercase letters) ---

pub const ENV_BACKEND: CatalogEntry = CatalogEntry {
    code: "BE",
    key: "BACKEND",
    description: "Backend",
};
pub const ENV_FRONTEND: CatalogEntry = CatalogEntry {
    code: "FE",
    key: "FRONTEND",
    description: "Frontend",
};
pub const ENV_MOBILE: CatalogEntry = CatalogEntry {
    code: "MO",
    key: "MOBILE",
    description: "Mobile",
};
pub const ENV_INFRA: CatalogEntry = CatalogEntry {
    code: "IN",
    key: "INFRA",
    description: "Infrastructure",
};
pub const ENV_EXTERNAL: CatalogEntry = CatalogEntry {
    code: "EX",
    key: "EXTERNAL",
    description: "External",
};

pub const ENVIRONMENTS: &[CatalogEntry] = &[
    ENV_BACKEND,
    ENV_FRONTEND,
    ENV_MOBILE,
    ENV_INFRA,
    ENV_EXTERNAL,
];

// --- Service (4 digits) ---

pub const SVC_CORE: CatalogEntry = CatalogEntry {
    code: "1001",
    key: "CORE",
    description: "Core platform",
};
pub const SVC_USER: CatalogEntry = CatalogEntry {
    code: "1002",
    key: "USER",
    description: "User management",
};
pub const SVC_AUTH: CatalogEntry = CatalogEntry {
    code: "1003",
    key: "AUTH",
    description: "Authentication",
};
pub const SVC_PAYMENT: CatalogEntry = CatalogEntry {
    code: "1004",
    key: "PAYMENT",
    description: "Payments",
};
pub const SVC_NOTIFY: CatalogEntry = CatalogEntry {
    code: "1005",
    key: "NOTIFY",
    description: "Notifications",
};
pub const SVC_HTTP: CatalogEntry = CatalogEntry {
    code: "1006",
    key: "HTTP",
    description: "HTTP gateway",
};
pub const SVC_DATA: CatalogEntry = CatalogEntry {
    code: "1007",
    key: "DATA",
    description: "Data access",
};

pub const SERVICES: &[CatalogEntry] = &[
    SVC_CORE,
    SVC_USER,
    SVC_AUTH,
    SVC_PAYMENT,
    SVC_NOTIFY,
    SVC_HTTP,
    SVC_DATA,
];

// --- Category (2 digits) ---

pub const CAT_REQUEST: CatalogEntry = CatalogEntry {
    code: "01",
    key: "REQUEST",
    description: "Request",
};
pub const CAT_RESPONSE: CatalogEntry = CatalogEntry {
    code: "02",
    key: "RESPONSE",
    description: "Response",
};
pub const CAT_DATABASE: CatalogEntry = CatalogEntry {
    code: "03",
    key: "DATABASE",
    description: "Database",
};
pub const CAT_SYSTEM: CatalogEntry = CatalogEntry {
    code: "04",
    key: "SYSTEM",
    description: "System",
};
pub const CAT_SECURITY: CatalogEntry = CatalogEntry {
    code: "05",
    key: "SECURITY",
    description: "Security",
};
pub const CAT_VALIDATION: CatalogEntry = CatalogEntry {
    code: "06",
    key: "VALIDATION",
    description: "Validation",
};

pub const CATEGORIES: &[CatalogEntry] = &[
    CAT_REQUEST,
    CAT_RESPONSE,
    CAT_DATABASE,
    CAT_SYSTEM,
    CAT_SECURITY,
    CAT_VALIDATION,
];

// --- Action (2 digits) ---

pub const ACT_SEND: CatalogEntry = CatalogEntry {
    code: "01",
    key: "SEND",
    description: "Send",
};
pub const ACT_RECEIVE: CatalogEntry = CatalogEntry {
    code: "02",
    key: "RECEIVE",
    description: "Receive",
};
pub const ACT_CREATE: CatalogEntry = CatalogEntry {
    code: "03",
    key: "CREATE",
    description: "Create",
};
pub const ACT_READ: CatalogEntry = CatalogEntry {
    code: "04",
    key: "READ",
    description: "Read",
};
pub const ACT_UPDATE: CatalogEntry = CatalogEntry {
    code: "05",
    key: "UPDATE",
    description: "Update",
};
pub const ACT_DELETE: CatalogEntry = CatalogEntry {
    code: "06",
    key: "DELETE",
    description: "Delete",
};
pub const ACT_PROCESS: CatalogEntry = CatalogEntry {
    code: "07",
    key: "PROCESS",
    description: "Process",
};

pub const ACTIONS: &[CatalogEntry] = &[
    ACT_SEND,
    ACT_RECEIVE,
    ACT_CREATE,
    ACT_READ,
    ACT_UPDATE,
    ACT_DELETE,
    ACT_PROCESS,
];

// --- Outcome (2 digits) ---

pub const OUT_SUCCESS: CatalogEntry = CatalogEntry {
    code: "01",
    key: "SUCCESS",
    description: "Success",
};
pub const OUT_FAILURE: CatalogEntry = CatalogEntry {
    code: "02",
    key: "FAILURE",
    description: "Failure",
};
pub const OUT_TIMEOUT: CatalogEntry = CatalogEntry {
    code: "03",
    key: "TIMEOUT",
    description: "Timeout",
};
pub const OUT_REJECTED: CatalogEntry = CatalogEntry {
    code: "04",
    key: "REJECTED",
    description: "Rejected",
};

pub const OUTCOMES: &[CatalogEntry] = &[OUT_SUCCESS, OUT_FAILURE, OUT_TIMEOUT, OUT_REJECTED];

// --- Severity (1 letter, closed set) ---

pub const SEV_INFO: CatalogEntry = CatalogEntry {
    code: "I",
    key: "INFO",
    description: "Info",
};
pub const SEV_WARN: CatalogEntry = CatalogEntry {
    code: "W",
    key: "WARN",
    description: "Warn",
};
pub const SEV_ERROR: CatalogEntry = CatalogEntry {
    code: "E",
    key: "ERROR",
    description: "Error",
};
pub const SEV_DEBUG: CatalogEntry = CatalogEntry {
    code: "D",
    key: "DEBUG",
    description: "Debug",
};

pub const SEVERITIES: &[CatalogEntry] = &[SEV_INFO, SEV_WARN, SEV_ERROR, SEV_DEBUG];

/// Severity as a first-class type. Unlike the other five domains the set is
/// closed and tiny, and it drives the event level mapping, so it gets a real
/// enum in addition to its catalog rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warn,
    Error,
    Debug,
}

impl Severity {
    /// Single-letter wire code.
    pub fn code(&self) -> &'static str {
        match self {
            Severity::Info => "I",
            Severity::Warn => "W",
            Severity::Error => "E",
            Severity::Debug => "D",
        }
    }

    /// Parse the single-letter wire code. Anything outside {I, W, E, D}
    /// is rejected.
    pub fn from_code(code: &str) -> Option<Severity> {
        match code {
            "I" => Some(Severity::Info),
            "W" => Some(Severity::Warn),
            "E" => Some(Severity::Error),
            "D" => Some(Severity::Debug),
            _ => None,
        }
    }

    pub fn entry(&self) -> &'static CatalogEntry {
        match self {
            Severity::Info => &SEV_INFO,
            Severity::Warn => &SEV_WARN,
            Severity::Error => &SEV_ERROR,
            Severity::Debug => &SEV_DEBUG,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

fn index(entries: &'static [CatalogEntry]) -> HashMap<&'static str, &'static CatalogEntry> {
    entries.iter().map(|entry| (entry.code, entry)).collect()
}

lazy_static! {
    static ref ENVIRONMENT_INDEX: HashMap<&'static str, &'static CatalogEntry> =
        index(ENVIRONMENTS);
    static ref SERVICE_INDEX: HashMap<&'static str, &'static CatalogEntry> = index(SERVICES);
    static ref CATEGORY_INDEX: HashMap<&'static str, &'static CatalogEntry> = index(CATEGORIES);
    static ref ACTION_INDEX: HashMap<&'static str, &'static CatalogEntry> = index(ACTIONS);
    static ref OUTCOME_INDEX: HashMap<&'static str, &'static CatalogEntry> = index(OUTCOMES);
    static ref SEVERITY_INDEX: HashMap<&'static str, &'static CatalogEntry> = index(SEVERITIES);
}

/// All entries of a segment domain, in catalog order.
pub fn entries(segment: Segment) -> &'static [CatalogEntry] {
    match segment {
        Segment::Environment => ENVIRONMENTS,
        Segment::Service => SERVICES,
        Segment::Category => CATEGORIES,
        Segment::Action => ACTIONS,
        Segment::Outcome => OUTCOMES,
        Segment::Severity => SEVERITIES,
    }
}

/// Look up a segment value by its wire code. Returns `None` for values
/// outside the catalog; the caller decides how to degrade.
pub fn lookup(segment: Segment, code: &str) -> Option<&'static CatalogEntry> {
    let idx = match segment {
        Segment::Environment => &*ENVIRONMENT_INDEX,
        Segment::Service => &*SERVICE_INDEX,
        Segment::Category => &*CATEGORY_INDEX,
        Segment::Action => &*ACTION_INDEX,
        Segment::Outcome => &*OUTCOME_INDEX,
        Segment::Severity => &*SEVERITY_INDEX,
    };
    idx.get(code).copied()
}

/// Serialize the full catalog as a JSON document, one array per domain.
/// Consumed by the `schema` CLI subcommand.
pub fn schema_json() -> serde_json::Value {
    let domains: Vec<serde_json::Value> = Segment::all()
        .iter()
        .map(|segment| {
            serde_json::json!({
                "segment": segment.display_name(),
                "entries": entries(*segment),
            })
        })
        .collect();
    serde_json::json!({ "domains": domains })
}
