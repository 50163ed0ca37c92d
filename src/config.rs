//! Instrumentation configuration
//!
//! Options recognized by the two interception points, with figment-backed
//! loading: serialized defaults, then `logweave.toml`, then `LOGWEAVE_`
//! environment variables.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Header carrying the correlation id, unless overridden per config.
pub const DEFAULT_CORRELATION_HEADER: &str = "X-Correlation-ID";

/// Options for outbound (client) instrumentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EgressConfig {
    /// Emit request/response events at all.
    #[serde(default = "default_true")]
    pub log_request_response: bool,
    /// Also emit a debug event with the request headers/body.
    #[serde(default)]
    pub log_parameters: bool,
    /// Also emit a debug event with the response body.
    #[serde(default)]
    pub log_response_content: bool,
    /// Attach the call-site origin to request and debug events.
    #[serde(default)]
    pub log_function_name: bool,
}

impl Default for EgressConfig {
    fn default() -> Self {
        Self {
            log_request_response: true,
            log_parameters: false,
            log_response_content: false,
            log_function_name: false,
        }
    }
}

/// Options for inbound (server) instrumentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngressConfig {
    /// Capture and emit request bodies as debug events.
    #[serde(default)]
    pub log_request_body: bool,
    /// Capture and emit response bodies as debug events.
    #[serde(default)]
    pub log_response_body: bool,
    /// Include (redacted) header maps in request/response events.
    #[serde(default)]
    pub log_headers: bool,
    /// Skip instrumentation entirely when the request path contains one of
    /// these substrings.
    #[serde(default)]
    pub exclude_paths: Vec<String>,
    /// Suppress request body capture only, by path substring.
    #[serde(default)]
    pub exclude_request_body: Vec<String>,
    /// Suppress response body capture only, by path substring.
    #[serde(default)]
    pub exclude_response_body: Vec<String>,
    /// Correlation header name override.
    #[serde(default = "default_id_header")]
    pub custom_id_header: String,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            log_request_body: false,
            log_response_body: false,
            log_headers: false,
            exclude_paths: Vec::new(),
            exclude_request_body: Vec::new(),
            exclude_response_body: Vec::new(),
            custom_id_header: default_id_header(),
        }
    }
}

/// Full configuration surface for both instrumentation points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaveConfig {
    #[serde(default)]
    pub egress: EgressConfig,
    #[serde(default)]
    pub ingress: IngressConfig,
}

fn default_true() -> bool {
    true
}

fn default_id_header() -> String {
    DEFAULT_CORRELATION_HEADER.to_string()
}

/// Load configuration from defaults, an optional TOML file (default
/// `logweave.toml`) and `LOGWEAVE_`-prefixed environment variables, in
/// increasing precedence.
pub fn load_config(path: Option<&str>) -> Result<WeaveConfig, figment::Error> {
    let figment = Figment::from(Serialized::defaults(WeaveConfig::default()))
        .merge(Toml::file(path.unwrap_or("logweave.toml")))
        .merge(Env::prefixed("LOGWEAVE_").split("__"));

    figment.extract()
}
