//! Inbound (ingress) HTTP instrumentation
//!
//! axum middleware that correlates, logs and optionally body-captures every
//! inbound exchange. Body capture is an explicit buffer-and-restore
//! decorator: the original body stream is drained into a snapshot, logged
//! from the snapshot, and a rebuilt request/response with the same bytes is
//! handed onward, so the application always sees an intact exchange.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::header::CONTENT_TYPE,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
    Router,
};
use serde_json::{json, Map, Value};

use crate::body;
use crate::config::IngressConfig;
use crate::correlation;
use crate::exchange::{Direction, ExchangeLogger};
use crate::sink::LogSink;

/// Shared state for the ingress instrumentation point: the recognized
/// options plus the injected sink. Installed once at router setup.
pub struct ServerInstrumentation {
    config: IngressConfig,
    sink: Arc<dyn LogSink>,
}

impl ServerInstrumentation {
    pub fn new(config: IngressConfig, sink: Arc<dyn LogSink>) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &IngressConfig {
        &self.config
    }

    fn is_excluded(&self, path: &str) -> bool {
        matches_any(&self.config.exclude_paths, path)
    }
}

/// Attach the instrumentation middleware to a router.
pub fn add_instrumentation(router: Router, instrumentation: Arc<ServerInstrumentation>) -> Router {
    router.layer(middleware::from_fn_with_state(instrumentation, instrument))
}

/// The middleware itself. Excluded paths skip straight to the handler with
/// zero events; everything else gets a request event, the handler run, and
/// a response event, with the correlation id written back on the response.
pub async fn instrument(
    State(instrumentation): State<Arc<ServerInstrumentation>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if instrumentation.is_excluded(&path) {
        return next.run(req).await;
    }

    let config = &instrumentation.config;
    let header_name = HeaderName::from_bytes(config.custom_id_header.as_bytes()).ok();

    // An inbound correlation id wins over a freshly generated one.
    let correlation_id = header_name
        .as_ref()
        .and_then(|name| req.headers().get(name))
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(correlation::generate_default);

    let method = req.method().to_string();
    let logger = ExchangeLogger::begin(
        Direction::Ingress,
        instrumentation.sink.clone(),
        correlation_id,
        &method,
        &path,
    );

    let mut request_extra = Map::new();
    if config.log_headers {
        request_extra.insert("headers".to_string(), headers_to_value(req.headers()));
    }

    let capture_request_body =
        config.log_request_body && !matches_any(&config.exclude_request_body, &path);
    let (req, request_body) = if capture_request_body {
        let content_type = content_type_of(req.headers());
        let (parts, body_stream) = req.into_parts();
        // A failed drain leaves an empty snapshot; the exchange goes on.
        let bytes = to_bytes(body_stream, usize::MAX).await.unwrap_or_default();
        let restored = Request::from_parts(parts, Body::from(bytes.clone()));
        (restored, Some(body::extract(&bytes, &content_type)))
    } else {
        (req, None)
    };

    logger.request(object_or_none(request_extra));
    if let Some(extracted) = request_body {
        logger.request_payload("Request body", json!({ "body": extracted }));
    }

    let response = next.run(req).await;
    let status = response.status().as_u16();

    let capture_response_body =
        config.log_response_body && !matches_any(&config.exclude_response_body, &path);
    let (mut response, response_body) = if capture_response_body {
        let content_type = content_type_of(response.headers());
        let (parts, body_stream) = response.into_parts();
        let bytes = to_bytes(body_stream, usize::MAX).await.unwrap_or_default();
        let restored = Response::from_parts(parts, Body::from(bytes.clone()));
        (restored, Some(body::extract(&bytes, &content_type)))
    } else {
        (response, None)
    };

    let mut response_extra = Map::new();
    if config.log_headers {
        response_extra.insert("headers".to_string(), headers_to_value(response.headers()));
    }
    logger.response(status, object_or_none(response_extra));
    if let Some(extracted) = response_body {
        logger.response_payload("Response body", json!({ "body": extracted }));
    }

    // Correlation id always goes back out on instrumented paths.
    if let Some(name) = header_name {
        if let Ok(value) = HeaderValue::from_str(logger.correlation_id()) {
            response.headers_mut().insert(name, value);
        }
    }

    response
}

fn matches_any(patterns: &[String], path: &str) -> bool {
    patterns.iter().any(|pattern| path.contains(pattern.as_str()))
}

fn content_type_of(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("text/plain")
        .to_string()
}

fn headers_to_value(headers: &HeaderMap) -> Value {
    Value::Object(
        headers
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
                )
            })
            .collect(),
    )
}

fn object_or_none(map: Map<String, Value>) -> Option<Value> {
    if map.is_empty() {
        None
    } else {
        Some(Value::Object(map))
    }
}
