//! Outbound (egress) HTTP instrumentation
//!
//! [`HttpClient`] is the explicitly-registered wrapped callable: callers
//! obtain it once at setup and route all outbound exchanges through it, so
//! there is no global hook to patch or restore. Every call emits a request
//! event, awaits the underlying reqwest exchange, then emits a response or
//! error event. Response bodies are buffered into a snapshot the caller
//! keeps, which is also what body logging reads from.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::body;
use crate::config::{EgressConfig, DEFAULT_CORRELATION_HEADER};
use crate::correlation;
use crate::errors::{WeaveError, WeaveResult};
use crate::exchange::{Direction, ExchangeLogger};
use crate::sink::LogSink;

/// Instrumented HTTP client wrapping `reqwest::Client`.
pub struct HttpClient {
    inner: reqwest::Client,
    config: EgressConfig,
    sink: Arc<dyn LogSink>,
}

/// Buffered response handed back to the caller. The body snapshot is owned
/// here, so logging and the caller read the same bytes and the underlying
/// stream is consumed exactly once.
#[derive(Debug, Clone)]
pub struct ClientResponse {
    status: StatusCode,
    headers: HeaderMap,
    url: String,
    body: Bytes,
}

impl ClientResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> WeaveResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|source| WeaveError::serialization("response body", source))
    }

    fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("text/plain")
    }
}

impl HttpClient {
    pub fn new(config: EgressConfig, sink: Arc<dyn LogSink>) -> Self {
        Self::with_client(reqwest::Client::new(), config, sink)
    }

    /// Wrap a preconfigured reqwest client (custom timeouts, proxies, ...).
    pub fn with_client(inner: reqwest::Client, config: EgressConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            inner,
            config,
            sink,
        }
    }

    pub fn config(&self) -> &EgressConfig {
        &self.config
    }

    #[track_caller]
    pub fn get<'a>(
        &'a self,
        url: impl Into<String>,
    ) -> impl Future<Output = WeaveResult<ClientResponse>> + 'a {
        let origin = caller_origin();
        self.execute(Method::GET, url.into(), None, origin)
    }

    #[track_caller]
    pub fn delete<'a>(
        &'a self,
        url: impl Into<String>,
    ) -> impl Future<Output = WeaveResult<ClientResponse>> + 'a {
        let origin = caller_origin();
        self.execute(Method::DELETE, url.into(), None, origin)
    }

    #[track_caller]
    pub fn post<'a>(
        &'a self,
        url: impl Into<String>,
        body: Value,
    ) -> impl Future<Output = WeaveResult<ClientResponse>> + 'a {
        let origin = caller_origin();
        self.execute(Method::POST, url.into(), Some(body), origin)
    }

    #[track_caller]
    pub fn put<'a>(
        &'a self,
        url: impl Into<String>,
        body: Value,
    ) -> impl Future<Output = WeaveResult<ClientResponse>> + 'a {
        let origin = caller_origin();
        self.execute(Method::PUT, url.into(), Some(body), origin)
    }

    /// Generic entry point for arbitrary methods and optional JSON bodies.
    #[track_caller]
    pub fn send<'a>(
        &'a self,
        method: Method,
        url: impl Into<String>,
        body: Option<Value>,
    ) -> impl Future<Output = WeaveResult<ClientResponse>> + 'a {
        let origin = caller_origin();
        self.execute(method, url.into(), body, origin)
    }

    async fn execute(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
        origin: String,
    ) -> WeaveResult<ClientResponse> {
        let instrument = self.config.log_request_response;
        let logger = ExchangeLogger::begin(
            Direction::Egress,
            self.sink.clone(),
            correlation::generate_default(),
            method.as_str(),
            url.clone(),
        );

        if instrument {
            let extra = self
                .config
                .log_function_name
                .then(|| json!({ "origin": origin.clone() }));
            logger.request(extra);
            if self.config.log_parameters {
                let mut params = json!({ "body": body.clone() });
                if self.config.log_function_name {
                    params["origin"] = Value::from(origin.clone());
                }
                logger.request_payload("Request parameters", params);
            }
        }

        let mut request = self
            .inner
            .request(method, &url)
            .header(DEFAULT_CORRELATION_HEADER, logger.correlation_id());
        if let Some(json_body) = &body {
            request = request.json(json_body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                if instrument {
                    let mut detail = json!({ "detail": format!("{err:?}") });
                    if self.config.log_function_name {
                        detail["origin"] = Value::from(origin);
                    }
                    logger.error(&err.to_string(), Some(detail));
                }
                return Err(WeaveError::network("send request", err));
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().to_string();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                if instrument {
                    logger.error(&err.to_string(), Some(json!({ "detail": format!("{err:?}") })));
                }
                return Err(WeaveError::network("read response body", err));
            }
        };

        let response = ClientResponse {
            status,
            headers,
            url: final_url,
            body: bytes,
        };

        if instrument {
            logger.response(status.as_u16(), None);
            if self.config.log_response_content {
                let extracted = body::extract(response.bytes(), response.content_type());
                logger.response_payload("Response body", json!({ "body": extracted }));
            }
        }

        Ok(response)
    }
}

/// Call-site origin as `file:line`. Chained `#[track_caller]` makes this
/// report the instrumented application's call site, not this crate's.
#[track_caller]
fn caller_origin() -> String {
    let location = std::panic::Location::caller();
    format!("{}:{}", location.file(), location.line())
}
