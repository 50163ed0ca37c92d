//! Ingress interception tests: one axum router per case, driven with
//! `tower::ServiceExt::oneshot`, events captured in a memory sink.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceExt;

use logweave::{add_instrumentation, IngressConfig, LogLevel, MemorySink, ServerInstrumentation};

fn test_router(config: IngressConfig, sink: Arc<MemorySink>) -> Router {
    let instrumentation = Arc::new(ServerInstrumentation::new(config, sink));
    let router = Router::new()
        .route("/api/users", get(|| async { Json(json!({"users": ["a", "b"]})) }))
        .route(
            "/api/fail",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/api/missing",
            get(|| async { (StatusCode::NOT_FOUND, "nope") }),
        )
        .route("/api/echo", post(|body: String| async move { body }))
        .route("/healthz", get(|| async { "ok" }));
    add_instrumentation(router, instrumentation)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn instrumented_exchange_emits_request_then_response() {
    let sink = Arc::new(MemorySink::new());
    let router = test_router(IngressConfig::default(), sink.clone());

    let response = router.oneshot(get_request("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].code, "BE.1006.01.02.01.I");
    assert_eq!(events[0].level, LogLevel::Info);
    assert_eq!(events[1].code, "BE.1006.02.01.01.I");
    assert_eq!(events[0].correlation_id, events[1].correlation_id);

    // correlation id is written back on the response
    let header = response
        .headers()
        .get("X-Correlation-ID")
        .expect("correlation header present")
        .to_str()
        .unwrap();
    assert_eq!(header, events[0].correlation_id);
}

#[tokio::test]
async fn excluded_path_emits_zero_events_and_still_serves() {
    let sink = Arc::new(MemorySink::new());
    let config = IngressConfig {
        exclude_paths: vec!["/healthz".to_string()],
        ..IngressConfig::default()
    };
    let router = test_router(config, sink.clone());

    let response = router.oneshot(get_request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"ok");

    assert!(sink.is_empty(), "excluded path must not be instrumented");
}

#[tokio::test]
async fn inbound_correlation_header_is_preferred() {
    let sink = Arc::new(MemorySink::new());
    let router = test_router(IngressConfig::default(), sink.clone());

    let request = Request::builder()
        .uri("/api/users")
        .header("X-Correlation-ID", "corr-from-upstream")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    let events = sink.events();
    assert_eq!(events[0].correlation_id, "corr-from-upstream");
    assert_eq!(events[1].correlation_id, "corr-from-upstream");
    assert_eq!(
        response.headers().get("X-Correlation-ID").unwrap(),
        "corr-from-upstream"
    );
}

#[tokio::test]
async fn custom_id_header_overrides_default() {
    let sink = Arc::new(MemorySink::new());
    let config = IngressConfig {
        custom_id_header: "X-Request-ID".to_string(),
        ..IngressConfig::default()
    };
    let router = test_router(config, sink.clone());

    let request = Request::builder()
        .uri("/api/users")
        .header("X-Request-ID", "rid-42")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(sink.events()[0].correlation_id, "rid-42");
    assert_eq!(response.headers().get("X-Request-ID").unwrap(), "rid-42");
    assert!(response.headers().get("X-Correlation-ID").is_none());
}

#[tokio::test]
async fn client_error_status_logs_warn_failure() {
    let sink = Arc::new(MemorySink::new());
    let router = test_router(IngressConfig::default(), sink.clone());

    let response = router.oneshot(get_request("/api/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let events = sink.events();
    assert_eq!(events[1].level, LogLevel::Warn);
    assert_eq!(events[1].code, "BE.1006.02.01.02.W");
    assert_eq!(events[1].data.as_ref().unwrap()["status"], 404);
}

#[tokio::test]
async fn server_error_status_escalates_to_error_severity() {
    let sink = Arc::new(MemorySink::new());
    let router = test_router(IngressConfig::default(), sink.clone());

    let response = router.oneshot(get_request("/api/fail")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].level, LogLevel::Error);
    assert_eq!(events[1].code, "BE.1006.02.01.02.E");
}

#[tokio::test]
async fn request_body_capture_redacts_and_restores() {
    let sink = Arc::new(MemorySink::new());
    let config = IngressConfig {
        log_request_body: true,
        ..IngressConfig::default()
    };
    let router = test_router(config, sink.clone());

    let payload = json!({"password": "hunter2", "name": "ada"});
    let request = Request::builder()
        .method("POST")
        .uri("/api/echo")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    // the handler still saw the full body
    assert_eq!(response.status(), StatusCode::OK);
    let echoed = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&echoed[..], payload.to_string().as_bytes());

    let events = sink.events();
    assert_eq!(events.len(), 3, "request, request body, response");
    assert_eq!(events[1].level, LogLevel::Debug);
    let data = events[1].data.as_ref().unwrap();
    assert_eq!(data["body"]["password"], "[REDACTED]");
    assert_eq!(data["body"]["name"], "ada");
}

#[tokio::test]
async fn response_body_capture_emits_debug_event() {
    let sink = Arc::new(MemorySink::new());
    let config = IngressConfig {
        log_response_body: true,
        ..IngressConfig::default()
    };
    let router = test_router(config, sink.clone());

    let response = router.oneshot(get_request("/api/users")).await.unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
        json!({"users": ["a", "b"]})
    );

    let events = sink.events();
    assert_eq!(events.len(), 3, "request, response, response body");
    assert_eq!(events[2].level, LogLevel::Debug);
    assert_eq!(events[2].data.as_ref().unwrap()["body"]["users"][0], "a");
}

#[tokio::test]
async fn body_exclusion_suppresses_capture_only() {
    let sink = Arc::new(MemorySink::new());
    let config = IngressConfig {
        log_response_body: true,
        exclude_response_body: vec!["/api/users".to_string()],
        ..IngressConfig::default()
    };
    let router = test_router(config, sink.clone());

    let response = router.oneshot(get_request("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let events = sink.events();
    assert_eq!(events.len(), 2, "body event suppressed, exchange still logged");
}

#[tokio::test]
async fn header_logging_includes_redacted_headers() {
    let sink = Arc::new(MemorySink::new());
    let config = IngressConfig {
        log_headers: true,
        ..IngressConfig::default()
    };
    let router = test_router(config, sink.clone());

    let request = Request::builder()
        .uri("/api/users")
        .header("authorization", "Bearer secret-token")
        .header("accept", "application/json")
        .body(Body::empty())
        .unwrap();
    router.oneshot(request).await.unwrap();

    let events = sink.events();
    let headers = &events[0].data.as_ref().unwrap()["headers"];
    assert_eq!(headers["authorization"], "[REDACTED]");
    assert_eq!(headers["accept"], "application/json");
}
