//! Egress interception tests against a real bound axum server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use logweave::{EgressConfig, HttpClient, LogLevel, MemorySink, WeaveError};

async fn spawn_server() -> SocketAddr {
    let router = Router::new()
        .route("/ok", get(|| async { Json(json!({"ok": true})) }))
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "gone") }),
        )
        .route("/echo", post(|Json(value): Json<Value>| async move { Json(value) }))
        .route(
            "/correlation",
            get(|headers: HeaderMap| async move {
                headers
                    .get("X-Correlation-ID")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("missing")
                    .to_string()
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("test server addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

#[tokio::test]
async fn successful_exchange_emits_request_then_info_response() {
    let addr = spawn_server().await;
    let sink = Arc::new(MemorySink::new());
    let client = HttpClient::new(EgressConfig::default(), sink.clone());

    let response = client.get(format!("http://{addr}/ok")).await.expect("exchange ok");
    assert!(response.is_success());
    let body: Value = response.json().expect("json body");
    assert_eq!(body["ok"], true);

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].code, "BE.1006.01.01.01.I");
    assert_eq!(events[1].code, "BE.1006.02.02.01.I");
    assert_eq!(events[0].correlation_id, events[1].correlation_id);
}

#[tokio::test]
async fn non_2xx_status_yields_warn_failure_response_event() {
    let addr = spawn_server().await;
    let sink = Arc::new(MemorySink::new());
    let client = HttpClient::new(EgressConfig::default(), sink.clone());

    let response = client
        .get(format!("http://{addr}/missing"))
        .await
        .expect("exchange completes despite 404");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let events = sink.events();
    assert_eq!(events.len(), 2, "request event then response event");
    assert_eq!(events[0].level, LogLevel::Info);
    assert_eq!(events[1].level, LogLevel::Warn);
    assert_eq!(events[1].code, "BE.1006.02.02.02.W");
    let data = events[1].data.as_ref().unwrap();
    assert_eq!(data["status"], 404);
    assert!(data.get("durationMs").is_some());
}

#[tokio::test]
async fn connection_failure_logs_error_and_surfaces_to_caller() {
    let sink = Arc::new(MemorySink::new());
    let client = HttpClient::new(EgressConfig::default(), sink.clone());

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("probe port");
    let port = listener.local_addr().expect("probe addr").port();
    drop(listener);

    let err = client
        .get(format!("http://127.0.0.1:{port}/nowhere"))
        .await
        .expect_err("connection must fail");
    assert!(matches!(err, WeaveError::Network { .. }));

    let events = sink.events();
    assert_eq!(events.len(), 2, "request event then error event, no response event");
    assert_eq!(events[1].level, LogLevel::Error);
    assert!(events[1].data.as_ref().unwrap().get("error").is_some());
}

#[tokio::test]
async fn response_content_logging_adds_debug_event() {
    let addr = spawn_server().await;
    let sink = Arc::new(MemorySink::new());
    let config = EgressConfig {
        log_response_content: true,
        ..EgressConfig::default()
    };
    let client = HttpClient::new(config, sink.clone());

    client.get(format!("http://{addr}/ok")).await.expect("exchange ok");

    let events = sink.events();
    assert_eq!(events.len(), 3, "request, response, response body");
    assert_eq!(events[2].level, LogLevel::Debug);
    assert_eq!(events[2].data.as_ref().unwrap()["body"]["ok"], true);
}

#[tokio::test]
async fn parameter_logging_redacts_request_body() {
    let addr = spawn_server().await;
    let sink = Arc::new(MemorySink::new());
    let config = EgressConfig {
        log_parameters: true,
        log_function_name: true,
        ..EgressConfig::default()
    };
    let client = HttpClient::new(config, sink.clone());

    let response = client
        .post(
            format!("http://{addr}/echo"),
            json!({"password": "hunter2", "name": "ada"}),
        )
        .await
        .expect("exchange ok");
    // the server received the unredacted body
    let echoed: Value = response.json().expect("echo json");
    assert_eq!(echoed["password"], "hunter2");

    let events = sink.events();
    assert_eq!(events.len(), 3, "request, parameters, response");
    assert_eq!(events[1].level, LogLevel::Debug);
    let data = events[1].data.as_ref().unwrap();
    assert_eq!(data["body"]["password"], "[REDACTED]");
    assert_eq!(data["body"]["name"], "ada");
    let origin = data["origin"].as_str().expect("origin attached");
    assert!(origin.contains("egress_instrumentation.rs"), "origin: {origin}");
}

#[tokio::test]
async fn disabled_instrumentation_emits_nothing() {
    let addr = spawn_server().await;
    let sink = Arc::new(MemorySink::new());
    let config = EgressConfig {
        log_request_response: false,
        ..EgressConfig::default()
    };
    let client = HttpClient::new(config, sink.clone());

    let response = client.get(format!("http://{addr}/ok")).await.expect("exchange ok");
    assert!(response.is_success());
    assert!(sink.is_empty());
}

#[tokio::test]
async fn correlation_id_travels_on_the_outbound_request() {
    let addr = spawn_server().await;
    let sink = Arc::new(MemorySink::new());
    let client = HttpClient::new(EgressConfig::default(), sink.clone());

    let response = client
        .get(format!("http://{addr}/correlation"))
        .await
        .expect("exchange ok");
    let seen_by_server = response.text();

    let events = sink.events();
    assert_eq!(seen_by_server, events[0].correlation_id);
    let pattern = regex::Regex::new(r"^log-\d+-[a-z0-9]{8}$").unwrap();
    assert!(pattern.is_match(&seen_by_server), "id: {seen_by_server}");
}
