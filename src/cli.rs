//! Command-line interface for the logweave toolkit
//!
//! Thin presentation layer over the core API: describe/validate codes,
//! print or dump the catalog, and run a small instrumented demo exchange.

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use clap::{Parser, Subcommand};
use serde_json::json;

use crate::catalog::{self, Segment};
use crate::client::HttpClient;
use crate::code;
use crate::config::{EgressConfig, IngressConfig};
use crate::errors::{WeaveError, WeaveResult};
use crate::server::{add_instrumentation, ServerInstrumentation};
use crate::sink::{ConsoleSink, LogSink};

/// Top-level CLI interface for logweave
#[derive(Parser)]
#[command(
    name = "logweave",
    version = "0.1.0",
    about = "Structured log codes and HTTP observability instrumentation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Explain a log code in a human sentence
    Describe { code: String },

    /// Check a log code against the six-segment grammar and show its segments
    Validate { code: String },

    /// Print the segment catalog
    Catalog {
        /// Restrict output to one segment domain (e.g. "service")
        #[arg(long)]
        segment: Option<String>,
    },

    /// Dump the full catalog as a JSON schema file
    Schema {
        #[arg(short, long)]
        output: String,
    },

    /// Run one instrumented exchange against a local demo server
    Demo,
}

pub fn run_describe(code: &str) {
    println!("{}", code::describe(code));
}

/// Print validity and decoded segments. Returns false for malformed codes so
/// the caller can set the exit status.
pub fn run_validate(code: &str) -> bool {
    match code::decode(code) {
        Some(decoded) => {
            println!("{code}: valid");
            for (segment, part) in [
                (Segment::Environment, &decoded.environment),
                (Segment::Service, &decoded.service),
                (Segment::Category, &decoded.category),
                (Segment::Action, &decoded.action),
                (Segment::Outcome, &decoded.outcome),
                (Segment::Severity, &decoded.severity),
            ] {
                let key = part.key.as_deref().unwrap_or("-");
                println!(
                    "  {:<12} {:<6} {:<10} {}",
                    segment.display_name(),
                    part.code,
                    key,
                    part.description
                );
            }
            true
        }
        None => {
            println!("{code}: invalid ({})", code::INVALID_CODE_DESCRIPTION);
            false
        }
    }
}

pub fn run_catalog(segment: Option<&str>) -> WeaveResult<()> {
    let segments: Vec<Segment> = match segment {
        Some(name) => vec![segment_by_name(name)?],
        None => Segment::all().to_vec(),
    };
    for segment in segments {
        println!("{}:", segment.display_name());
        for entry in catalog::entries(segment) {
            println!("  {:<6} {:<10} {}", entry.code, entry.key, entry.description);
        }
    }
    Ok(())
}

/// Write the catalog dump consumed by external tooling.
pub fn dump_schema(output: &str) -> WeaveResult<()> {
    let schema = catalog::schema_json();
    let text = serde_json::to_string_pretty(&schema)
        .map_err(|source| WeaveError::serialization("catalog schema", source))?;
    std::fs::write(output, text).map_err(|source| WeaveError::io("write schema file", source))
}

fn segment_by_name(name: &str) -> WeaveResult<Segment> {
    let segment = Segment::all()
        .iter()
        .find(|segment| segment.display_name().eq_ignore_ascii_case(name))
        .copied();
    segment.ok_or_else(|| WeaveError::config(format!("unknown segment domain: {name}")))
}

/// Spin up a local instrumented server, hit it once through the
/// instrumented client, and let both sides print their events.
pub async fn run_demo() -> anyhow::Result<()> {
    let sink: Arc<dyn LogSink> = Arc::new(ConsoleSink::new());

    let ingress = IngressConfig {
        log_request_body: true,
        log_response_body: true,
        ..IngressConfig::default()
    };
    let instrumentation = Arc::new(ServerInstrumentation::new(ingress, sink.clone()));
    let router = Router::new().route("/hello", get(|| async { Json(json!({"hello": "world"})) }));
    let router = add_instrumentation(router, instrumentation);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let egress = EgressConfig {
        log_response_content: true,
        log_function_name: true,
        ..EgressConfig::default()
    };
    let client = HttpClient::new(egress, sink);
    let response = client.get(format!("http://{addr}/hello")).await?;
    println!("demo response: {} {}", response.status(), response.text());
    Ok(())
}
