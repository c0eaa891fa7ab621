use axum::{
    extract::{MatchedPath, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

const DEFAULT_LOG_FILTER: &str = "roll_call_server=info,tower_http=info,warn";

/// Installs the fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub path: String,
    pub matched_path: Option<String>,
    pub query_string: Option<String>,
    pub status_code: u16,
    pub duration_ms: u64,
    pub request_headers: Value,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub service: String,
    pub version: String,
}

// Middleware to log every inbound request and its outcome
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start_time = Instant::now();

    let method = request.method().clone();
    let uri = request.uri().clone();
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());

    let request_headers = headers_to_json(request.headers());
    let client_ip = extract_client_ip(request.headers());
    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let response = next.run(request).await;

    let duration = start_time.elapsed();
    let status_code = response.status().as_u16();

    let entry = RequestLogEntry {
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        method: method.to_string(),
        path: uri.path().to_string(),
        matched_path,
        query_string: uri.query().map(|q| q.to_string()),
        status_code,
        duration_ms: duration.as_millis() as u64,
        request_headers,
        client_ip,
        user_agent,
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if response.status().is_server_error() {
        warn!(
            request_id = %entry.id,
            "{} {} -> {} ({} ms)",
            entry.method, entry.path, status_code, entry.duration_ms
        );
    } else {
        info!(
            request_id = %entry.id,
            "{} {} -> {} ({} ms)",
            entry.method, entry.path, status_code, entry.duration_ms
        );
    }

    match serde_json::to_string(&entry) {
        Ok(json) => debug!("Request log: {}", json),
        Err(e) => debug!("Failed to serialize request log {}: {}", entry.id, e),
    }

    response
}

/// Header names containing any of these are left out of request logs.
const SENSITIVE_HEADER_MARKERS: [&str; 3] = ["authorization", "cookie", "token"];

/// Proxy headers checked, in order, for the originating address.
const CLIENT_IP_HEADERS: [&str; 4] = ["x-forwarded-for", "x-real-ip", "cf-connecting-ip", "x-client-ip"];

pub(crate) fn headers_to_json(headers: &HeaderMap) -> Value {
    // HeaderName is always lowercase
    let loggable = headers
        .iter()
        .filter(|(name, _)| {
            !SENSITIVE_HEADER_MARKERS
                .iter()
                .any(|marker| name.as_str().contains(marker))
        })
        .filter_map(|(name, value)| {
            let value = value.to_str().ok()?;
            Some((name.as_str().to_string(), Value::String(value.to_string())))
        });

    Value::Object(loggable.collect())
}

pub(crate) fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    CLIENT_IP_HEADERS.iter().find_map(|header_name| {
        let value = headers.get(*header_name)?.to_str().ok()?;
        // x-forwarded-for lists the client before any proxies
        let client = value.split(',').next()?.trim();
        (!client.is_empty()).then(|| client.to_string())
    })
}
