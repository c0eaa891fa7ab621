use askama::Template;
use axum::{
    extract::State,
    middleware,
    response::{Html, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::error::Result;
use crate::jail::Jail;
use crate::logging::request_logging_middleware;
use crate::truenas::TrueNasClient;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub truenas: TrueNasClient,
}

impl AppState {
    pub fn new(truenas: TrueNasClient) -> Self {
        Self { truenas }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub jails: &'a [Jail],
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub message: String,
}

pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(list_jails))
        .route("/api/health", get(health_check))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(Arc::new(state))
}

pub fn render_jails(jails: &[Jail]) -> Result<String> {
    Ok(IndexTemplate { jails }.render()?)
}

#[axum::debug_handler]
async fn list_jails(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    // The client logs its own failures
    let jails = state.truenas.fetch_jails().await?;

    let page = render_jails(&jails).map_err(|e| {
        error!("Failed to render template: {}", e);
        e
    })?;

    info!("Rendered {} jails", jails.len());
    Ok(Html(page))
}

#[axum::debug_handler]
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        message: "Jailhouse Roll Call is running".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jail(jid: i64, name: &str, state: &str, address: &str) -> Jail {
        Jail {
            jid,
            name: name.to_string(),
            state: state.to_string(),
            release: "13.2-RELEASE-p4".to_string(),
            address: address.to_string(),
            last_started: "2024-10-25 14:03:11".to_string(),
        }
    }

    #[test]
    fn test_render_one_row_per_jail() {
        let jails = vec![
            jail(1, "plex", "up", "192.168.1.50"),
            jail(0, "backup", "down", "192.168.1.51"),
        ];

        let html = render_jails(&jails).unwrap();
        assert_eq!(html.matches("<tr>").count(), 3); // header + two rows
        assert!(html.contains("<td>plex</td>"));
        assert!(html.contains("<td>backup</td>"));
        assert!(html.contains("<td>192.168.1.50</td>"));
        assert!(html.contains("state-down"));
        assert!(html.contains("<td>13.2-RELEASE-p4</td>"));
        assert!(!html.contains("No jails found"));
    }

    #[test]
    fn test_render_empty_list() {
        let html = render_jails(&[]).unwrap();
        assert!(html.contains("No jails found"));
        assert!(html.contains("<th>Last Started</th>"));
    }

    #[test]
    fn test_render_escapes_jail_fields() {
        let jails = vec![jail(4, "<script>alert(1)</script>", "up", "10.0.0.4 & 10.0.0.5")];

        let html = render_jails(&jails).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("10.0.0.4 &amp; 10.0.0.5"));
    }

    #[test]
    fn test_render_links_stylesheet() {
        let html = render_jails(&[]).unwrap();
        assert!(html.contains("href=\"/static/style.css\""));
    }
}
