use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RollCallError {
    #[error("Failed to open config file {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Upstream error: {status}")]
    UpstreamStatus { status: u16 },
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Template error: {0}")]
    Render(#[from] askama::Error),
}

pub type Result<T> = std::result::Result<T, RollCallError>;

impl IntoResponse for RollCallError {
    fn into_response(self) -> Response {
        // The browser only ever sees a generic message; the cause is logged by the handler.
        let message = match self {
            RollCallError::Render(_) => "Failed to render template",
            _ => "Failed to retrieve jails",
        };
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
