use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use roll_call_server::{create_router, AppState, Config, TrueNasClient};
use std::path::PathBuf;
use tower::ServiceExt; // for oneshot
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "1-test-api-key";
pub const JAILS_PATH: &str = "/api/v2.0/jail";
pub const FIXTURE: &str = include_str!("../fixtures/jails.json");

pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../roll-call-server/static")
}

pub fn app_with_key(api_url: &str, api_key: &str) -> anyhow::Result<Router> {
    let config = Config::new(api_url, api_key);
    let truenas = TrueNasClient::new(&config)?;
    Ok(create_router(AppState::new(truenas), static_dir()))
}

pub fn app_for(server: &MockServer) -> anyhow::Result<Router> {
    app_with_key(&format!("{}{}", server.uri(), JAILS_PATH), API_KEY)
}

/// Upstream that only answers authenticated GETs on the jail endpoint.
pub async fn upstream(response: ResponseTemplate, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(JAILS_PATH))
        .and(header("Authorization", format!("Bearer {}", API_KEY).as_str()))
        .respond_with(response)
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

pub async fn get(app: Router, uri: &str) -> anyhow::Result<Response> {
    let request = Request::builder().uri(uri).body(Body::empty())?;
    Ok(app.oneshot(request).await?)
}

pub async fn body_text(response: Response) -> anyhow::Result<String> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

pub async fn get_text(app: Router, uri: &str) -> anyhow::Result<(StatusCode, String)> {
    let response = get(app, uri).await?;
    let status = response.status();
    Ok((status, body_text(response).await?))
}
