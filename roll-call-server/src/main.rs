use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

use roll_call_server::config::DEFAULT_CONFIG_PATH;
use roll_call_server::logging::init_tracing;
use roll_call_server::{create_router, AppState, Config, TrueNasClient};

#[derive(Parser, Debug)]
#[command(name = "roll-call-server", version, about = "Lists the jails on a TrueNAS host as a web page")]
struct Cli {
    /// JSON file holding `api_url` and `api_key`
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: SocketAddr,

    /// Directory served under /static
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = Config::load(&cli.config)
        .await
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let truenas = TrueNasClient::new(&config).context("Failed to build HTTP client")?;

    info!("📁 Config file: {}", cli.config.display());
    info!("📡 TrueNAS API: {}", truenas.api_url());
    info!("Static assets: {}", cli.static_dir.display());

    let app = create_router(AppState::new(truenas), &cli.static_dir);

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("Failed to bind {}", cli.listen))?;
    info!("🚀 Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
