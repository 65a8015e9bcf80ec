use std::net::SocketAddr;
use anyhow::Context;
use flightinfo_api::{app, AppState};
use flightinfo_store::app_config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flightinfo_api=debug,flightinfo_store=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!(
        "Starting flight information API on port {} ({:?} storage)",
        config.server.port,
        config.storage.backend
    );

    let repo = flightinfo_store::connect_repository(&config.storage)
        .await
        .context("Failed to initialise flight storage")?;

    let app = app(AppState::new(repo));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
