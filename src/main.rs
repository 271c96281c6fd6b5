use std::sync::Arc;

use anyhow::Context;

use cinematch_api::{
    api::{create_router, AppState, RankingSettings},
    catalog::{CatalogSnapshot, CatalogSource, JsonFileSource, SnapshotOptions},
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // The server never starts on a partial or invalid catalog
    let source = JsonFileSource::new(&config.catalog_path);
    let data = source
        .load()
        .await
        .with_context(|| format!("Failed to load catalog from {}", source.describe()))?;
    let snapshot = CatalogSnapshot::build(data, SnapshotOptions::new(config.noise_seed));

    let state = AppState::new(snapshot, Arc::new(source), RankingSettings::from(&config));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
