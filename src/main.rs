use tracing_subscriber::EnvFilter;

use admin_api_rust::app;
use admin_api_rust::config::config;
use admin_api_rust::database::DatabaseManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")))
        .init();

    let config = config();
    tracing::info!("Starting Admin API in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; every protected request will be rejected");
    }

    let store = DatabaseManager::connect(&config.database).await?;
    store_ready(&store).await;

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Admin API listening on http://{}", bind_addr);

    axum::serve(listener, app(store.clone())).await?;
    store.close().await;
    Ok(())
}

async fn store_ready(store: &DatabaseManager) {
    use admin_api_rust::database::RecordStore;

    match store.health_check().await {
        Ok(()) => tracing::info!("Database health check passed"),
        Err(e) => tracing::warn!("Database health check failed: {}", e),
    }
}
