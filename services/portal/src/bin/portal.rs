//! services/portal/src/bin/portal.rs

use portal_lib::{
    adapters::{Argon2Hasher, DbAdapter, MemorySessionStore},
    config::Config,
    error::ApiError,
    web::{build_router, AppState},
};
use attendance_core::AuthService;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");
    if !config.cookie_secure && !config.bind_address.ip().is_loopback() {
        warn!(
            "Listening on {} with COOKIE_SECURE off; set it when serving behind HTTPS.",
            config.bind_address
        );
    }

    // --- 2. Open the Store ---
    info!("Connecting to database...");
    let db_adapter = Arc::new(
        DbAdapter::connect(&config.database_url, config.database_max_connections).await?,
    );

    // --- 3. Build the Services ---
    let auth = Arc::new(AuthService::new(
        db_adapter.clone(),
        Arc::new(Argon2Hasher::default()),
    )?);

    let app_state = Arc::new(AppState {
        auth,
        records: db_adapter.clone(),
        sessions: Arc::new(MemorySessionStore::new()),
        config: config.clone(),
    });

    // --- 4. Create the Web Router ---
    let app = build_router(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // --- 6. Release the Store ---
    db_adapter.close().await;
    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for the shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
