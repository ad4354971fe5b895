//! Main Entrypoint for the Morbror API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Loading the course catalog from disk.
//! 3. Initializing the shared speech services.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use morbror_api::{catalog::Catalog, config::Config, router::create_router, state::AppState};
use morbror_core::speech::{VoiceProfiles, elevenlabs::ElevenLabsClient};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Load Courses ---
    let catalog = Arc::new(Catalog::load_dir(&config.courses_path)?);
    if catalog.is_empty() {
        warn!(path = %config.courses_path.display(), "No courses found; voice commands will not open anything.");
    }

    // --- 4. Initialize Speech ---
    let cloud_speech = Arc::new(
        ElevenLabsClient::new(config.elevenlabs_base_url.clone())
            .context("Failed to build ElevenLabs client")?,
    );
    if config.elevenlabs_api_key.is_none() {
        info!("ELEVENLABS_API_KEY not set; all speech will be rendered by the browser.");
    }

    let app_state = Arc::new(AppState {
        catalog,
        cloud_speech,
        voice_profiles: Arc::new(VoiceProfiles::default()),
        config: Arc::new(config.clone()),
    });

    // --- 5. Create Router and Apply Middleware ---
    let origin = config
        .frontend_origin
        .parse::<HeaderValue>()
        .context("FRONTEND_ORIGIN is not a valid header value")?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 6. Start Server ---
    info!(
        bind_address = %config.bind_address,
        frontend_origin = %config.frontend_origin,
        cloud_speech = config.elevenlabs_api_key.is_some(),
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
