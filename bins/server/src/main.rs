//! Encore API Server
//!
//! Main entry point for the Encore backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use encore_api::{AppState, create_router};
use encore_core::auth::AdminCredentials;
use encore_core::content::{ContentRepository, ContentService};
use encore_core::storage::{LocalStorage, StorageFactory};
use encore_shared::{AppConfig, JwtService, JwtSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Create JWT service
    let jwt_service = JwtService::new(JwtSettings {
        secret: config.jwt.secret.clone(),
        pending_token_expires_minutes: config.jwt.pending_token_expiry_minutes,
        session_token_expires_hours: config.jwt.session_token_expiry_hours,
    });

    // Build the admin credential verifier
    let admin =
        AdminCredentials::from_config(&config.admin).context("invalid admin credentials")?;
    info!(username = %admin.username(), "Admin account configured");

    // Local store doubles as the factory's guaranteed fallback
    let local = Arc::new(
        LocalStorage::new(&config.storage.local_root).context("failed to open local storage")?,
    );
    info!(root = %config.storage.local_root, "Local storage ready");

    let storage = Arc::new(StorageFactory::new(config.storage.clone(), local));

    // Content facade over the seeded repository
    let content = ContentService::new(Arc::new(ContentRepository::new()), Arc::clone(&storage));

    // Create application state
    let state = AppState {
        jwt_service: Arc::new(jwt_service),
        admin: Arc::new(admin),
        content: Arc::new(content),
        storage,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
