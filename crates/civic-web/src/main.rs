//! Civic complaint tracker API server.
//!
//! Citizens log in with a one-time code sent to their phone and file
//! complaints; municipal, department and police officers log in with a
//! password and work the complaints in their jurisdiction.

mod auth;
mod config;
mod error;
mod routes;
mod sessions;
mod state;
mod views;

use std::sync::Arc;

use database::Database;
use engine::{Engine, EngineConfig, FsBlobStore, LogNotifier, Notifier};
use sms_gateway::{GatewayConfig, SmsGateway};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::sessions::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting civic web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    if config.seed_demo_data {
        engine::seed::seed_demo_users(&db).await?;
        engine::seed::seed_demo_complaints(&db).await?;
    }

    // Pick the code delivery channel
    let notifier: Arc<dyn Notifier> = match &config.sms_gateway_url {
        Some(url) => {
            let mut gateway_config = GatewayConfig::new(url);
            if let Some(token) = &config.sms_gateway_token {
                gateway_config = gateway_config.with_token(token);
            }
            info!(url = %url, "Sending OTPs through SMS gateway");
            Arc::new(SmsGateway::new(gateway_config)?)
        }
        None => {
            warn!("SMS_GATEWAY_URL not set; OTPs will only be logged");
            Arc::new(LogNotifier::new())
        }
    };
    if config.otp_demo_mode {
        warn!("OTP_DEMO_MODE is on; login codes are returned to callers");
    }

    let blobs = Arc::new(FsBlobStore::new(&config.uploads_dir));
    let engine = Engine::new(db.clone(), notifier, blobs, EngineConfig::default());

    // Build application state
    let state = AppState::new(
        db,
        engine,
        SessionStore::new(config.session_ttl),
        config.otp_demo_mode,
    );

    // Build router
    let app = routes::app(state, &config.uploads_dir, config.max_body_bytes);

    // Start server
    info!(addr = %config.addr, "Civic web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
