//! # Loyalty Badge Backend Service
//!
//! Entry point: loads configuration, installs logging and starts the
//! HTTP server.
//!
//! ## Quick Start
//!
//! 1. Deploy the `online_course_loyalty` Move package
//! 2. Copy `.env.example` to `.env` and configure
//! 3. Start the server: `cargo run --bin badge-backend`
//!
//! ## Environment Variables
//!
//! See `.env.example` for all configuration.

use std::sync::Arc;

use actix_web::{middleware, web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use loyalty_badge_backend::api;
use loyalty_badge_backend::config::AppConfig;
use loyalty_badge_backend::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // =========================================
    // STEP 1: Load .env
    // =========================================
    // Before logging so RUST_LOG from .env applies
    dotenvy::dotenv().ok(); // It's okay if .env doesn't exist

    // =========================================
    // STEP 2: Initialize Logging
    // =========================================
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("🚀 Starting Loyalty Badge Backend Service");

    // =========================================
    // STEP 3: Load Configuration
    // =========================================
    let config = AppConfig::from_env()
        .expect("Failed to load configuration");

    info!("📋 Configuration loaded");
    info!("   Network: {}", config.network);
    info!("   Sui RPC: {}", config.rpc_url());

    if let Err(e) = config.ledger_config() {
        warn!("⚠️  Ledger endpoints will fail until configured: {}", e);
    }
    if config.api_secret_key.is_none() {
        warn!("⚠️  API_SECRET_KEY not set; every authenticated request will be rejected");
    }

    // =========================================
    // STEP 4: Start HTTP Server
    // =========================================
    let server_host = config.server_host.clone();
    let server_port = config.server_port;
    let app_state = Arc::new(AppState::new(config));

    info!("🌐 Starting HTTP server on {}:{}", server_host, server_port);

    HttpServer::new(move || {
        App::new()
            // Attach shared application state
            .app_data(web::Data::new(app_state.clone()))

            // Add logging middleware
            .wrap(middleware::Logger::default())

            // Configure API routes
            .configure(api::configure_routes)
    })
    .bind(format!("{}:{}", server_host, server_port))?
    .run()
    .await
}
