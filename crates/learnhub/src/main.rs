//! Learnhub - learning platform backend

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::Config;
use learnhub_api::{create_router, AppState};
use learnhub_auth::TokenIssuer;
use learnhub_db::Database;
use learnhub_storage::{MaterialStore, MockStore, S3Config, S3Store};

/// Learnhub - learning platform backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "LEARNHUB_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "LEARNHUB_PORT")]
    port: Option<u16>,

    /// JWT signing secret (overrides the config file)
    #[arg(long, env = "LEARNHUB_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    if let Some(secret) = args.jwt_secret {
        config.auth.jwt_secret = secret;
    }

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting Learnhub v{}", env!("CARGO_PKG_VERSION"));

    // The built-in secret is a development convenience only
    if config.auth.uses_default_secret() {
        if config.server.is_production() {
            anyhow::bail!(
                "auth.jwt_secret must be configured when running in production"
            );
        }
        warn!("Using the built-in development JWT secret; do not use in production");
    }

    // Create data directory for the SQLite file
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Initialize database
    let db_url = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_url).await?;

    // Create default admin user if no users exist
    if !db.has_users().await? {
        info!("Creating default admin user");
        let hashed_password = learnhub_auth::hash_password("ChangeMe123!")
            .map_err(|e| anyhow::anyhow!("Failed to hash default password: {}", e))?;
        db.insert_user(learnhub_db::NewUser {
            email: "admin@example.com".to_string(),
            hashed_password,
            is_admin: true,
        })
        .await?;
        info!("Default admin user created (email: admin@example.com, password: ChangeMe123!)");
    }

    // Select storage backend once at startup
    let store: Arc<dyn MaterialStore> = if config.storage.enabled {
        Arc::new(S3Store::new(S3Config {
            bucket: config.storage.bucket.clone(),
            region: config.storage.region.clone(),
            endpoint: config.storage.endpoint.clone(),
            access_key_id: config.storage.access_key_id.clone(),
            secret_access_key: config.storage.secret_access_key.clone(),
            allow_http: config.storage.allow_http,
            fallback_base: config.storage.fallback_base.clone(),
        })?)
    } else {
        Arc::new(MockStore::new(config.storage.fallback_base.clone()))
    };

    // Initialize token issuer
    let tokens = Arc::new(TokenIssuer::new(
        &config.auth.jwt_secret,
        config.auth.access_ttl_minutes,
        config.auth.refresh_ttl_days,
    ));

    // Create application state
    let presign_ttl = Duration::from_secs(config.storage.validated_ttl_secs());
    let state = AppState::new(db, store, tokens, presign_ttl);

    // Create router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
