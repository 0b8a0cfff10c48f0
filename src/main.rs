//! UserHub Server — user identity and session service
//!
//! Main entry point that wires all crates together and starts serving
//! the message bus.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use userhub_auth::password::PasswordHasher;
use userhub_auth::session::SessionManager;
use userhub_auth::token::{TokenIssuer, TokenVerifier};
use userhub_bus::Handler;
use userhub_cache::{MemorySessionStore, RedisClient, RedisSessionStore};
use userhub_core::config::AppConfig;
use userhub_core::error::AppError;
use userhub_core::traits::SessionStore;
use userhub_database::repositories::CredentialRepository;
use userhub_database::{DatabasePool, migration};
use userhub_service::AuthService;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("USERHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting UserHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db_pool = DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    migration::run_migrations(db_pool.pool()).await?;
    tracing::info!("Database migrations complete");

    // ── Step 2: Session store ────────────────────────────────────
    tracing::info!(
        "Initializing session store (provider: {})...",
        config.cache.provider
    );
    let session_store: Arc<dyn SessionStore> = match config.cache.provider.as_str() {
        "memory" => Arc::new(MemorySessionStore::new()),
        _ => {
            let redis_client = RedisClient::connect(&config.cache.redis).await?;
            Arc::new(RedisSessionStore::new(redis_client))
        }
    };
    tracing::info!("Session store initialized");

    // ── Step 3: Message bus connection ───────────────────────────
    tracing::info!(addr = %config.broker.addr(), "Connecting to NATS...");
    let nats_client = async_nats::ConnectOptions::new()
        .name("userhub")
        .connect(config.broker.addr())
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to NATS: {e}")))?;
    tracing::info!("Connected to NATS");

    // ── Step 4: Wire services ────────────────────────────────────
    let credentials = Arc::new(CredentialRepository::new(db_pool.pool().clone()));
    let service = AuthService::new(
        credentials,
        PasswordHasher::new(),
        TokenIssuer::new(&config.auth),
        TokenVerifier::new(&config.auth),
        SessionManager::new(session_store),
    );

    // ── Step 5: Serve until shutdown ─────────────────────────────
    let handler = Handler::new(nats_client, service);
    tokio::select! {
        result = handler.run() => result?,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
        }
    }

    db_pool.close().await;
    tracing::info!("UserHub stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
