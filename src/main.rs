//! Folio server: portfolio gallery API.
//!
//! Loads configuration, sets up logging, connects the configured backend,
//! and serves until SIGINT or SIGTERM.

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use folio_core::config::AppConfig;
use folio_core::error::AppError;
use folio_service::ServiceContext;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay, and `FOLIO_` variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path = std::env::var("FOLIO_CONFIG").ok();
    let env = std::env::var("FOLIO_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(config_path.as_deref(), &env)
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
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        documents = %config.backend.documents,
        storage = %config.backend.storage,
        "Starting Folio"
    );

    let ctx = ServiceContext::from_config(config).await?;
    if !ctx.auth.is_enabled() {
        tracing::warn!("Admin login disabled until auth.admin_password_hash is set");
    }

    let health = ctx.backend.health().await;
    if !health.is_healthy() {
        tracing::warn!(
            documents = health.documents,
            storage = health.storage,
            "Backend not fully reachable; run `folio-cli provision` if resources are missing"
        );
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    folio_api::run_server(ctx, shutdown_rx).await
}

/// Resolves on Ctrl+C or SIGTERM. A handler that fails to install never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
