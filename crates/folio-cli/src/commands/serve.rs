//! `serve`: run the HTTP server until Ctrl+C.

use tokio::sync::watch;
use tracing::info;

use folio_core::config::AppConfig;
use folio_core::error::AppError;

use crate::output;

/// Start the server and block until shutdown.
pub async fn execute(config: AppConfig) -> Result<(), AppError> {
    let ctx = super::connect(config).await?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
        }
        let _ = shutdown_tx.send(true);
    });

    output::print_success(&format!(
        "Serving on {}:{}",
        ctx.config.server.host, ctx.config.server.port
    ));
    folio_api::run_server(ctx, shutdown_rx).await
}
