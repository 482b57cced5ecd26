//! Application builder: wires router, middleware, and state into an Axum app.

use axum::Router;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::info;

use folio_core::error::{AppError, ErrorKind};
use folio_service::ServiceContext;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(build_compression_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serve the API until `shutdown` flips to `true`.
///
/// The background cleanup task shares the same signal and is awaited
/// before returning.
pub async fn run_server(
    ctx: ServiceContext,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), AppError> {
    let cleanup_task = ctx.spawn_cleanup(shutdown.clone());

    let state = AppState::new(&ctx);
    let addr = format!("{}:{}", ctx.config.server.host, ctx.config.server.port);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;
    info!(
        %addr,
        documents = ctx.backend.documents.backend_type(),
        storage = ctx.backend.storage.provider_type(),
        "Folio server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow_and_update() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
        })
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    if let Some(task) = cleanup_task {
        let _ = task.await;
    }
    info!("Folio server stopped");
    Ok(())
}
