//! Route definitions for the Folio HTTP API.
//!
//! Everything is mounted under `/api`. Reads are public; writes go through
//! the [`AdminUser`](crate::extractors::AdminUser) extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with every route, the body limit, and request logging.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(folder_routes())
        .merge(image_routes())
        .merge(file_routes())
        .merge(assistant_routes())
        .merge(admin_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Login, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folders::list_folders).post(handlers::folders::create_folder),
        )
        .route(
            "/folders/{id}",
            get(handlers::folders::get_folder)
                .patch(handlers::folders::update_folder)
                .delete(handlers::folders::delete_folder),
        )
}

fn image_routes() -> Router<AppState> {
    Router::new()
        .route("/folders/{id}/images", post(handlers::images::upload_images))
        .route(
            "/folders/{id}/images/url",
            post(handlers::images::add_image_url),
        )
        .route("/images/{id}", delete(handlers::images::delete_image))
}

fn file_routes() -> Router<AppState> {
    Router::new().route("/files/{key}", get(handlers::files::get_file))
}

fn assistant_routes() -> Router<AppState> {
    Router::new().route("/assistant", post(handlers::assistant::ask))
}

/// Storage cleanup inspection and retry
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/cleanup", get(handlers::admin::cleanup_status))
        .route("/admin/cleanup/retry", post(handlers::admin::retry_cleanup))
}
