//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use folio_core::error::{AppError, ErrorKind};

/// Run all pending document store migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Document store migrations applied");
    Ok(())
}
