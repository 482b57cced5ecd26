//! One-shot setup of the database, collections, and image bucket.
//!
//! Every step is idempotent: a `Conflict` means the resource is already
//! there and counts as success. Any other error halts the run.

use serde::Serialize;
use tracing::{error, info};

use folio_core::result::AppResult;

use crate::backend::Backend;

/// Display name given to a newly created database.
const DATABASE_NAME: &str = "Portfolio Database";

/// What happened to one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionOutcome {
    /// The resource was created by this run.
    Created,
    /// The resource was already present.
    AlreadyExists,
}

/// One provisioning step.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionStep {
    /// Resource kind: `database`, `collection`, or `bucket`.
    pub kind: &'static str,
    /// Resource identifier.
    pub id: String,
    /// Outcome.
    pub outcome: ProvisionOutcome,
}

/// Steps of a completed run, in execution order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProvisionReport {
    /// Completed steps.
    pub steps: Vec<ProvisionStep>,
}

impl ProvisionReport {
    /// Number of resources this run created.
    pub fn created(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.outcome == ProvisionOutcome::Created)
            .count()
    }

    fn record(
        &mut self,
        kind: &'static str,
        id: &str,
        result: AppResult<()>,
    ) -> AppResult<()> {
        let outcome = match result {
            Ok(()) => {
                info!(kind, id, "Created");
                ProvisionOutcome::Created
            }
            Err(e) if e.is_conflict() => {
                info!(kind, id, "Already exists");
                ProvisionOutcome::AlreadyExists
            }
            Err(e) => {
                error!(kind, id, error = %e, "Provisioning failed");
                return Err(e);
            }
        };
        self.steps.push(ProvisionStep {
            kind,
            id: id.to_string(),
            outcome,
        });
        Ok(())
    }
}

/// Create the database, both collections, and the bucket.
pub async fn run(backend: &Backend) -> AppResult<ProvisionReport> {
    let ids = &backend.ids;
    let mut report = ProvisionReport::default();

    info!(
        documents = backend.documents.backend_type(),
        storage = backend.storage.provider_type(),
        "Provisioning backend"
    );

    report.record(
        "database",
        &ids.database,
        backend.documents.create_database(DATABASE_NAME).await,
    )?;
    for schema in [ids.folders_schema(), ids.images_schema()] {
        let result = backend.documents.create_collection(&schema).await;
        report.record("collection", &schema.id, result)?;
    }
    report.record(
        "bucket",
        &ids.bucket,
        backend.storage.create_bucket(&ids.bucket_policy()).await,
    )?;

    info!(created = report.created(), "Provisioning complete");
    Ok(report)
}
