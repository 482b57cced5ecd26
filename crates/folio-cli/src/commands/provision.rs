//! `provision`: create the backend resources the gallery needs.

use serde::Serialize;
use tabled::Tabled;

use folio_core::config::AppConfig;
use folio_core::error::AppError;
use folio_service::{ProvisionOutcome, provision};

use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
struct StepRow {
    kind: String,
    id: String,
    outcome: String,
}

/// Run provisioning and print one row per resource.
pub async fn execute(config: AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let ctx = super::connect(config).await?;
    let report = provision::run(&ctx.backend).await?;

    let rows: Vec<StepRow> = report
        .steps
        .iter()
        .map(|step| StepRow {
            kind: step.kind.to_string(),
            id: step.id.clone(),
            outcome: match step.outcome {
                ProvisionOutcome::Created => "created",
                ProvisionOutcome::AlreadyExists => "already exists",
            }
            .to_string(),
        })
        .collect();
    output::print_list(&rows, format);

    if format == OutputFormat::Table {
        match report.created() {
            0 => output::print_warning("Everything was already provisioned"),
            n => output::print_success(&format!("Created {n} resource(s)")),
        }
    }
    Ok(())
}
