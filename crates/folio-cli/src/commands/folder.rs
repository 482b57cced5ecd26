//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use folio_core::config::AppConfig;
use folio_core::error::AppError;
use folio_core::types::{FolderId, SortDirection};
use folio_entity::{Folder, UpdateFolder};
use folio_service::filter_by_name;

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List folders with their image counts
    List {
        /// `asc` or `desc` by creation time
        #[arg(short, long, default_value = "asc")]
        order: String,
        /// Case-insensitive name filter
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one folder and its images
    Show {
        /// Folder ID
        id: String,
    },
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: String,
        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Delete a folder, its images, and their stored files
    Delete {
        /// Folder ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    id: String,
    name: String,
    images: usize,
    created_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id.to_string(),
            name: folder.name.clone(),
            images: folder.image_count(),
            created_at: folder.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Image display row
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct ImageRow {
    id: String,
    url: String,
    stored: bool,
}

impl From<&folio_entity::Image> for ImageRow {
    fn from(image: &folio_entity::Image) -> Self {
        Self {
            id: image.id.to_string(),
            url: image.url.clone(),
            stored: image.is_uploaded(),
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = super::connect(config).await?;
    let store = &ctx.store;

    match &args.command {
        FolderCommand::List { order, search } => {
            let direction: SortDirection = order.parse()?;
            let folders = store.folders(direction).await?;
            let folders = filter_by_name(&folders, search.as_deref().unwrap_or_default());
            let rows: Vec<FolderRow> = folders.iter().map(FolderRow::from).collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Show { id } => {
            let folder = store.get_folder(&id.parse::<FolderId>()?).await?;
            output::print_item(&folder, format, print_folder);
        }
        FolderCommand::Create { name } => {
            let folder = store.create_folder(name).await?;
            output::print_item(&folder, format, |f| {
                output::print_success(&format!("Folder '{}' created ({})", f.name, f.id));
            });
        }
        FolderCommand::Rename { id, name } => {
            let patch = UpdateFolder {
                name: Some(name.clone()),
            };
            let folder = store.update_folder(&id.parse::<FolderId>()?, patch).await?;
            output::print_item(&folder, format, |f| {
                output::print_success(&format!("Folder renamed to '{}'", f.name));
            });
        }
        FolderCommand::Delete { id, yes } => {
            let id: FolderId = id.parse()?;
            let folder = store.get_folder(&id).await?;
            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete '{}' and its {} image(s)?",
                        folder.name,
                        folder.image_count()
                    ))
                    .default(false)
                    .interact()
                    .map_err(super::prompt_error)?;
                if !confirm {
                    output::print_warning("Aborted");
                    return Ok(());
                }
            }
            store.delete_folder(&id).await?;
            output::print_success(&format!("Folder '{}' deleted", folder.name));
            let pending = ctx.cleanup.pending_count();
            if pending > 0 {
                output::print_warning(&format!(
                    "{pending} stored file(s) could not be removed and are queued for retry"
                ));
            }
        }
    }
    Ok(())
}

fn print_folder(folder: &Folder) {
    output::print_kv("ID", folder.id.as_str());
    output::print_kv("Name", &folder.name);
    output::print_kv("Created", &folder.created_at.to_rfc3339());
    let rows: Vec<ImageRow> = folder.images.iter().map(ImageRow::from).collect();
    output::print_list(&rows, OutputFormat::Table);
}
