//! Image management CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use folio_core::config::AppConfig;
use folio_core::error::{AppError, ErrorKind};
use folio_core::types::{FolderId, ImageId};
use folio_entity::UploadFile;

use super::folder::ImageRow;
use crate::output::{self, OutputFormat};

/// Arguments for image commands
#[derive(Debug, Args)]
pub struct ImageArgs {
    /// Image subcommand
    #[command(subcommand)]
    pub command: ImageCommand,
}

/// Image subcommands
#[derive(Debug, Subcommand)]
pub enum ImageCommand {
    /// Upload local files into a folder, in order
    Upload {
        /// Folder ID
        #[arg(short, long)]
        folder: String,
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Add an external image by URL
    AddUrl {
        /// Folder ID
        #[arg(short, long)]
        folder: String,
        /// Image URL
        url: String,
        /// Requested position
        #[arg(short, long, default_value = "0")]
        position: u32,
    },
    /// Delete an image and its stored file
    Delete {
        /// Image ID
        id: String,
    },
}

/// Read files from disk for upload.
pub(crate) async fn read_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>, AppError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let data = tokio::fs::read(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Validation,
                format!("Cannot read '{}'", path.display()),
                e,
            )
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        files.push(UploadFile::new(name, data));
    }
    Ok(files)
}

/// Execute image commands
pub async fn execute(
    args: &ImageArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let ctx = super::connect(config).await?;
    let store = &ctx.store;

    match &args.command {
        ImageCommand::Upload { folder, files } => {
            let folder: FolderId = folder.parse()?;
            let uploads = read_files(files).await?;
            let report = store.upload_images(&folder, uploads).await?;

            let rows: Vec<ImageRow> = report.uploaded.iter().map(ImageRow::from).collect();
            output::print_list(&rows, format);
            if let Some(failure) = report.failure {
                output::print_error(&format!(
                    "Stopped at '{}': {}",
                    failure.file_name, failure.error
                ));
                return Err(failure.error);
            }
            output::print_success(&format!("Uploaded {} file(s)", report.uploaded.len()));
        }
        ImageCommand::AddUrl {
            folder,
            url,
            position,
        } => {
            let image = store
                .add_image_url(&folder.parse::<FolderId>()?, url, *position)
                .await?;
            output::print_list(&[ImageRow::from(&image)], format);
        }
        ImageCommand::Delete { id } => {
            store.delete_image(&id.parse::<ImageId>()?).await?;
            output::print_success("Image deleted");
        }
    }
    Ok(())
}
