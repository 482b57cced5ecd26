//! CLI command definitions and dispatch.

pub mod admin;
pub mod auth;
pub mod config;
pub mod folder;
pub mod image;
pub mod provision;
pub mod serve;

use clap::{Parser, Subcommand};
use dialoguer::Error as DialogError;

use folio_core::config::AppConfig;
use folio_core::error::{AppError, ErrorKind};
use folio_service::ServiceContext;

use crate::output::OutputFormat;

/// Folio: portfolio gallery administration
#[derive(Debug, Parser)]
#[command(name = "folio", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (without extension, as understood by `config`)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Environment overlay loaded from `config/{env}.toml`
    #[arg(short, long, env = "FOLIO_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create the database, collections, and bucket
    Provision,
    /// Folder management
    Folder(folder::FolderArgs),
    /// Image management
    Image(image::ImageArgs),
    /// Interactive admin console
    Admin,
    /// Password utilities
    Auth(auth::AuthArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Serve => serve::execute(config).await,
            Commands::Provision => provision::execute(config, self.format).await,
            Commands::Folder(args) => folder::execute(args, config, self.format).await,
            Commands::Image(args) => image::execute(args, config, self.format).await,
            Commands::Admin => admin::execute(config).await,
            Commands::Auth(args) => auth::execute(args, &config),
            Commands::Config(args) => config::execute(args, &config, self.format),
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load(self.config.as_deref(), &self.env)
    }
}

/// Build the service context named by the configuration.
pub async fn connect(config: AppConfig) -> Result<ServiceContext, AppError> {
    ServiceContext::from_config(config).await
}

/// Map a prompt failure.
pub fn prompt_error(e: DialogError) -> AppError {
    AppError::with_source(ErrorKind::Internal, "Input error", e)
}
