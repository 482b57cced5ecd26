//! Password utilities.

use clap::{Args, Subcommand};

use folio_auth::{PasswordHasher, PasswordValidator};
use folio_core::config::AppConfig;
use folio_core::error::AppError;

use crate::output;

/// Arguments for auth commands
#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Auth subcommand
    #[command(subcommand)]
    pub command: AuthCommand,
}

/// Auth subcommands
#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Hash an admin password for `auth.admin_password_hash`
    HashPassword {
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Execute auth commands
pub fn execute(args: &AuthArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        AuthCommand::HashPassword { password } => {
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Admin password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(super::prompt_error)?,
            };

            PasswordValidator::new(&config.auth).validate(&password)?;
            let hash = PasswordHasher::new().hash_password(&password)?;

            output::print_success("Password hashed");
            println!("{hash}");
            println!();
            println!("Set it with FOLIO_AUTH__ADMIN_PASSWORD_HASH or in [auth].");
        }
    }
    Ok(())
}
