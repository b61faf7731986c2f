//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::{DatabaseBackend, Settings};
use crate::error::{AppError, AppResult};

/// Execute a CLI command with the given settings
///
/// `serve` without `--dry-run` (and no subcommand at all) returns `Ok(())`
/// without doing anything; the caller then starts the server.
///
/// # Errors
/// Returns errors from command handlers or validation failures
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    validate_command_args(cli, &settings)?;

    match &cli.command {
        Some(Commands::Serve { dry_run: true, .. }) => {
            ServeCommandHandler::new(settings).execute(true).await
        }
        Some(Commands::Serve { .. }) | None => Ok(()),
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
    }
}

/// Checks argument combinations clap cannot express
fn validate_command_args(cli: &Cli, settings: &Settings) -> AppResult<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })?;

    match cli.command {
        Some(Commands::Migrate { rollback, .. }) => {
            if settings.database.backend == DatabaseBackend::Memory {
                return Err(AppError::Validation {
                    field: "database.backend".to_string(),
                    reason: "Migrations require the postgres backend".to_string(),
                });
            }
            if let Some(steps) = rollback
                && steps > 50
            {
                tracing::warn!(steps, "Rolling back a large number of migrations");
            }
        }
        Some(Commands::Serve {
            ref host,
            port: Some(port),
            ..
        }) if host.as_deref() == Some("localhost") && port == 80 => {
            tracing::warn!("Using port 80 with localhost may conflict with other services");
        }
        _ => {}
    }

    Ok(())
}
