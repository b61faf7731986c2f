//! Serve command handler
//!
//! Handles `serve --dry-run`: validates the merged configuration and reports
//! what the server would do, without binding or touching the store.

use crate::config::{DatabaseBackend, Settings};
use crate::error::AppResult;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the serve command with optional dry-run support
    ///
    /// Without `dry_run` this returns immediately; server startup is owned by
    /// `main`.
    ///
    /// # Errors
    /// - Configuration validation errors
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            self.validate_only()
        } else {
            Ok(())
        }
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        match self.config.database.backend {
            DatabaseBackend::Postgres => println!(
                "✓ Store backend: postgres (pool {}..{}, auto-migrate: {})",
                self.config.database.min_connections,
                self.config.database.max_connections,
                self.config.database.auto_migrate
            ),
            DatabaseBackend::Memory => println!("✓ Store backend: memory (data is not persisted)"),
        }
        println!("✓ Log level: {}", self.config.logger.level);

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
