//! Configuration merger for CLI arguments and config files
//!
//! This module handles merging CLI argument overrides with file-based configuration,
//! implementing the configuration precedence logic.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};
use std::path::Path;

/// Configuration merger that handles CLI argument integration with file-based configuration
///
/// This struct implements the configuration precedence logic where CLI arguments
/// override configuration file values.
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    /// Create a new configuration merger with base configuration
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Create a configuration merger by loading configuration for the parsed CLI
    ///
    /// `--config` selects a single configuration file and `--env` overrides
    /// `VOYAGE_APP_ENV`; otherwise the default layered loader is used. The
    /// loaded settings are not validated here, since CLI overrides may still
    /// change them. `merge_cli_args` validates the final result.
    ///
    /// # Errors
    /// Returns ConfigError if the configuration cannot be read or parsed
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;

        if let Some(ref path) = cli.config {
            Self::validate_config_file_access(path)?;
            loader = loader.with_config_file(path);
        }

        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }

        Ok(Self::new(loader.load_unvalidated()?))
    }

    /// Validate that the configuration file is accessible and readable
    fn validate_config_file_access(path: &Path) -> Result<(), ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::validation(
                "config_file".to_string(),
                format!("Configuration path is not a file: '{}'", path.display()),
            ));
        }

        std::fs::File::open(path).map(|_| ()).map_err(|e| {
            ConfigError::validation(
                "config_file".to_string(),
                format!("Cannot read configuration file '{}': {}", path.display(), e),
            )
        })
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// This method applies CLI argument overrides according to the precedence rules:
    /// 1. CLI arguments have highest priority
    /// 2. Configuration file values are used as base
    ///
    /// # Arguments
    /// * `cli` - Parsed CLI arguments
    ///
    /// # Returns
    /// A new Settings instance with CLI overrides applied
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if let Some(level) = cli.log_level_override() {
            config.logger.level = level.to_string();
        }

        if let Some(Commands::Serve { host, port, .. }) = &cli.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Get the current configuration (useful for inspection)
    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::Cli;
    use crate::config::DatabaseBackend;
    use clap::Parser;

    fn create_valid_base_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/test".to_string();
        config
    }

    #[test]
    fn test_configuration_merger_new() {
        let base_config = Settings::default();
        let merger = ConfigurationMerger::new(base_config.clone());
        assert_eq!(merger.config(), &base_config);
    }

    #[test]
    fn test_configuration_merger_merge_verbose_flag() {
        let base_config = create_valid_base_config();
        let merger = ConfigurationMerger::new(base_config);

        let cli = Cli::try_parse_from(&["voyage-rs", "--verbose"]).unwrap();
        let merged_config = merger.merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.logger.level, "debug");
    }

    #[test]
    fn test_configuration_merger_merge_quiet_flag() {
        let base_config = create_valid_base_config();
        let merger = ConfigurationMerger::new(base_config);

        let cli = Cli::try_parse_from(&["voyage-rs", "--quiet"]).unwrap();
        let merged_config = merger.merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.logger.level, "error");
    }

    #[test]
    fn test_configuration_merger_merge_serve_host() {
        let base_config = create_valid_base_config();
        let merger = ConfigurationMerger::new(base_config);

        let cli = Cli::try_parse_from(&["voyage-rs", "serve", "--host", "0.0.0.0"]).unwrap();
        let merged_config = merger.merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_configuration_merger_merge_serve_port() {
        let base_config = create_valid_base_config();
        let merger = ConfigurationMerger::new(base_config);

        let cli = Cli::try_parse_from(&["voyage-rs", "serve", "--port", "8080"]).unwrap();
        let merged_config = merger.merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.server.port, 8080);
    }

    #[test]
    fn test_configuration_merger_command_log_level_overrides_global() {
        let base_config = create_valid_base_config();
        let merger = ConfigurationMerger::new(base_config);

        let cli = Cli::try_parse_from(&["voyage-rs", "--verbose", "serve", "--log-level", "warn"])
            .unwrap();
        let merged_config = merger.merge_cli_args(&cli).unwrap();

        assert_eq!(merged_config.logger.level, "warn");
    }

    #[test]
    fn test_configuration_merger_rejects_invalid_result() {
        let mut base_config = create_valid_base_config();
        base_config.database.url = String::new();
        let merger = ConfigurationMerger::new(base_config);

        let cli = Cli::try_parse_from(&["voyage-rs", "serve"]).unwrap();
        assert!(merger.merge_cli_args(&cli).is_err());
    }

    #[test]
    fn test_configuration_merger_from_cli_config_file() {
        let _lock = crate::config::ENV_TEST_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("voyage.toml");
        std::fs::write(
            &path,
            "[server]\nport = 4321\n\n[database]\nbackend = \"memory\"\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from(&[
            "voyage-rs",
            "--config",
            path.to_str().unwrap(),
            "serve",
            "--port",
            "8081",
        ])
        .unwrap();
        let merger = ConfigurationMerger::from_cli(&cli).unwrap();
        assert_eq!(merger.config().server.port, 4321);

        let merged = merger.merge_cli_args(&cli).unwrap();
        assert_eq!(merged.server.port, 8081);
        assert_eq!(merged.database.backend, DatabaseBackend::Memory);
    }
}
