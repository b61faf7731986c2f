//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseBackend, DatabaseConfig, FileSettings, LoggerSettings, ServerConfig, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Host must not be empty
    /// - Port must be between 1 and 65535
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host is required. Use 127.0.0.1 for local access or 0.0.0.0 for all interfaces.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - URL is required and must be a PostgreSQL URL for the postgres backend
    /// - Max connections must be greater than 0
    /// - Min connections must not exceed max connections
    /// - Connection timeout must be greater than 0
    ///
    /// The memory backend ignores every connection setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == DatabaseBackend::Memory {
            return Ok(());
        }

        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required for the postgres backend. Set database.url or VOYAGE_DATABASE__URL.",
            ));
        }

        if !self.is_valid_database_url() {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }

    fn is_valid_database_url(&self) -> bool {
        ["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - At least one output must be enabled
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()?;

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres_config() -> DatabaseConfig {
        DatabaseConfig {
            url: "postgres://localhost/voyage".to_string(),
            ..DatabaseConfig::default()
        }
    }

    fn assert_field(result: Result<(), ConfigError>, expected: &str) {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, expected),
            other => panic!("Expected validation error on {}, got {:?}", expected, other),
        }
    }

    #[test]
    fn test_server_config_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_server_config_invalid_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        assert_field(config.validate(), "server.port");
    }

    #[test]
    fn test_server_config_empty_host() {
        let config = ServerConfig {
            host: "  ".to_string(),
            ..ServerConfig::default()
        };
        assert_field(config.validate(), "server.host");
    }

    #[test]
    fn test_database_config_valid() {
        assert!(postgres_config().validate().is_ok());
    }

    #[test]
    fn test_database_config_empty_url() {
        assert_field(DatabaseConfig::default().validate(), "database.url");
    }

    #[test]
    fn test_database_config_memory_needs_no_url() {
        let config = DatabaseConfig {
            backend: DatabaseBackend::Memory,
            max_connections: 0,
            ..DatabaseConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_config_rejects_other_schemes() {
        for url in ["mysql://localhost/db", "sqlite://./test.db", "localhost:5432"] {
            let config = DatabaseConfig {
                url: url.to_string(),
                ..DatabaseConfig::default()
            };
            assert_field(config.validate(), "database.url");
        }

        let config = DatabaseConfig {
            url: "postgresql://user:pass@db:5432/voyage".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_config_invalid_max_connections() {
        let config = DatabaseConfig {
            max_connections: 0,
            min_connections: 0,
            ..postgres_config()
        };
        assert_field(config.validate(), "database.max_connections");
    }

    #[test]
    fn test_database_config_min_exceeds_max() {
        let config = DatabaseConfig {
            max_connections: 2,
            min_connections: 5,
            ..postgres_config()
        };
        assert_field(config.validate(), "database.min_connections");
    }

    #[test]
    fn test_database_config_zero_timeout() {
        let config = DatabaseConfig {
            connection_timeout: 0,
            ..postgres_config()
        };
        assert_field(config.validate(), "database.connection_timeout");
    }

    #[test]
    fn test_logger_settings_valid_levels() {
        for level in ["trace", "debug", "INFO", "Warn", "error"] {
            let settings = LoggerSettings {
                level: level.to_string(),
                ..LoggerSettings::default()
            };
            assert!(settings.validate().is_ok(), "{level}");
        }
    }

    #[test]
    fn test_logger_settings_invalid_level() {
        let settings = LoggerSettings {
            level: "verbose".to_string(),
            ..LoggerSettings::default()
        };
        assert_field(settings.validate(), "logger.level");
    }

    #[test]
    fn test_logger_settings_no_outputs() {
        let mut settings = LoggerSettings::default();
        settings.console.enabled = false;
        assert_field(settings.validate(), "logger");
    }

    #[test]
    fn test_logger_settings_file_enabled_empty_path() {
        let mut settings = LoggerSettings::default();
        settings.file.enabled = true;
        settings.file.path = String::new();
        assert_field(settings.validate(), "logger.file.path");
    }

    #[test]
    fn test_logger_settings_invalid_format() {
        let mut settings = LoggerSettings::default();
        settings.file.format = "yaml".to_string();
        assert_field(settings.validate(), "logger.file.format");
    }

    #[test]
    fn test_settings_validation_order() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert_field(settings.validate(), "server.port");

        settings.server.port = 3000;
        assert_field(settings.validate(), "database.url");

        settings.database.backend = DatabaseBackend::Memory;
        assert!(settings.validate().is_ok());
    }
}
