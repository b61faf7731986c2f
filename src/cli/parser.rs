//! Command-line interface definition
//!
//! `voyage-rs` with no subcommand behaves like `voyage-rs serve`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::validation::{
    validate_config_file_path, validate_host_address, validate_port, validate_rollback_steps,
};

/// Tour booking REST API backed by a document store
#[derive(Parser, Debug)]
#[command(name = "voyage-rs")]
#[command(about = "Tour booking REST API backed by a document store")]
#[command(long_about = "
voyage-rs serves CRUD endpoints for tours and users under /api/tours and
/api/users. Documents live in PostgreSQL (JSONB) or, for local runs and
tests, in an in-memory store selected with database.backend = \"memory\".

Configuration is read from config/default.toml, config/<env>.toml and
config/local.toml, then VOYAGE_* environment variables (for example
VOYAGE_SERVER__PORT=8080), then the flags below.

EXAMPLES:
    voyage-rs                                   # serve with config/ defaults
    voyage-rs serve --host 0.0.0.0 --port 8080
    voyage-rs --env production serve --dry-run  # check production config
    voyage-rs --config ./voyage.toml serve
    voyage-rs migrate --dry-run                 # list pending migrations
    voyage-rs migrate --rollback 1
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Read a single TOML file instead of the layered config/ directory
    #[arg(short, long, value_name = "FILE", value_parser = validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Environment whose config/<env>.toml is layered in (overrides VOYAGE_APP_ENV)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    ///
    /// Builds the configured document store, running pending migrations
    /// first when database.auto_migrate is set, and serves /api/tours and
    /// /api/users until Ctrl+C or SIGTERM.
    Serve {
        /// Address to bind, e.g. 127.0.0.1 or 0.0.0.0
        #[arg(long, value_name = "ADDRESS", value_parser = validate_host_address)]
        host: Option<String>,

        /// TCP port to listen on (1-65535)
        #[arg(short, long, value_name = "PORT", value_parser = validate_port)]
        port: Option<u16>,

        /// Log level for this run; wins over --verbose and --quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate the merged configuration and exit without serving
        #[arg(long)]
        dry_run: bool,
    },

    /// Apply or revert the embedded PostgreSQL schema migrations
    Migrate {
        /// List pending migrations without applying them
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Revert the last STEPS applied migrations (1-100)
        #[arg(long, value_name = "STEPS", conflicts_with = "dry_run", value_parser = validate_rollback_steps)]
        rollback: Option<u32>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    /// Checks flag combinations that clap's `conflicts_with` does not catch
    /// when the struct is built by hand.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        if let Some(Commands::Migrate {
            dry_run: true,
            rollback: Some(_),
        }) = self.command
        {
            return Err("Cannot use --dry-run and --rollback together".to_string());
        }

        Ok(())
    }

    /// Extra guidance printed after a validation error
    pub fn get_validation_help() -> &'static str {
        r#"
Hints:
  --port          1-65535; ports below 1024 usually need root
  --host          IP literal or hostname; 0.0.0.0 listens on every interface
  --config        an existing, readable TOML file
  --rollback      1-100, not combined with --dry-run
  --verbose/-v    not combined with --quiet/-q

Run `voyage-rs help <subcommand>` for details.
"#
    }

    /// Log level implied by the flags, if any; `serve --log-level` wins
    pub fn log_level_override(&self) -> Option<&'static str> {
        if let Some(Commands::Serve {
            log_level: Some(level),
            ..
        }) = self.command
        {
            return Some(level.as_str());
        }

        if self.verbose {
            Some(LogLevel::Debug.as_str())
        } else if self.quiet {
            Some(LogLevel::Error.as_str())
        } else {
            None
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_flag() {
        let result = Cli::try_parse_from(&["voyage-rs", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(&["voyage-rs", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_behavior() {
        let cli = Cli::try_parse_from(&["voyage-rs"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
        assert!(cli.env.is_none());
    }

    #[test]
    fn test_serve_command() {
        let cli =
            Cli::try_parse_from(&["voyage-rs", "serve", "--host", "0.0.0.0", "--port", "8080"])
                .unwrap();
        if let Some(Commands::Serve {
            host,
            port,
            log_level: _,
            dry_run,
        }) = cli.command
        {
            assert_eq!(host, Some("0.0.0.0".to_string()));
            assert_eq!(port, Some(8080));
            assert!(!dry_run);
        } else {
            panic!("Expected Serve command");
        }
    }

    #[test]
    fn test_migrate_command() {
        let cli = Cli::try_parse_from(&["voyage-rs", "migrate", "--dry-run"]).unwrap();
        if let Some(Commands::Migrate { dry_run, rollback }) = cli.command {
            assert!(dry_run);
            assert!(rollback.is_none());
        } else {
            panic!("Expected Migrate command");
        }
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::try_parse_from(&["voyage-rs", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_env_flag_maps_to_config_environment() {
        let cli = Cli::try_parse_from(&["voyage-rs", "--env", "prod", "serve"]).unwrap();
        let env: crate::config::Environment = cli.env.unwrap().into();
        assert_eq!(env, crate::config::Environment::Production);

        let cli = Cli::try_parse_from(&["voyage-rs", "--env", "staging"]).unwrap();
        let env: crate::config::Environment = cli.env.unwrap().into();
        assert_eq!(env, crate::config::Environment::Staging);
    }

    #[test]
    fn test_rollback_out_of_range_rejected() {
        let result = Cli::try_parse_from(&["voyage-rs", "migrate", "--rollback", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level_override_precedence() {
        let cli = Cli::try_parse_from(&["voyage-rs"]).unwrap();
        assert_eq!(cli.log_level_override(), None);

        let cli = Cli::try_parse_from(&["voyage-rs", "-q"]).unwrap();
        assert_eq!(cli.log_level_override(), Some("error"));

        let cli =
            Cli::try_parse_from(&["voyage-rs", "-v", "serve", "--log-level", "trace"]).unwrap();
        assert_eq!(cli.log_level_override(), Some("trace"));
    }

    #[test]
    fn test_validate_hand_built_conflicts() {
        let cli = Cli {
            command: Some(Commands::Migrate {
                dry_run: true,
                rollback: Some(2),
            }),
            config: None,
            env: None,
            verbose: false,
            quiet: false,
        };
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let result = Cli::try_parse_from(&["voyage-rs", "--verbose", "--quiet"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
