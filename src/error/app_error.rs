use crate::error::DatabaseErrorConverter;
use crate::models::display_name;
use thiserror::Error;

/// Application-wide error type that represents all possible errors in the system.
///
/// Client-facing variants (`InvalidId`, `InvalidData`, `Validation`,
/// `Duplicate`, `NotFound`, `RouteNotFound`) carry enough context to build a
/// human-readable message. Infrastructure variants keep their source for
/// logging only; it never reaches the client.
#[derive(Error, Debug)]
pub enum AppError {
    /// Path identifier failed the identifier format check
    #[error("Invalid {entity} ID: '{value}'")]
    InvalidId { entity: String, value: String },

    /// Request body is not a valid instance of the resource schema
    #[error("Invalid {entity} data: {reason}")]
    InvalidData { entity: String, reason: String },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Duplicate entry error for unique constraint violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// No route matched the request
    #[error("No route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Whether the error was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidId { .. }
                | AppError::InvalidData { .. }
                | AppError::Validation { .. }
                | AppError::Duplicate { .. }
                | AppError::NotFound { .. }
                | AppError::RouteNotFound { .. }
        )
    }

    /// Relabels infrastructure failures with the operation that was attempted.
    ///
    /// Client errors pass through untouched. Everything else becomes
    /// `Database { operation }`, whose client message only names the
    /// operation. The original error is logged here, since the relabeled
    /// one is all the client sees.
    pub fn during(self, operation: impl Into<String>) -> AppError {
        if self.is_client_error() {
            return self;
        }

        let operation = operation.into();
        tracing::error!(operation = %operation, error = ?self, "Store operation failed");

        let source = match self {
            AppError::Database { source, .. }
            | AppError::ConnectionPool { source }
            | AppError::Configuration { source, .. }
            | AppError::Internal { source } => source,
            other => anyhow::Error::from(other),
        };

        AppError::Database { operation, source }
    }

    /// Human-readable message returned to the client.
    pub fn client_message(&self) -> String {
        match self {
            AppError::InvalidId { entity, .. } => format!("Invalid {} ID", entity),
            AppError::InvalidData { entity, reason } => {
                format!("Invalid {} data: {}", entity, reason)
            }
            AppError::Validation { field, reason } => {
                format!("Validation failed for {}: {}", field, reason)
            }
            AppError::Duplicate { entity, field, value } => format!(
                "{} with {} '{}' already exists",
                display_name(entity),
                field,
                value
            ),
            AppError::NotFound { entity, .. } => format!("{} not found", display_name(entity)),
            AppError::RouteNotFound { .. } => "Unknown endpoint".to_string(),
            AppError::Database { operation, .. } => {
                format!("Server error, failed to {}", operation)
            }
            AppError::ConnectionPool { .. } => "Server error, database unavailable".to_string(),
            AppError::Configuration { .. } | AppError::Internal { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<bb8::RunError<diesel_async::pooled_connection::PoolError>> for AppError {
    fn from(error: bb8::RunError<diesel_async::pooled_connection::PoolError>) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::from(error),
        }
    }
}

impl From<crate::config::error::ConfigError> for AppError {
    fn from(error: crate::config::error::ConfigError) -> Self {
        AppError::Configuration {
            key: error.key().to_string(),
            source: anyhow::Error::from(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
