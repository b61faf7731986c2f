//! Error handler for converting AppError to HTTP responses.
//!
//! Every error leaves the API as `{"message": "..."}` with status 400, 404
//! or 500. Responses produced by the framework itself (method mismatch,
//! panics) are normalized into the same shape.

use std::any::Any;

use axum::{
    Json,
    extract::Request,
    http::{Method, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Limit on framework error bodies read back by the normalizer.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - InvalidId, InvalidData, Validation, Duplicate → 400 BAD_REQUEST
    /// - NotFound, RouteNotFound → 404 NOT_FOUND
    /// - Database, ConnectionPool, Configuration, Internal → 500 INTERNAL_SERVER_ERROR
    ///
    /// Infrastructure errors only expose the failed operation; their source
    /// stays in the logs.
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);

        match &self {
            AppError::Database { .. } => {}
            error if status.is_server_error() => {
                tracing::error!(error = ?error, "Request failed");
            }
            error => {
                tracing::debug!(error = %error, "Request rejected");
            }
        }

        (status, Json(ErrorResponse::new(self.client_message()))).into_response()
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::InvalidId { .. }
        | AppError::InvalidData { .. }
        | AppError::Validation { .. }
        | AppError::Duplicate { .. } => StatusCode::BAD_REQUEST,
        AppError::NotFound { .. } | AppError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Database { .. }
        | AppError::ConnectionPool { .. }
        | AppError::Configuration { .. }
        | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Router fallback for paths no route matches.
pub async fn unknown_endpoint(method: Method, uri: Uri) -> AppError {
    AppError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

/// Response used by `CatchPanicLayer` when a handler panics.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error")),
    )
        .into_response()
}

/// Rewrites non-JSON error responses into the `{"message"}` shape.
///
/// Handlers already answer with JSON; this catches what axum produces on
/// its own, such as `405 Method Not Allowed` with an empty body.
pub async fn normalize_error_response(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if is_json {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let original_message = axum::body::to_bytes(body, MAX_ERROR_BODY_BYTES)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_string())
        .unwrap_or_default();

    let message = if !original_message.is_empty() && !status.is_server_error() {
        original_message
    } else {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    };

    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);

    let normalized = Json(ErrorResponse::new(message)).into_response();
    let (json_parts, json_body) = normalized.into_parts();
    parts.headers.extend(json_parts.headers);

    Response::from_parts(parts, json_body)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_client_error_status_codes() {
        let invalid = AppError::InvalidId {
            entity: "tour".to_string(),
            value: "x".to_string(),
        };
        let duplicate = AppError::Duplicate {
            entity: "user".to_string(),
            field: "email".to_string(),
            value: "a@b.c".to_string(),
        };
        let missing = AppError::NotFound {
            entity: "tour".to_string(),
            field: "id".to_string(),
            value: "507f1f77bcf86cd799439011".to_string(),
        };

        assert_eq!(error_to_status_code(&invalid), StatusCode::BAD_REQUEST);
        assert_eq!(error_to_status_code(&duplicate), StatusCode::BAD_REQUEST);
        assert_eq!(error_to_status_code(&missing), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_infrastructure_errors_are_500() {
        let pool = AppError::ConnectionPool {
            source: anyhow::anyhow!("Pool exhausted"),
        };
        let internal = AppError::Internal {
            source: anyhow::anyhow!("Unexpected error"),
        };

        assert_eq!(error_to_status_code(&pool), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_to_status_code(&internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_database_error_hides_source() {
        let error = AppError::Database {
            operation: "update tour".to_string(),
            source: anyhow::anyhow!("password=hunter2 connection refused"),
        };

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"message": "Server error, failed to update tour"})
        );
    }

    #[tokio::test]
    async fn test_panic_response_shape() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"message": "Internal server error"})
        );
    }

    #[tokio::test]
    async fn test_unknown_endpoint_message() {
        let error = unknown_endpoint(Method::GET, Uri::from_static("/nope")).await;
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"message": "Unknown endpoint"})
        );
    }
}
