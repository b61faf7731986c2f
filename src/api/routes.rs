//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;

use crate::api::handlers::resources::resource_routes;
use crate::api::middleware::{
    logging_middleware, normalize_error_response, panic_response, request_id_middleware,
    unknown_endpoint,
};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID middleware (outermost) - generates/propagates request IDs
/// 2. Logging middleware - logs requests with request IDs
/// 3. Panic catcher - turns handler panics into a 500 JSON response
/// 4. Error normalizer - rewrites framework error bodies to `{"message"}`
///
/// # Routes
/// - `/api/tours` - Tour CRUD operations
/// - `/api/users` - User CRUD operations
/// - anything else, including unsupported methods on those paths - 404 "Unknown endpoint"
///
/// # Example
/// ```ignore
/// let state = AppState::new(Repositories::memory());
/// let router = create_router(state);
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(resource_routes("/api/tours", state.services.tours.clone()))
        .merge(resource_routes("/api/users", state.services.users.clone()))
        .fallback(unknown_endpoint)
        .layer(middleware::from_fn(normalize_error_response))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
