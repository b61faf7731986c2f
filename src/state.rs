//! Application state for Axum web framework.
//!
//! Contains shared services that are accessible across all request handlers.

use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services.
///
/// Cloning is cheap since the services only hold an `Arc` to the store.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Name of the active store backend, for diagnostics
    pub store_backend: &'static str,
}

impl AppState {
    /// Creates a new AppState from the repositories.
    ///
    /// # Example
    /// ```ignore
    /// let state = AppState::new(Repositories::memory());
    /// ```
    pub fn new(repos: Repositories) -> Self {
        let store_backend = repos.store.name();
        let services = Services::new(repos);
        Self {
            services,
            store_backend,
        }
    }
}
