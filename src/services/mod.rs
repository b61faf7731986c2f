//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod resource_service;

pub use resource_service::ResourceService;

use crate::models::{Tour, User};
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since every service shares the store `Arc`.
#[derive(Clone)]
pub struct Services {
    pub tours: ResourceService<Tour>,
    pub users: ResourceService<User>,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories) -> Self {
        Self {
            tours: ResourceService::new(repos.store.clone()),
            users: ResourceService::new(repos.store),
        }
    }
}
