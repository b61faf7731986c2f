//! Generic resource service.
//!
//! One implementation of list/create/get/update/delete shared by every
//! resource kind. Per-kind behavior comes from [`ResourceKind`] constants.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Filter, ObjectId, Resource, ResourceKind};
use crate::repositories::DocumentStore;

/// Service for one resource collection.
///
/// Holds only the shared store handle, so cloning is cheap.
pub struct ResourceService<K> {
    store: Arc<dyn DocumentStore>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for ResourceService<K> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _kind: PhantomData,
        }
    }
}

impl<K: ResourceKind> ResourceService<K> {
    /// Creates a new service over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    /// Checks the identifier format before any store access.
    ///
    /// # Returns
    /// The parsed identifier, or `InvalidId` for malformed input
    pub fn parse_id(&self, raw: &str) -> AppResult<ObjectId> {
        ObjectId::parse_str(raw).map_err(|_| AppError::InvalidId {
            entity: K::NAME.to_string(),
            value: raw.to_string(),
        })
    }

    /// Runs the schema rules of the body.
    pub fn validate_body(&self, body: &K) -> AppResult<()> {
        body.validate().map_err(|errors| AppError::InvalidData {
            entity: K::NAME.to_string(),
            reason: errors.to_string(),
        })
    }

    /// Lists all resources, newest first.
    pub async fn list(&self) -> AppResult<Vec<Resource<K>>> {
        let operation = format!("retrieve {}", K::COLLECTION);

        self.store
            .find_all(K::COLLECTION)
            .await
            .and_then(|docs| docs.into_iter().map(Resource::try_from).collect())
            .map_err(|e| e.during(operation))
    }

    /// Creates a resource from a validated body.
    ///
    /// Unique fields are checked first so the common duplicate case never
    /// reaches `create`; the store's own constraint catches the rest.
    ///
    /// # Returns
    /// The created resource with its assigned id and timestamps
    pub async fn create(&self, body: K) -> AppResult<Resource<K>> {
        let operation = format!("create {}", K::NAME);
        self.validate_body(&body)?;

        let data = body.to_attributes().map_err(|e| e.during(operation.as_str()))?;

        for field in K::UNIQUE_FIELDS {
            let Some(value) = data.get(*field) else {
                continue;
            };

            let filter = Filter::new().eq(*field, value.clone());
            let existing = self
                .store
                .find_one(K::COLLECTION, &filter)
                .await
                .map_err(|e| e.during(operation.as_str()))?;

            if existing.is_some() {
                tracing::info!(
                    entity = K::NAME,
                    field = *field,
                    "Rejected create with duplicate unique field"
                );
                return Err(self.duplicate(field, value));
            }
        }

        let document = self
            .store
            .create(K::COLLECTION, data)
            .await
            .map_err(|e| self.relabel_duplicate(e))
            .map_err(|e| e.during(operation.as_str()))?;

        tracing::info!(entity = K::NAME, id = %document.id, "Resource created");
        Resource::try_from(document).map_err(|e| e.during(operation))
    }

    /// Gets a resource by id.
    ///
    /// # Returns
    /// The resource if found, or `NotFound` error
    pub async fn get(&self, id: ObjectId) -> AppResult<Resource<K>> {
        let operation = format!("retrieve {}", K::NAME);

        self.store
            .find_by_id(K::COLLECTION, id)
            .await
            .map_err(|e| e.during(operation.as_str()))?
            .ok_or_else(|| self.not_found(id))
            .and_then(|doc| Resource::try_from(doc).map_err(|e| e.during(operation)))
    }

    /// Replaces every attribute of a resource.
    ///
    /// Id and `createdAt` are preserved by the store.
    ///
    /// # Returns
    /// The resource as it is after the replacement
    pub async fn update(&self, id: ObjectId, body: K) -> AppResult<Resource<K>> {
        let operation = format!("update {}", K::NAME);
        self.validate_body(&body)?;

        let data = body.to_attributes().map_err(|e| e.during(operation.as_str()))?;

        let document = self
            .store
            .find_one_and_replace(K::COLLECTION, id, data)
            .await
            .map_err(|e| self.relabel_duplicate(e))
            .map_err(|e| e.during(operation.as_str()))?
            .ok_or_else(|| self.not_found(id))?;

        tracing::info!(entity = K::NAME, id = %document.id, "Resource replaced");
        Resource::try_from(document).map_err(|e| e.during(operation))
    }

    /// Deletes a resource.
    ///
    /// # Returns
    /// `Ok(())` if the resource existed and was removed, `NotFound` otherwise
    pub async fn delete(&self, id: ObjectId) -> AppResult<()> {
        let operation = format!("delete {}", K::NAME);

        let deleted = self
            .store
            .find_one_and_delete(K::COLLECTION, id)
            .await
            .map_err(|e| e.during(operation))?;

        match deleted {
            Some(_) => {
                tracing::info!(entity = K::NAME, id = %id, "Resource deleted");
                Ok(())
            }
            None => Err(self.not_found(id)),
        }
    }

    fn not_found(&self, id: ObjectId) -> AppError {
        AppError::NotFound {
            entity: K::NAME.to_string(),
            field: "id".to_string(),
            value: id.to_string(),
        }
    }

    fn duplicate(&self, field: &str, value: &serde_json::Value) -> AppError {
        AppError::Duplicate {
            entity: K::NAME.to_string(),
            field: field.to_string(),
            value: value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
        }
    }

    /// Store-level duplicates name the collection; report the kind instead.
    fn relabel_duplicate(&self, error: AppError) -> AppError {
        match error {
            AppError::Duplicate { field, value, .. } => AppError::Duplicate {
                entity: K::NAME.to_string(),
                field,
                value,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Tour, User};
    use crate::repositories::memory_store_for_resources;

    fn tours() -> ResourceService<Tour> {
        ResourceService::new(Arc::new(memory_store_for_resources()))
    }

    fn tour(name: &str) -> Tour {
        Tour {
            name: name.to_string(),
            info: None,
            image: None,
            price: None,
        }
    }

    fn user(name: &str, email: &str) -> User {
        User {
            name: name.to_string(),
            email: email.to_string(),
            phone_number: None,
            gender: None,
            date_of_birth: None,
            membership_status: None,
        }
    }

    #[test]
    fn test_parse_id() {
        let service = tours();
        assert!(service.parse_id("507f1f77bcf86cd799439011").is_ok());

        match service.parse_id("not-an-id") {
            Err(AppError::InvalidId { entity, value }) => {
                assert_eq!(entity, "tour");
                assert_eq!(value, "not-an-id");
            }
            other => panic!("Expected InvalidId, got {:?}", other),
        }

        for raw in ["507f1f77bcf86cd79943901", "507f1f77bcf86cd79943901g", ""] {
            assert!(
                matches!(service.parse_id(raw), Err(AppError::InvalidId { .. })),
                "{raw:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = tours();
        let created = service.create(tour("Desert Trek")).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(fetched.attributes, tour("Desert Trek"));
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_body() {
        let service = tours();
        let result = service.create(tour("")).await;
        assert!(matches!(result, Err(AppError::InvalidData { .. })));
    }

    #[tokio::test]
    async fn test_get_absent_is_not_found() {
        let service = tours();
        let result = service.get(ObjectId::new()).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_replaces_attributes() {
        let service = tours();
        let mut original = tour("Old");
        original.price = Some(serde_json::Number::from(10));
        let created = service.create(original).await.unwrap();

        let updated = service.update(created.id, tour("New")).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.attributes, tour("New"));
        assert_eq!(updated.attributes.price, None);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let service = tours();
        let created = service.create(tour("Gone")).await.unwrap();

        assert!(service.delete(created.id).await.is_ok());
        assert!(matches!(
            service.delete(created.id).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let service: ResourceService<User> =
            ResourceService::new(Arc::new(memory_store_for_resources()));
        service.create(user("Ann", "ann@example.com")).await.unwrap();

        match service.create(user("Impostor", "ann@example.com")).await {
            Err(AppError::Duplicate { entity, field, value }) => {
                assert_eq!(entity, "user");
                assert_eq!(field, "email");
                assert_eq!(value, "ann@example.com");
            }
            other => panic!("Expected Duplicate, got {:?}", other),
        }
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_to_taken_email_is_duplicate() {
        let service: ResourceService<User> =
            ResourceService::new(Arc::new(memory_store_for_resources()));
        service.create(user("Ann", "ann@example.com")).await.unwrap();
        let bob = service.create(user("Bob", "bob@example.com")).await.unwrap();

        let result = service.update(bob.id, user("Bob", "ann@example.com")).await;
        match result {
            Err(AppError::Duplicate { entity, .. }) => assert_eq!(entity, "user"),
            other => panic!("Expected Duplicate, got {:?}", other),
        }
    }
}
