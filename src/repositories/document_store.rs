//! Document store abstraction.
//!
//! Handlers never talk to a concrete database; they receive an
//! `Arc<dyn DocumentStore>` so tests can substitute an in-memory store.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Attributes, Document, Filter, ObjectId};

/// CRUD primitives over named collections of JSON documents.
///
/// "Not found" is reported as `Ok(None)`, never as an error. Unique
/// constraints registered with the store surface as `AppError::Duplicate`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document, assigning its id and timestamps.
    async fn create(&self, collection: &str, data: Attributes) -> AppResult<Document>;

    /// Returns every document in the collection, newest first.
    async fn find_all(&self, collection: &str) -> AppResult<Vec<Document>>;

    /// Looks up a document by id.
    async fn find_by_id(&self, collection: &str, id: ObjectId) -> AppResult<Option<Document>>;

    /// Returns the first document whose attributes match `filter`.
    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Document>>;

    /// Replaces all attributes of a document, keeping its id and creation time.
    ///
    /// Returns the document as it is after the replacement.
    async fn find_one_and_replace(
        &self,
        collection: &str,
        id: ObjectId,
        data: Attributes,
    ) -> AppResult<Option<Document>>;

    /// Removes a document, returning it if it existed.
    async fn find_one_and_delete(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> AppResult<Option<Document>>;

    /// Returns the store name for logging
    fn name(&self) -> &'static str;
}
