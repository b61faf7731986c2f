//! In-process document store backed by `DashMap`.
//!
//! Each collection lives in one map entry, so a write holds that entry's
//! shard lock for the whole check-and-insert. Unique fields are therefore
//! enforced atomically, matching the unique indexes of the Postgres store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;

use crate::error::{AppError, AppResult};
use crate::models::{Attributes, Document, Filter, ObjectId};
use crate::repositories::DocumentStore;

#[derive(Debug, Default)]
struct Collection {
    documents: HashMap<ObjectId, Document>,
}

impl Collection {
    /// Finds a unique-field clash with any document other than `exclude`.
    fn conflict(
        &self,
        unique_fields: Option<&HashSet<String>>,
        data: &Attributes,
        exclude: Option<ObjectId>,
    ) -> Option<(String, String)> {
        let fields = unique_fields?;
        fields.iter().find_map(|field| {
            let value = data.get(field)?;
            let clash = self
                .documents
                .values()
                .filter(|doc| Some(doc.id) != exclude)
                .any(|doc| doc.data.get(field) == Some(value));
            clash.then(|| (field.clone(), display_value(value)))
        })
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// In-memory implementation of [`DocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: DashMap<String, Collection>,
    unique_fields: HashMap<String, HashSet<String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a unique constraint on `field` within `collection`.
    pub fn with_unique_field(mut self, collection: &str, field: &str) -> Self {
        self.unique_fields
            .entry(collection.to_string())
            .or_default()
            .insert(field.to_string());
        self
    }

    /// Number of documents currently held in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|c| c.documents.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn duplicate(collection: &str, (field, value): (String, String)) -> AppError {
        AppError::Duplicate {
            entity: collection.to_string(),
            field,
            value,
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create(&self, collection: &str, data: Attributes) -> AppResult<Document> {
        let mut entry = self.collections.entry(collection.to_string()).or_default();

        if let Some(conflict) = entry.conflict(self.unique_fields.get(collection), &data, None) {
            return Err(Self::duplicate(collection, conflict));
        }

        let now = Timestamp::now();
        let document = Document {
            id: ObjectId::new(),
            data,
            created_at: now,
            updated_at: now,
        };
        entry.documents.insert(document.id, document.clone());

        tracing::debug!(collection, id = %document.id, "Document created");
        Ok(document)
    }

    async fn find_all(&self, collection: &str) -> AppResult<Vec<Document>> {
        let mut documents: Vec<Document> = self
            .collections
            .get(collection)
            .map(|c| c.documents.values().cloned().collect())
            .unwrap_or_default();

        documents.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(documents)
    }

    async fn find_by_id(&self, collection: &str, id: ObjectId) -> AppResult<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|c| c.documents.get(&id).cloned()))
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Document>> {
        let Some(entry) = self.collections.get(collection) else {
            return Ok(None);
        };

        // Oldest match first, as a natural-order scan would return it
        Ok(entry
            .documents
            .values()
            .filter(|doc| filter.matches(&doc.data))
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)))
            .cloned())
    }

    async fn find_one_and_replace(
        &self,
        collection: &str,
        id: ObjectId,
        data: Attributes,
    ) -> AppResult<Option<Document>> {
        let Some(mut entry) = self.collections.get_mut(collection) else {
            return Ok(None);
        };

        if !entry.documents.contains_key(&id) {
            return Ok(None);
        }

        if let Some(conflict) = entry.conflict(self.unique_fields.get(collection), &data, Some(id))
        {
            return Err(Self::duplicate(collection, conflict));
        }

        let Some(document) = entry.documents.get_mut(&id) else {
            return Ok(None);
        };
        document.data = data;
        document.updated_at = Timestamp::now();

        Ok(Some(document.clone()))
    }

    async fn find_one_and_delete(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> AppResult<Option<Document>> {
        Ok(self
            .collections
            .get_mut(collection)
            .and_then(|mut c| c.documents.remove(&id)))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
