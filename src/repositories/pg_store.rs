//! PostgreSQL document store using diesel_async.
//!
//! All collections share the `documents` table; each row carries its
//! collection name and a JSONB attribute object. Unique attributes are
//! enforced by partial unique indexes created in the migrations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use jiff_diesel::ToDiesel;
use serde_json::Value;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{Attributes, Document, DocumentRow, Filter, NewDocumentRow, ObjectId};
use crate::repositories::DocumentStore;

/// Document store holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: AsyncDbPool,
}

impl PgDocumentStore {
    /// Creates a new PgDocumentStore with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    fn convert(error: diesel::result::Error, operation: &str) -> AppError {
        DatabaseErrorConverter::convert_diesel_error(error, operation)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create(&self, collection_name: &str, attributes: Attributes) -> AppResult<Document> {
        use crate::schema::documents::dsl::*;
        let mut conn = self.pool.get().await?;

        let now = Timestamp::now();
        let row = NewDocumentRow {
            id: ObjectId::new().to_hex(),
            collection: collection_name.to_string(),
            data: Value::Object(attributes),
            created_at: now.to_diesel(),
            updated_at: now.to_diesel(),
        };

        diesel::insert_into(documents)
            .values(&row)
            .returning(DocumentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| Self::convert(e, "insert document"))?
            .try_into()
    }

    async fn find_all(&self, collection_name: &str) -> AppResult<Vec<Document>> {
        use crate::schema::documents::dsl::*;
        let mut conn = self.pool.get().await?;

        documents
            .filter(collection.eq(collection_name))
            .order((created_at.desc(), id.desc()))
            .select(DocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| Self::convert(e, "list documents"))?
            .into_iter()
            .map(Document::try_from)
            .collect()
    }

    async fn find_by_id(
        &self,
        collection_name: &str,
        document_id: ObjectId,
    ) -> AppResult<Option<Document>> {
        use crate::schema::documents::dsl::*;
        let mut conn = self.pool.get().await?;

        documents
            .filter(collection.eq(collection_name))
            .filter(id.eq(document_id.to_hex()))
            .select(DocumentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| Self::convert(e, "find document"))?
            .map(Document::try_from)
            .transpose()
    }

    async fn find_one(
        &self,
        collection_name: &str,
        filter: &Filter,
    ) -> AppResult<Option<Document>> {
        use crate::schema::documents::dsl::*;
        let mut conn = self.pool.get().await?;

        // `data @> filter` matches documents containing every filter pair
        documents
            .filter(collection.eq(collection_name))
            .filter(data.contains(filter.to_value()))
            .order((created_at.asc(), id.asc()))
            .select(DocumentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| Self::convert(e, "query document"))?
            .map(Document::try_from)
            .transpose()
    }

    async fn find_one_and_replace(
        &self,
        collection_name: &str,
        document_id: ObjectId,
        attributes: Attributes,
    ) -> AppResult<Option<Document>> {
        use crate::schema::documents::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(
            documents
                .filter(collection.eq(collection_name))
                .filter(id.eq(document_id.to_hex())),
        )
        .set((
            data.eq(Value::Object(attributes)),
            updated_at.eq(Timestamp::now().to_diesel()),
        ))
        .returning(DocumentRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|e| Self::convert(e, "replace document"))?
        .map(Document::try_from)
        .transpose()
    }

    async fn find_one_and_delete(
        &self,
        collection_name: &str,
        document_id: ObjectId,
    ) -> AppResult<Option<Document>> {
        use crate::schema::documents::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(
            documents
                .filter(collection.eq(collection_name))
                .filter(id.eq(document_id.to_hex())),
        )
        .returning(DocumentRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(|e| Self::convert(e, "delete document"))?
        .map(Document::try_from)
        .transpose()
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
