//! Raw documents as held by a document store.
//!
//! The store treats `data` as an opaque attribute map; typed views are
//! produced by [`crate::models::Resource`].

use diesel::prelude::*;
use jiff::Timestamp;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::models::ObjectId;

/// Attribute map of a document, keyed by camelCase field name.
pub type Attributes = Map<String, Value>;

/// Field-equality filter for `find_one` lookups.
///
/// A document matches when every key in the filter is present in its
/// attributes with an equal value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Attributes);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition on `field`.
    pub fn eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.0.insert(field.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, attributes: &Attributes) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| attributes.get(field) == Some(expected))
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Filter as a JSON object, suitable for JSONB containment queries.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// A stored document with its store-assigned metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: ObjectId,
    pub data: Attributes,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Document row for reading from the database
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentRow {
    pub id: String,
    pub collection: String,
    pub data: Value,
    pub created_at: jiff_diesel::Timestamp,
    pub updated_at: jiff_diesel::Timestamp,
}

/// Document row for inserting new records
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::documents)]
pub struct NewDocumentRow {
    pub id: String,
    pub collection: String,
    pub data: Value,
    pub created_at: jiff_diesel::Timestamp,
    pub updated_at: jiff_diesel::Timestamp,
}

impl TryFrom<DocumentRow> for Document {
    type Error = AppError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let id = ObjectId::parse_str(&row.id).map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e).context("corrupt document id in store"),
        })?;

        let data = match row.data {
            Value::Object(map) => map,
            other => {
                return Err(AppError::Internal {
                    source: anyhow::anyhow!(
                        "document {} in '{}' holds non-object data: {}",
                        row.id,
                        row.collection,
                        other
                    ),
                });
            }
        };

        Ok(Self {
            id,
            data,
            created_at: row.created_at.to_jiff(),
            updated_at: row.updated_at.to_jiff(),
        })
    }
}
