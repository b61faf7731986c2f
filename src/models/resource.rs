//! Resource kinds and their typed document view.

use jiff::Timestamp;
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Attributes, Document, ObjectId};

/// A kind of resource served by the generic CRUD handlers.
///
/// Implementors are the request/response schema of the resource: they are
/// deserialized from request bodies, validated, stored as attribute maps
/// and serialized back inside a [`Resource`].
pub trait ResourceKind:
    Serialize + DeserializeOwned + Validate + Clone + Send + Sync + 'static
{
    /// Singular lowercase name used in client messages ("tour").
    const NAME: &'static str;

    /// Plural name, also used as the store collection ("tours").
    const COLLECTION: &'static str;

    /// Attributes that must be unique across the collection.
    ///
    /// Checked before create and enforced again by the store.
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    /// Converts the body into the attribute map handed to the store.
    fn to_attributes(&self) -> AppResult<Attributes> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(other) => Err(AppError::Internal {
                source: anyhow::anyhow!("{} serialized to a non-object: {}", Self::NAME, other),
            }),
            Err(e) => Err(AppError::Internal {
                source: anyhow::Error::from(e),
            }),
        }
    }

    /// Reads a body back from a stored attribute map.
    fn from_attributes(data: Attributes) -> AppResult<Self> {
        serde_json::from_value(serde_json::Value::Object(data)).map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e).context(format!("stored {} does not match schema", Self::NAME)),
        })
    }
}

/// A stored resource: identifier, typed attributes and timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource<K> {
    pub id: ObjectId,
    #[serde(flatten)]
    pub attributes: K,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl<K: ResourceKind> TryFrom<Document> for Resource<K> {
    type Error = AppError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        Ok(Self {
            id: doc.id,
            attributes: K::from_attributes(doc.data)?,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

/// Capitalizes the first letter of a resource name for client messages.
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tour;
    use serde_json::json;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("tour"), "Tour");
        assert_eq!(display_name("user"), "User");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_resource_serializes_flat() {
        let doc = Document {
            id: ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap(),
            data: json!({"name": "Desert Trek", "price": 120.0})
                .as_object()
                .cloned()
                .unwrap(),
            created_at: "2024-05-01T10:00:00Z".parse().unwrap(),
            updated_at: "2024-05-02T10:00:00Z".parse().unwrap(),
        };

        let resource = Resource::<Tour>::try_from(doc).unwrap();
        let value = serde_json::to_value(&resource).unwrap();

        assert_eq!(value["id"], "507f1f77bcf86cd799439011");
        assert_eq!(value["name"], "Desert Trek");
        assert_eq!(value["price"], 120.0);
        assert_eq!(value["createdAt"], "2024-05-01T10:00:00Z");
        assert_eq!(value["updatedAt"], "2024-05-02T10:00:00Z");
        assert!(value.get("info").is_none());
    }

    #[test]
    fn test_stored_data_not_matching_schema_is_internal() {
        let doc = Document {
            id: ObjectId::new(),
            data: json!({"price": 10}).as_object().cloned().unwrap(),
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };

        let result = Resource::<Tour>::try_from(doc);
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }
}
