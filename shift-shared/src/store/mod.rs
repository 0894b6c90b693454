//! Document store for company-scoped records
//!
//! Every piece of business state (companies, employees, locations, time-off
//! requests, user credentials) is a JSON document addressed by a collection
//! path and an opaque id. Handlers never talk to PostgreSQL directly; they go
//! through the [`DocumentStore`] trait so the same code runs against the
//! in-process [`MemoryStore`] and the persistent [`PgDocumentStore`].
//!
//! Every write publishes the written collection's path on the change feed
//! returned by [`DocumentStore::changes`]. Live subscriptions
//! ([`crate::live::LiveCollection`]) re-read the collection whenever their
//! path is announced.
//!
//! # Example
//!
//! ```no_run
//! use shift_shared::store::{CollectionPath, DocumentStore, MemoryStore};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), shift_shared::store::StoreError> {
//! let store = MemoryStore::new();
//! let companies = CollectionPath::companies();
//!
//! let id = store
//!     .add(&companies, shift_shared::store::to_fields(&json!({ "ownerUid": "u1" }))?)
//!     .await?;
//! let owned = store.find_where(&companies, "ownerUid", &json!("u1")).await?;
//! assert_eq!(owned[0].id, id);
//! # Ok(())
//! # }
//! ```

pub mod global;
pub mod memory;
pub mod path;
pub mod postgres;

pub use memory::MemoryStore;
pub use path::{CollectionPath, TenantCollection};
pub use postgres::PgDocumentStore;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::broadcast;

/// Top-level fields of a stored document
pub type Fields = Map<String, Value>;

/// Capacity of the in-process change feed
///
/// Receivers that fall further behind than this observe a lag and re-read
/// their collection instead of replaying individual changes.
pub const CHANGE_FEED_CAPACITY: usize = 256;

/// Errors raised by document store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document {id} not found in {path}")]
    NotFound { path: String, id: String },

    #[error("Invalid collection path: {0}")]
    InvalidPath(String),

    #[error("Conflicting write: {0}")]
    Conflict(String),

    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document store has not been initialized")]
    NotInitialized,

    #[error("Document store has already been initialized")]
    AlreadyInitialized,

    #[error("Document store unavailable: {0}")]
    Unavailable(String),
}

/// A raw document as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Decodes the document fields into a typed record
    pub fn decode<T: DeserializeOwned>(self) -> Result<Record<T>, serde_json::Error> {
        let data = serde_json::from_value(Value::Object(self.fields))?;
        Ok(Record { id: self.id, data })
    }
}

/// A typed document presented as `{id, ...fields}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    /// Store-assigned document id
    pub id: String,

    /// Document fields
    #[serde(flatten)]
    pub data: T,
}

/// Serializes a value into top-level document fields
///
/// # Errors
///
/// Fails if the value does not serialize to a JSON object.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Serialization(serde::ser::Error::custom(format!(
            "expected a JSON object, got {}",
            other
        )))),
    }
}

/// Decodes a snapshot, skipping documents that do not fit `T`
///
/// One malformed document must not hide the rest of its collection, so
/// failures are logged and dropped.
pub fn decode_records<T: DeserializeOwned>(path: &CollectionPath, docs: Vec<Document>) -> Vec<Record<T>> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match doc.decode() {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(path = %path, id = %id, error = %e, "Skipping undecodable document");
                    None
                }
            }
        })
        .collect()
}

/// Async access to collections of JSON documents
///
/// Implementations must be safe to share across tasks. Writes are last
/// writer wins; there is no versioning and no multi-document transaction.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document under a freshly generated id and returns the id
    async fn add(&self, path: &CollectionPath, fields: Fields) -> Result<String, StoreError>;

    /// Inserts like [`add`](Self::add) unless a document in `path` already has
    /// `field == value`, in which case it fails with [`StoreError::Conflict`]
    ///
    /// The default checks then inserts, so it is only race-free where the
    /// backend enforces the constraint itself (the PostgreSQL unique indexes).
    async fn add_unique(
        &self,
        path: &CollectionPath,
        field: &str,
        value: &Value,
        fields: Fields,
    ) -> Result<String, StoreError> {
        if !self.find_where(path, field, value).await?.is_empty() {
            return Err(StoreError::Conflict(format!("{} already exists", field)));
        }
        self.add(path, fields).await
    }

    /// Creates or replaces the document with the given id
    async fn set(&self, path: &CollectionPath, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Reads one document
    async fn get(&self, path: &CollectionPath, id: &str) -> Result<Option<Document>, StoreError>;

    /// Merges the given top-level fields into an existing document
    ///
    /// Fields not named in `fields` are left untouched. Fails with
    /// [`StoreError::NotFound`] when the document does not exist.
    async fn update(&self, path: &CollectionPath, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Deletes a document, returning whether it existed
    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<bool, StoreError>;

    /// Lists a whole collection in creation order
    async fn list(&self, path: &CollectionPath) -> Result<Vec<Document>, StoreError>;

    /// Lists documents whose top-level `field` equals `value`, in creation order
    async fn find_where(
        &self,
        path: &CollectionPath,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    /// Subscribes to the change feed
    ///
    /// One message is delivered per write, naming the collection written to.
    fn changes(&self) -> broadcast::Receiver<CollectionPath>;

    /// Verifies the backing storage is reachable
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Short name for logs and health output
    fn backend(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Named {
        display_name: String,
    }

    #[test]
    fn test_to_fields_rejects_non_objects() {
        assert!(to_fields(&json!([1, 2])).is_err());
        assert!(to_fields(&json!("text")).is_err());

        let fields = to_fields(&Named { display_name: "Ada".to_string() }).unwrap();
        assert_eq!(fields.get("displayName"), Some(&json!("Ada")));
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = Record {
            id: "emp_1".to_string(),
            data: Named { display_name: "Ada".to_string() },
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({ "id": "emp_1", "displayName": "Ada" }));
    }

    #[test]
    fn test_document_decode() {
        let doc = Document {
            id: "emp_1".to_string(),
            fields: to_fields(&json!({ "displayName": "Grace" })).unwrap(),
        };

        let record: Record<Named> = doc.decode().unwrap();
        assert_eq!(record.id, "emp_1");
        assert_eq!(record.data.display_name, "Grace");
    }
}
