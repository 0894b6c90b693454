/// In-process document store
///
/// Holds every collection in memory behind a `tokio::sync::RwLock`. Used by
/// the test suites and by the API server when no database is configured.
/// Documents keep their insertion order, so `list` returns creation order.

use super::{CollectionPath, Document, DocumentStore, Fields, StoreError, CHANGE_FEED_CAPACITY};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;
use uuid::Uuid;

pub struct MemoryStore {
    collections: RwLock<HashMap<CollectionPath, Vec<Document>>>,
    changes: broadcast::Sender<CollectionPath>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            collections: RwLock::new(HashMap::new()),
            changes,
        }
    }

    fn publish(&self, path: &CollectionPath) {
        // No receivers is fine; nobody is watching yet.
        let _ = self.changes.send(path.clone());
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, path: &CollectionPath, fields: Fields) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        {
            let mut collections = self.collections.write().await;
            collections.entry(path.clone()).or_default().push(Document {
                id: id.clone(),
                fields,
            });
        }

        debug!(path = %path, id = %id, "Document added");
        self.publish(path);
        Ok(id)
    }

    /// Checks and inserts under one write lock
    async fn add_unique(
        &self,
        path: &CollectionPath,
        field: &str,
        value: &Value,
        fields: Fields,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        {
            let mut collections = self.collections.write().await;
            let docs = collections.entry(path.clone()).or_default();
            if docs.iter().any(|d| d.fields.get(field) == Some(value)) {
                return Err(StoreError::Conflict(format!("{} already exists", field)));
            }
            docs.push(Document {
                id: id.clone(),
                fields,
            });
        }

        debug!(path = %path, id = %id, "Document added");
        self.publish(path);
        Ok(id)
    }

    async fn set(&self, path: &CollectionPath, id: &str, fields: Fields) -> Result<(), StoreError> {
        {
            let mut collections = self.collections.write().await;
            let docs = collections.entry(path.clone()).or_default();
            match docs.iter_mut().find(|d| d.id == id) {
                Some(doc) => doc.fields = fields,
                None => docs.push(Document {
                    id: id.to_string(),
                    fields,
                }),
            }
        }

        self.publish(path);
        Ok(())
    }

    async fn get(&self, path: &CollectionPath, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(path)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn update(&self, path: &CollectionPath, id: &str, fields: Fields) -> Result<(), StoreError> {
        {
            let mut collections = self.collections.write().await;
            let doc = collections
                .get_mut(path)
                .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
                .ok_or_else(|| StoreError::NotFound {
                    path: path.to_string(),
                    id: id.to_string(),
                })?;

            for (key, value) in fields {
                doc.fields.insert(key, value);
            }
        }

        debug!(path = %path, id = %id, "Document updated");
        self.publish(path);
        Ok(())
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<bool, StoreError> {
        let removed = {
            let mut collections = self.collections.write().await;
            match collections.get_mut(path) {
                Some(docs) => {
                    let before = docs.len();
                    docs.retain(|d| d.id != id);
                    docs.len() != before
                }
                None => false,
            }
        };

        if removed {
            debug!(path = %path, id = %id, "Document deleted");
            self.publish(path);
        }
        Ok(removed)
    }

    async fn list(&self, path: &CollectionPath) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(path).cloned().unwrap_or_default())
    }

    async fn find_where(
        &self,
        path: &CollectionPath,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(path)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.fields.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn changes(&self) -> broadcast::Receiver<CollectionPath> {
        self.changes.subscribe()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::to_fields;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        to_fields(&value).unwrap()
    }

    #[tokio::test]
    async fn test_add_and_list_preserve_order() {
        let store = MemoryStore::new();
        let path = CollectionPath::employees("cpn_1").unwrap();

        let first = store.add(&path, fields(json!({ "name": "Ada" }))).await.unwrap();
        let second = store.add(&path, fields(json!({ "name": "Grace" }))).await.unwrap();
        assert_ne!(first, second);

        let docs = store.list(&path).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    }

    #[tokio::test]
    async fn test_concurrent_add_unique_admits_one() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let path = CollectionPath::users();
        let email = json!("ada@example.com");

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let path = path.clone();
                let email = email.clone();
                tokio::spawn(async move {
                    store
                        .add_unique(&path, "email", &email, fields(json!({ "email": "ada@example.com" })))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert!(matches!(e, StoreError::Conflict(_))),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.list(&path).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        let path = CollectionPath::employees("cpn_1").unwrap();
        let id = store
            .add(&path, fields(json!({ "name": "Ada", "avatarUrl": "a.png" })))
            .await
            .unwrap();

        store.update(&path, &id, fields(json!({ "name": "Ada L." }))).await.unwrap();

        let doc = store.get(&path, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields.get("name"), Some(&json!("Ada L.")));
        assert_eq!(doc.fields.get("avatarUrl"), Some(&json!("a.png")));
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = MemoryStore::new();
        let path = CollectionPath::locations("cpn_1").unwrap();

        let result = store.update(&path, "missing", Fields::new()).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = MemoryStore::new();
        let path = CollectionPath::locations("cpn_1").unwrap();
        let id = store.add(&path, fields(json!({ "name": "Main" }))).await.unwrap();

        assert!(store.delete(&path, &id).await.unwrap());
        assert!(!store.delete(&path, &id).await.unwrap());
        assert!(store.list(&path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_where_matches_exact_value() {
        let store = MemoryStore::new();
        let companies = CollectionPath::companies();
        store.add(&companies, fields(json!({ "ownerUid": "u1" }))).await.unwrap();
        store.add(&companies, fields(json!({ "ownerUid": "u2" }))).await.unwrap();

        let found = store.find_where(&companies, "ownerUid", &json!("u2")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].fields.get("ownerUid"), Some(&json!("u2")));
    }

    #[tokio::test]
    async fn test_writes_publish_changes() {
        let store = MemoryStore::new();
        let mut changes = store.changes();
        let path = CollectionPath::employees("cpn_1").unwrap();

        store.add(&path, Fields::new()).await.unwrap();
        assert_eq!(changes.recv().await.unwrap(), path);

        // Deleting nothing publishes nothing
        store.delete(&path, "missing").await.unwrap();
        store.set(&path, "emp_1", Fields::new()).await.unwrap();
        assert_eq!(changes.recv().await.unwrap(), path);
        assert!(changes.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = MemoryStore::new();
        let one = CollectionPath::employees("cpn_1").unwrap();
        let two = CollectionPath::employees("cpn_2").unwrap();

        store.add(&one, fields(json!({ "name": "Ada" }))).await.unwrap();
        assert!(store.list(&two).await.unwrap().is_empty());
    }
}
