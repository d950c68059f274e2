//! In-memory document store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{validate_collection, Document, DocumentStore, Fields, StoreError};

/// Document store held entirely in memory.
///
/// Collections keep documents in insertion order; overwriting a document keeps
/// its position.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_collection(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        validate_collection(collection)?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        validate_collection(collection)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        validate_collection(collection)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        match docs.iter_mut().find(|d| d.id == id) {
            Some(existing) => existing.data = fields,
            None => docs.push(Document::new(id, fields)),
        }
        Ok(())
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        validate_collection(collection)?;
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        existing.data.extend(fields);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let store = MemoryStore::new();
        let docs = store.get_collection("Products").await.unwrap();
        assert!(docs.is_empty());
        assert!(store.is_empty("Products").await);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();
        store
            .set_document("Products", "p1", fields(json!({ "Name": "Top" })))
            .await
            .unwrap();

        let doc = store.get_document("Products", "p1").await.unwrap().unwrap();
        assert_eq!(doc.data["Name"], json!("Top"));
        assert!(store.get_document("Products", "p2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_in_place() {
        let store = MemoryStore::new();
        store
            .set_document("Products", "p1", fields(json!({ "Name": "A", "Stock": 1 })))
            .await
            .unwrap();
        store
            .set_document("Products", "p2", fields(json!({ "Name": "B" })))
            .await
            .unwrap();
        store
            .set_document("Products", "p1", fields(json!({ "Name": "A2" })))
            .await
            .unwrap();

        let docs = store.get_collection("Products").await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(docs[0].data, fields(json!({ "Name": "A2" })));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        store
            .set_document("Users", "u1", fields(json!({ "name": "Asha", "wishList": [] })))
            .await
            .unwrap();
        store
            .update_document("Users", "u1", fields(json!({ "wishList": ["x"] })))
            .await
            .unwrap();

        let doc = store.get_document("Users", "u1").await.unwrap().unwrap();
        assert_eq!(doc.data["name"], json!("Asha"));
        assert_eq!(doc.data["wishList"], json!(["x"]));
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = MemoryStore::new();
        let result = store
            .update_document("Users", "ghost", fields(json!({ "wishList": [] })))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalid_collection_rejected() {
        let store = MemoryStore::new();
        let result = store.get_collection("../Products").await;
        assert!(matches!(result, Err(StoreError::InvalidCollection(_))));
    }
}
