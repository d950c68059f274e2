//! Schemaless document store addressed by collection name and document id.
//!
//! Every backend implements [`DocumentStore`]:
//! - [`MemoryStore`]: in-process, used by tests and embedders
//! - [`AutomergeStore`]: one Automerge file per collection on disk
//! - [`HttpStore`]: client for the `storefront-server` REST surface
//!
//! # Semantics
//!
//! - `set_document` overwrites the whole document
//! - `update_document` merges top-level fields and fails with
//!   [`StoreError::NotFound`] when the document does not exist
//! - `get_document` returns `None` for a missing document
//! - `get_collection` of an unknown collection is empty

mod automerge;
mod convert;
mod http;
mod memory;

pub use self::automerge::AutomergeStore;
pub use self::http::HttpStore;
pub use self::memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Top-level fields of a document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A document as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Fields) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Collections used by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Users,
}

impl Collection {
    /// Returns the collection name in the store.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Products => "Products",
            Collection::Users => "Users",
        }
    }

    /// Parse from a collection name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Products" => Some(Collection::Products),
            "Users" => Some(Collection::Users),
            _ => None,
        }
    }
}

/// Errors returned by document store backends.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    #[error("I/O error for {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Automerge error: {0}")]
    Automerge(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

/// Validates a collection name.
///
/// Names become file names in [`AutomergeStore`] and path segments in
/// [`HttpStore`], so separators and dot-prefixed names are rejected.
pub fn validate_collection(collection: &str) -> Result<(), StoreError> {
    if collection.is_empty()
        || collection.contains('/')
        || collection.contains('\\')
        || collection.contains("..")
        || collection.starts_with('.')
    {
        return Err(StoreError::InvalidCollection(collection.to_string()));
    }
    Ok(())
}

/// Client surface of a document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in a collection, in the backend's materialization order.
    async fn get_collection(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn get_collection(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        (**self).get_collection(collection).await
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        (**self).get_document(collection, id).await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        (**self).set_document(collection, id, fields).await
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        (**self).update_document(collection, id, fields).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::Products.name(), "Products");
        assert_eq!(Collection::Users.name(), "Users");
        assert_eq!(Collection::parse("Users"), Some(Collection::Users));
        assert_eq!(Collection::parse("users"), None);
    }

    #[test]
    fn test_validate_collection() {
        assert!(validate_collection("Products").is_ok());
        assert!(validate_collection("").is_err());
        assert!(validate_collection("../etc").is_err());
        assert!(validate_collection("a/b").is_err());
        assert!(validate_collection(".hidden").is_err());
    }

    #[test]
    fn test_not_found_display() {
        let err = StoreError::not_found("Users", "u1");
        assert_eq!(err.to_string(), "Document not found: Users/u1");
    }

    #[tokio::test]
    async fn test_arc_dyn_store_delegates() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let mut fields = Fields::new();
        fields.insert("Name".to_string(), serde_json::json!("Top"));
        store.set_document("Products", "p1", fields).await.unwrap();

        let docs = store.get_collection("Products").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "p1");
    }
}
