//! File-backed document store built on Automerge.
//!
//! Each collection is one Automerge document:
//!
//! ```text
//! <data_dir>/
//!   Products.automerge    # root map: product id -> product fields
//!   Users.automerge       # root map: user id -> user fields
//! ```

use async_trait::async_trait;
use automerge::{transaction::Transactable, AutoCommit, ObjType, ReadDoc, ROOT};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::sync::Mutex;

use super::convert::{read_fields, write_fields};
use super::{validate_collection, Document, DocumentStore, Fields, StoreError};

/// Document store persisting one Automerge file per collection.
///
/// Writes are serialized through an internal lock so concurrent
/// read-modify-write cycles on the same file do not lose updates.
#[derive(Debug)]
pub struct AutomergeStore {
    data_dir: PathBuf,
    lock: Mutex<()>,
}

impl AutomergeStore {
    /// Creates a store rooted at `data_dir`. The directory is created on the
    /// first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Returns the file holding a collection.
    pub fn path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{}.automerge", collection))
    }

    /// Loads a collection document, or an empty one if the file doesn't exist.
    fn load(&self, collection: &str) -> Result<AutoCommit, StoreError> {
        let path = self.path(collection);

        match fs::read(&path) {
            Ok(bytes) => AutoCommit::load(&bytes)
                .map_err(|e| StoreError::Automerge(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(AutoCommit::new()),
            Err(e) => Err(StoreError::Io(path, e)),
        }
    }

    fn save(&self, collection: &str, doc: &mut AutoCommit) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StoreError::Io(self.data_dir.clone(), e))?;

        let path = self.path(collection);
        let bytes = doc.save();

        // Write to a temp file and rename over the collection file
        let temp_path = path.with_extension("automerge.tmp");
        let mut file =
            fs::File::create(&temp_path).map_err(|e| StoreError::Io(temp_path.clone(), e))?;
        file.write_all(&bytes)
            .map_err(|e| StoreError::Io(temp_path.clone(), e))?;
        file.sync_all()
            .map_err(|e| StoreError::Io(temp_path.clone(), e))?;

        fs::rename(&temp_path, &path).map_err(|e| StoreError::Io(path, e))
    }
}

fn automerge_error(e: automerge::AutomergeError) -> StoreError {
    StoreError::Automerge(e.to_string())
}

#[async_trait]
impl DocumentStore for AutomergeStore {
    async fn get_collection(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        validate_collection(collection)?;
        let _guard = self.lock.lock().await;
        let doc = self.load(collection)?;

        let mut documents = Vec::new();
        for id in doc.keys(ROOT) {
            if let Some((_, obj)) = doc.get(ROOT, id.as_str()).map_err(automerge_error)? {
                let data = read_fields(&doc, &obj).map_err(automerge_error)?;
                documents.push(Document::new(id, data));
            }
        }

        tracing::debug!("Loaded {} document(s) from {}", documents.len(), collection);
        Ok(documents)
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        validate_collection(collection)?;
        let _guard = self.lock.lock().await;
        let doc = self.load(collection)?;

        match doc.get(ROOT, id).map_err(automerge_error)? {
            Some((_, obj)) => {
                let data = read_fields(&doc, &obj).map_err(automerge_error)?;
                Ok(Some(Document::new(id, data)))
            }
            None => Ok(None),
        }
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        validate_collection(collection)?;
        let _guard = self.lock.lock().await;
        let mut doc = self.load(collection)?;

        let obj = doc
            .put_object(ROOT, id, ObjType::Map)
            .map_err(automerge_error)?;
        write_fields(&mut doc, &obj, &fields).map_err(automerge_error)?;

        self.save(collection, &mut doc)
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        validate_collection(collection)?;
        let _guard = self.lock.lock().await;
        let mut doc = self.load(collection)?;

        let obj = match doc.get(ROOT, id).map_err(automerge_error)? {
            Some((_, obj)) => obj,
            None => return Err(StoreError::not_found(collection, id)),
        };
        write_fields(&mut doc, &obj, &fields).map_err(automerge_error)?;

        self.save(collection, &mut doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_store() -> (AutomergeStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = AutomergeStore::new(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_path() {
        let (store, _temp) = test_store();
        let path = store.path("Products");
        assert!(path.ends_with("Products.automerge"));
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let (store, _temp) = test_store();
        assert!(store.get_collection("Products").await.unwrap().is_empty());
        assert!(!store.path("Products").exists());
    }

    #[tokio::test]
    async fn test_set_persists_to_disk() {
        let (store, temp) = test_store();
        store
            .set_document("Products", "p1", fields(json!({ "Name": "Top", "Price": 250 })))
            .await
            .unwrap();
        assert!(store.path("Products").exists());

        // A second store over the same directory sees the write
        let reopened = AutomergeStore::new(temp.path().to_path_buf());
        let doc = reopened.get_document("Products", "p1").await.unwrap().unwrap();
        assert_eq!(doc.data["Name"], json!("Top"));
        assert_eq!(doc.data["Price"], json!(250));
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_file() {
        let (store, temp) = test_store();
        for id in ["p1", "p2"] {
            store
                .set_document("Products", id, fields(json!({ "Name": id })))
                .await
                .unwrap();
        }
        store
            .update_document("Products", "p1", fields(json!({ "Stock": 4 })))
            .await
            .unwrap();

        let names: Vec<String> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Products.automerge".to_string()]);
        assert_eq!(store.get_collection("Products").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_set_overwrites_whole_document() {
        let (store, _temp) = test_store();
        store
            .set_document("Products", "p1", fields(json!({ "Name": "Top", "Stock": 3 })))
            .await
            .unwrap();
        store
            .set_document("Products", "p1", fields(json!({ "Name": "Top v2" })))
            .await
            .unwrap();

        let doc = store.get_document("Products", "p1").await.unwrap().unwrap();
        assert_eq!(doc.data, fields(json!({ "Name": "Top v2" })));
    }

    #[tokio::test]
    async fn test_update_merges_top_level_fields() {
        let (store, _temp) = test_store();
        store
            .set_document(
                "Users",
                "u1",
                fields(json!({ "name": "Asha", "wishList": [{ "productId": "a" }] })),
            )
            .await
            .unwrap();
        store
            .update_document("Users", "u1", fields(json!({ "wishList": [{ "productId": "b" }] })))
            .await
            .unwrap();

        let doc = store.get_document("Users", "u1").await.unwrap().unwrap();
        assert_eq!(doc.data["name"], json!("Asha"));
        assert_eq!(doc.data["wishList"], json!([{ "productId": "b" }]));
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let (store, _temp) = test_store();
        let result = store
            .update_document("Users", "ghost", fields(json!({ "wishList": [] })))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_get_collection_lists_all_documents() {
        let (store, _temp) = test_store();
        for id in ["b", "a", "c"] {
            store
                .set_document("Products", id, fields(json!({ "Name": id })))
                .await
                .unwrap();
        }

        let docs = store.get_collection("Products").await.unwrap();
        assert_eq!(docs.len(), 3);
        let mut ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let (store, temp) = test_store();
        std::fs::write(temp.path().join("Products.automerge"), b"not automerge").unwrap();

        let result = store.get_collection("Products").await;
        assert!(matches!(result, Err(StoreError::Automerge(_))));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let (store, _temp) = test_store();
        let result = store
            .set_document("../escape", "x", Fields::new())
            .await;
        assert!(matches!(result, Err(StoreError::InvalidCollection(_))));
    }
}
