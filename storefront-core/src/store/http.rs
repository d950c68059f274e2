//! HTTP client for the `storefront-server` document API.
//!
//! Endpoints (relative to the base URL):
//! - `GET    /collections/{collection}`       -> `[Document]`
//! - `GET    /collections/{collection}/{id}`  -> `Document` or 404
//! - `PUT    /collections/{collection}/{id}`  body `Fields`
//! - `PATCH  /collections/{collection}/{id}`  body `Fields`, 404 if missing

use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use super::{validate_collection, Document, DocumentStore, Fields, StoreError};

/// Document store backed by a remote `storefront-server`.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpStore {
    /// Creates a client for the server at `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Http(format!("Invalid server URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Http(format!(
                "Invalid server URL '{}': cannot be a base",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    /// Returns the server URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `<base>/collections/<segments...>`, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| StoreError::Http(format!("Invalid server URL '{}'", self.base_url)))?;
            path.pop_if_empty().push("collections").extend(segments);
        }
        Ok(url)
    }
}

fn http_error(e: reqwest::Error) -> StoreError {
    StoreError::Http(e.to_string())
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn get_collection(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        validate_collection(collection)?;
        let url = self.url(&[collection])?;

        self.client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(http_error)?
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        validate_collection(collection)?;
        let url = self.url(&[collection, id])?;

        let response = self.client.get(url).send().await.map_err(http_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let document = response
            .error_for_status()
            .map_err(http_error)?
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Some(document))
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        validate_collection(collection)?;
        let url = self.url(&[collection, id])?;

        self.client
            .put(url)
            .json(&fields)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(http_error)?;
        Ok(())
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        validate_collection(collection)?;
        let url = self.url(&[collection, id])?;

        let response = self
            .client
            .patch(url)
            .json(&fields)
            .send()
            .await
            .map_err(http_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::not_found(collection, id));
        }

        response.error_for_status().map_err(http_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let store = HttpStore::new("http://localhost:8080").unwrap();
        let url = store.url(&["Products"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/collections/Products");
    }

    #[test]
    fn test_url_with_trailing_slash_and_prefix() {
        let store = HttpStore::new("https://store.example.com/api/").unwrap();
        let url = store.url(&["Users", "u1"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://store.example.com/api/collections/Users/u1"
        );
    }

    #[test]
    fn test_url_encodes_segments() {
        let store = HttpStore::new("http://localhost:8080").unwrap();
        let url = store.url(&["Users", "a b/c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/collections/Users/a%20b%2Fc"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpStore::new("not a url").is_err());
        assert!(HttpStore::new("mailto:admin@example.com").is_err());
    }
}
