//! Collection and document handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use storefront_core::{Document, Fields, StoreError};

use super::AppState;

/// Error response body
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// A store failure rendered as a JSON error response.
#[derive(Debug)]
pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self.0 {
            StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            StoreError::InvalidCollection(_) => (StatusCode::BAD_REQUEST, "invalid_collection"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
        };
        if status.is_server_error() {
            tracing::error!("Store failure: {}", self.0);
        }

        (
            status,
            Json(ErrorBody {
                error,
                message: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

pub async fn list_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = state.store.get_collection(&collection).await?;
    tracing::debug!("Listed {} document(s) in {}", documents.len(), collection);
    Ok(Json(documents))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Document>, ApiError> {
    state
        .store
        .get_document(&collection, &id)
        .await?
        .map(Json)
        .ok_or_else(|| StoreError::not_found(&collection, &id).into())
}

pub async fn set_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(fields): Json<Fields>,
) -> Result<StatusCode, ApiError> {
    state.store.set_document(&collection, &id, fields).await?;
    tracing::info!("Set {}/{}", collection, id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(fields): Json<Fields>,
) -> Result<StatusCode, ApiError> {
    state.store.update_document(&collection, &id, fields).await?;
    tracing::info!("Updated {}/{}", collection, id);
    Ok(StatusCode::NO_CONTENT)
}
