// HTTP API module - CRUD over the component store
//
// Every response carries a `success` flag. Failures render as
// `{ "success": false, "error": "..." }` with a matching status code.
//
// Store calls touch the filesystem synchronously, so handlers run them on
// tokio's blocking pool.

mod components;
mod health;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

// Re-export endpoint handlers
pub use components::{
    create_component, delete_component, get_component, get_preview, list_components,
    update_component,
};
pub use health::health;

/// Errors returned by API handlers
#[derive(Debug)]
pub enum ApiError {
    Internal(String),
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        if status.is_server_error() {
            tracing::error!("API error: {} - {}", status, message);
        } else {
            tracing::debug!("API error: {} - {}", status, message);
        }

        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

// Malformed bodies and query strings keep the JSON error envelope

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Run filesystem work off the async runtime
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("Worker task failed: {}", e)))
}

/// Fallback for unknown paths when no static bundle is served
pub async fn not_found() -> ApiError {
    ApiError::NotFound("No such endpoint".to_string())
}
