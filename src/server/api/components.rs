// Component endpoints - list, read, create, update, delete, preview

use super::{blocking, ApiError};
use crate::config::MAX_PAGE_SIZE;
use crate::render;
use crate::server::AppState;
use crate::store::{Component, Page, StoreError, TypeFilter};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

/// Query parameters for GET /api/components
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 1-based page number (default: 1)
    pub page: Option<usize>,
    /// Page size (default: configured page size, max: 100)
    pub limit: Option<usize>,
    /// "all", "blocks" or "templates" (default: all)
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Paginated listing response
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    #[serde(flatten)]
    pub page: Page<Component>,
}

/// Single-component response
#[derive(Debug, Serialize)]
pub struct ComponentResponse {
    pub success: bool,
    pub data: Component,
}

/// Response for delete
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
}

/// Request body for POST /api/components
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(flatten)]
    pub component: Component,
    /// Client-rendered preview as a PNG data URL
    #[serde(default)]
    pub screenshot: Option<String>,
}

/// Request body for PUT /api/components/:id
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub component: Component,
    #[serde(default)]
    pub name_changed: bool,
    /// Client-rendered preview as a PNG data URL
    #[serde(default)]
    pub screenshot: Option<String>,
}

/// Use the client's screenshot if it sent one, otherwise try rendering
async fn resolve_screenshot(
    state: &AppState,
    supplied: Option<String>,
    html: &str,
) -> Option<String> {
    match supplied {
        Some(data_url) => Some(data_url),
        None => render::capture_preview(state.renderer.as_ref(), html).await,
    }
}

/// GET /api/components - Paginated listing
///
/// Query params:
///   - page: 1-based page number, clamped to the available range
///   - limit: page size (max: 100)
///   - type: all | blocks | templates
pub async fn list_components(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError> {
    let Query(params) = query?;
    let filter = match params.kind.as_deref() {
        None => TypeFilter::All,
        Some(kind) => TypeFilter::parse(kind)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown component type: {}", kind)))?,
    };
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(state.page_size).clamp(1, MAX_PAGE_SIZE);

    let store = state.store.clone();
    let page = blocking(move || store.load_components(page, limit, filter)).await?;

    Ok(Json(ListResponse {
        success: true,
        page,
    }))
}

/// GET /api/components/:id
pub async fn get_component(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ComponentResponse>, ApiError> {
    let store = state.store.clone();
    let lookup = id.clone();
    let component = blocking(move || store.find_component(&lookup))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Component not found: {}", id)))?;

    Ok(Json(ComponentResponse {
        success: true,
        data: component,
    }))
}

/// POST /api/components - Create a component
///
/// Missing `metadata.id` and `folder` are derived from the name. A preview is
/// rendered from the HTML when screenshots are enabled and none was supplied.
pub async fn create_component(
    State(state): State<AppState>,
    body: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<Json<ComponentResponse>, ApiError> {
    let Json(request) = body?;
    let component = request
        .component
        .normalized()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let screenshot = resolve_screenshot(&state, request.screenshot, &component.html).await;

    let store = state.store.clone();
    let to_save = component.clone();
    let created =
        blocking(move || store.create_component(&to_save, screenshot.as_deref())).await?;

    if !created {
        return Err(ApiError::Internal("Failed to create component".to_string()));
    }

    Ok(Json(ComponentResponse {
        success: true,
        data: component,
    }))
}

/// PUT /api/components/:id - Update or rename a component
///
/// With `nameChanged` the component moves to the slug of its new name. The
/// original must exist before any preview is rendered.
pub async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<ComponentResponse>, ApiError> {
    let Json(request) = body?;

    let store = state.store.clone();
    let lookup = id.clone();
    if let Err(e) = blocking(move || store.try_find(&lookup)).await? {
        tracing::error!(id = %id, error = %e, "Error updating component");
        return Err(ApiError::Internal("Failed to update component".to_string()));
    }

    let screenshot =
        resolve_screenshot(&state, request.screenshot, &request.component.html).await;

    let store = state.store.clone();
    let original_id = id.clone();
    let result = blocking(move || {
        store.try_update(
            &original_id,
            &request.component,
            request.name_changed,
            screenshot.as_deref(),
        )
    })
    .await?;

    match result {
        Ok(component) => Ok(Json(ComponentResponse {
            success: true,
            data: component,
        })),
        Err(e @ StoreError::InvalidFolder(_)) => Err(ApiError::BadRequest(e.to_string())),
        Err(e) => {
            tracing::error!(id = %id, error = %e, "Error updating component");
            Err(ApiError::Internal("Failed to update component".to_string()))
        }
    }
}

/// DELETE /api/components/:id
pub async fn delete_component(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>, ApiError> {
    let store = state.store.clone();
    let deleted = blocking(move || store.delete_component(&id)).await?;

    if !deleted {
        return Err(ApiError::Internal("Failed to delete component".to_string()));
    }

    Ok(Json(ActionResponse { success: true }))
}

/// GET /api/components/:id/preview - Stored preview image
pub async fn get_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.clone();
    let lookup = id.clone();
    let path = blocking(move || store.preview_path(&lookup))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No preview for {}", id)))?;

    let png = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read preview: {}", e)))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
