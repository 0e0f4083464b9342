//! Status, transaction type and category endpoints.
//!
//! The three catalogs share every handler; the router attaches the
//! [`CatalogKind`] of each resource as a request extension.

use api_types::{
    catalog::{CatalogEntryView, CatalogListQuery, CatalogPatch, CatalogWrite},
    page::PageView,
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{CatalogEntry, CatalogKind, CatalogListFilter};

use crate::{ServerError, page_view, server::ServerState};

pub(crate) fn map_catalog_entry(entry: CatalogEntry) -> CatalogEntryView {
    CatalogEntryView {
        id: entry.id,
        name: entry.name,
        created_at: entry.created_at,
        is_active: entry.is_active,
    }
}

pub async fn list(
    Extension(kind): Extension<CatalogKind>,
    State(state): State<ServerState>,
    query: Result<Query<CatalogListQuery>, QueryRejection>,
) -> Result<Json<PageView<CatalogEntryView>>, ServerError> {
    let Query(query) = query?;
    let request = state.engine.page_request(query.page, query.page_size)?;
    let filter = CatalogListFilter {
        is_active: query.is_active,
        search: query.search,
    };
    let page = state
        .engine
        .list_catalog_entries(kind, &filter, request)
        .await?;
    Ok(Json(page_view(page, map_catalog_entry)))
}

pub async fn create(
    Extension(kind): Extension<CatalogKind>,
    State(state): State<ServerState>,
    payload: Result<Json<CatalogWrite>, JsonRejection>,
) -> Result<(StatusCode, Json<CatalogEntryView>), ServerError> {
    let Json(payload) = payload?;
    let entry = state
        .engine
        .create_catalog_entry(kind, &payload.name, payload.is_active.unwrap_or(true))
        .await?;
    Ok((StatusCode::CREATED, Json(map_catalog_entry(entry))))
}

pub async fn retrieve(
    Extension(kind): Extension<CatalogKind>,
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<CatalogEntryView>, ServerError> {
    let Path(id) = id?;
    let entry = state.engine.catalog_entry(kind, id).await?;
    Ok(Json(map_catalog_entry(entry)))
}

/// `PUT`: the name is required, the activity flag is optional.
pub async fn replace(
    Extension(kind): Extension<CatalogKind>,
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<CatalogWrite>, JsonRejection>,
) -> Result<Json<CatalogEntryView>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = engine::CatalogPatch {
        name: Some(payload.name),
        is_active: payload.is_active,
    };
    let entry = state.engine.update_catalog_entry(kind, id, &patch).await?;
    Ok(Json(map_catalog_entry(entry)))
}

pub async fn update(
    Extension(kind): Extension<CatalogKind>,
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<CatalogPatch>, JsonRejection>,
) -> Result<Json<CatalogEntryView>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = engine::CatalogPatch {
        name: payload.name,
        is_active: payload.is_active,
    };
    let entry = state.engine.update_catalog_entry(kind, id, &patch).await?;
    Ok(Json(map_catalog_entry(entry)))
}

/// `DELETE` only clears the activity flag.
pub async fn deactivate(
    Extension(kind): Extension<CatalogKind>,
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(id) = id?;
    state.engine.deactivate_catalog_entry(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn enable(
    Extension(kind): Extension<CatalogKind>,
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<CatalogEntryView>, ServerError> {
    let Path(id) = id?;
    let entry = state.engine.activate_catalog_entry(kind, id).await?;
    Ok(Json(map_catalog_entry(entry)))
}
