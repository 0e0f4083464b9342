//! Subcategory endpoints.

use api_types::{
    page::PageView,
    subcategory::{
        ByCategoryQuery, SubcategoryItem, SubcategoryListQuery, SubcategoryPatch,
        SubcategoryView, SubcategoryWrite,
    },
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{Subcategory, SubcategoryDetail, SubcategoryListFilter};

use crate::{ServerError, catalogs::map_catalog_entry, page_view, server::ServerState};

pub(crate) fn map_subcategory_item(subcategory: Subcategory) -> SubcategoryItem {
    SubcategoryItem {
        id: subcategory.id,
        category_id: subcategory.category_id,
        name: subcategory.name,
        created_at: subcategory.created_at,
        is_active: subcategory.is_active,
    }
}

fn map_subcategory(detail: SubcategoryDetail) -> SubcategoryView {
    SubcategoryView {
        id: detail.subcategory.id,
        category: map_catalog_entry(detail.category),
        name: detail.subcategory.name,
        created_at: detail.subcategory.created_at,
        is_active: detail.subcategory.is_active,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<SubcategoryListQuery>, QueryRejection>,
) -> Result<Json<PageView<SubcategoryView>>, ServerError> {
    let Query(query) = query?;
    let request = state.engine.page_request(query.page, query.page_size)?;
    let filter = SubcategoryListFilter {
        category_id: query.category,
        is_active: query.is_active,
        search: query.search,
    };
    let page = state.engine.list_subcategories(&filter, request).await?;
    Ok(Json(page_view(page, map_subcategory)))
}

/// Active subcategories of one category, for dependent pickers.
pub async fn by_category(
    State(state): State<ServerState>,
    query: Result<Query<ByCategoryQuery>, QueryRejection>,
) -> Result<Json<Vec<SubcategoryItem>>, ServerError> {
    let Query(query) = query?;
    let items = state
        .engine
        .subcategories_by_category(query.category_id)
        .await?
        .into_iter()
        .map(map_subcategory_item)
        .collect();
    Ok(Json(items))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<SubcategoryWrite>, JsonRejection>,
) -> Result<(StatusCode, Json<SubcategoryView>), ServerError> {
    let Json(payload) = payload?;
    let detail = state
        .engine
        .create_subcategory(
            payload.category_id,
            &payload.name,
            payload.is_active.unwrap_or(true),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_subcategory(detail))))
}

pub async fn retrieve(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<SubcategoryView>, ServerError> {
    let Path(id) = id?;
    let detail = state.engine.subcategory(id).await?;
    Ok(Json(map_subcategory(detail)))
}

pub async fn replace(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<SubcategoryWrite>, JsonRejection>,
) -> Result<Json<SubcategoryView>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = engine::SubcategoryPatch {
        category_id: Some(payload.category_id),
        name: Some(payload.name),
        is_active: payload.is_active,
    };
    let detail = state.engine.update_subcategory(id, &patch).await?;
    Ok(Json(map_subcategory(detail)))
}

pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<SubcategoryPatch>, JsonRejection>,
) -> Result<Json<SubcategoryView>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = engine::SubcategoryPatch {
        category_id: payload.category_id,
        name: payload.name,
        is_active: payload.is_active,
    };
    let detail = state.engine.update_subcategory(id, &patch).await?;
    Ok(Json(map_subcategory(detail)))
}

pub async fn deactivate(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(id) = id?;
    state.engine.deactivate_subcategory(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn enable(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<SubcategoryView>, ServerError> {
    let Path(id) = id?;
    let detail = state.engine.activate_subcategory(id).await?;
    Ok(Json(map_subcategory(detail)))
}
