//! Cash-flow record endpoints.
//!
//! Reads expand every reference; writes take flat ids.

use api_types::{
    page::PageView,
    record::{AmountValue, RecordListQuery, RecordPatch, RecordView, RecordWrite},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{Amount, CashFlowRecordDetail, RecordCandidate, RecordFilter, RecordOrdering};

use crate::{
    ServerError, catalogs::map_catalog_entry, page_view, server::ServerState,
    subcategories::map_subcategory_item,
};

fn map_record(detail: CashFlowRecordDetail) -> RecordView {
    let record = detail.record;
    RecordView {
        id: record.id,
        status: map_catalog_entry(detail.status),
        transaction_type: map_catalog_entry(detail.transaction_type),
        category: map_catalog_entry(detail.category),
        subcategory: map_subcategory_item(detail.subcategory),
        amount: record.amount.to_string(),
        comment: record.comment,
        created_at: record.created_at,
        updated_at: record.updated_at,
        is_active: record.is_active,
    }
}

fn parse_amount(value: &AmountValue) -> Result<Amount, ServerError> {
    Ok(value.to_text().parse::<Amount>()?)
}

fn record_filter(query: RecordListQuery) -> Result<RecordFilter, ServerError> {
    let ordering = match query.ordering.as_deref() {
        Some(ordering) if !ordering.trim().is_empty() => ordering.parse::<RecordOrdering>()?,
        _ => RecordOrdering::default(),
    };
    Ok(RecordFilter {
        status_id: query.status,
        transaction_type_id: query.transaction_type,
        category_id: query.category,
        subcategory_id: query.subcategory,
        date_from: query.date_from,
        date_to: query.date_to,
        search: query.search,
        include_inactive: query.include_inactive.unwrap_or(false),
        ordering,
    })
}

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<RecordListQuery>, QueryRejection>,
) -> Result<Json<PageView<RecordView>>, ServerError> {
    let Query(query) = query?;
    let request = state.engine.page_request(query.page, query.page_size)?;
    let filter = record_filter(query)?;
    let page = state.engine.list_records(&filter, request).await?;
    Ok(Json(page_view(page, map_record)))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<RecordWrite>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordView>), ServerError> {
    let Json(payload) = payload?;
    let candidate = RecordCandidate {
        status_id: payload.status_id,
        transaction_type_id: payload.transaction_type_id,
        category_id: payload.category_id,
        subcategory_id: payload.subcategory_id,
        amount: parse_amount(&payload.amount)?,
        comment: payload.comment,
    };
    let detail = state.engine.submit_record(&candidate).await?;
    Ok((StatusCode::CREATED, Json(map_record(detail))))
}

pub async fn retrieve(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<RecordView>, ServerError> {
    let Path(id) = id?;
    let detail = state.engine.record(id).await?;
    Ok(Json(map_record(detail)))
}

/// `PUT`: every field is replaced; a missing comment clears it.
pub async fn replace(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<RecordWrite>, JsonRejection>,
) -> Result<Json<RecordView>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = engine::RecordPatch {
        status_id: Some(payload.status_id),
        transaction_type_id: Some(payload.transaction_type_id),
        category_id: Some(payload.category_id),
        subcategory_id: Some(payload.subcategory_id),
        amount: Some(parse_amount(&payload.amount)?),
        comment: Some(payload.comment.unwrap_or_default()),
    };
    let detail = state.engine.update_record(id, &patch).await?;
    Ok(Json(map_record(detail)))
}

pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<RecordPatch>, JsonRejection>,
) -> Result<Json<RecordView>, ServerError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let patch = engine::RecordPatch {
        status_id: payload.status_id,
        transaction_type_id: payload.transaction_type_id,
        category_id: payload.category_id,
        subcategory_id: payload.subcategory_id,
        amount: payload.amount.as_ref().map(parse_amount).transpose()?,
        comment: payload.comment,
    };
    let detail = state.engine.update_record(id, &patch).await?;
    Ok(Json(map_record(detail)))
}

/// `DELETE` soft-deletes the record.
pub async fn soft_delete(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(id) = id?;
    state.engine.soft_delete_record(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn enable(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<RecordView>, ServerError> {
    let Path(id) = id?;
    let detail = state.engine.restore_record(id).await?;
    Ok(Json(map_record(detail)))
}
