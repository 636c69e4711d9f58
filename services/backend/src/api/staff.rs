//! Staff API handlers.
use crate::api::error::{ApiError, store_error};
use crate::api::types::StaffListResponse;
use crate::api::{hard_delete_record, restore_record, soft_delete_record, view_from_params};
use crate::app::AppState;
use crate::model::{NewStaff, RecordKind, Staff};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::collections::HashMap;

#[utoipa::path(
    get,
    path = "/v1/staff",
    tag = "staff",
    params(
        ("view" = Option<String>, Query, description = "live (default), deleted, or all")
    ),
    responses(
        (status = 200, description = "List staff", body = StaffListResponse)
    )
)]
pub(crate) async fn list_staff(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<StaffListResponse>, ApiError> {
    let view = view_from_params(&params)?;
    let items = state
        .store
        .list_staff(view)
        .await
        .map_err(|err| store_error("failed to list staff", err))?;
    Ok(Json(StaffListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/staff/{id}",
    tag = "staff",
    params(("id" = i64, Path, description = "Staff id")),
    responses(
        (status = 200, description = "Staff member", body = Staff),
        (status = 404, description = "Staff not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_staff(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Staff>, ApiError> {
    let staff = state
        .store
        .get_staff(id)
        .await
        .map_err(|err| store_error("failed to load staff", err))?;
    Ok(Json(staff))
}

#[utoipa::path(
    post,
    path = "/v1/staff",
    tag = "staff",
    request_body = NewStaff,
    responses(
        (status = 201, description = "Staff created", body = Staff),
        (status = 400, description = "Invalid staff", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_staff(
    State(state): State<AppState>,
    Json(body): Json<NewStaff>,
) -> Result<impl IntoResponse, ApiError> {
    let staff = state
        .store
        .create_staff(body)
        .await
        .map_err(|err| store_error("failed to create staff", err))?;
    Ok((StatusCode::CREATED, Json(staff)))
}

#[utoipa::path(
    put,
    path = "/v1/staff/{id}",
    tag = "staff",
    params(("id" = i64, Path, description = "Staff id")),
    request_body = NewStaff,
    responses(
        (status = 200, description = "Staff updated", body = Staff),
        (status = 404, description = "Staff not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_staff(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<NewStaff>,
) -> Result<Json<Staff>, ApiError> {
    let staff = state
        .store
        .update_staff(id, body)
        .await
        .map_err(|err| store_error("failed to update staff", err))?;
    Ok(Json(staff))
}

#[utoipa::path(
    delete,
    path = "/v1/staff/{id}",
    tag = "staff",
    params(
        ("id" = i64, Path, description = "Staff id"),
        ("cascade" = Option<bool>, Query, description = "Cascade to owned records (default true)")
    ),
    responses(
        (status = 204, description = "Staff soft-deleted"),
        (status = 404, description = "Staff not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_staff(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    soft_delete_record(&state, RecordKind::Staff, id, &params).await
}

#[utoipa::path(
    post,
    path = "/v1/staff/{id}/restore",
    tag = "staff",
    params(
        ("id" = i64, Path, description = "Staff id"),
        ("cascade" = Option<bool>, Query, description = "Cascade to owned records (default true)")
    ),
    responses(
        (status = 204, description = "Staff restored"),
        (status = 404, description = "Staff not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn restore_staff(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    restore_record(&state, RecordKind::Staff, id, &params).await
}

#[utoipa::path(
    delete,
    path = "/v1/staff/{id}/hard",
    tag = "staff",
    params(("id" = i64, Path, description = "Staff id")),
    responses(
        (status = 204, description = "Staff permanently removed"),
        (status = 404, description = "Staff not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn hard_delete_staff(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    hard_delete_record(&state, RecordKind::Staff, id).await
}
