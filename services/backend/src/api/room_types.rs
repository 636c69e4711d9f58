//! Room-type API handlers.
use crate::api::error::{ApiError, store_error};
use crate::api::types::RoomTypeListResponse;
use crate::api::{hard_delete_record, restore_record, soft_delete_record, view_from_params};
use crate::app::AppState;
use crate::model::{NewRoomType, RecordKind, RoomType};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::collections::HashMap;

#[utoipa::path(
    get,
    path = "/v1/room-types",
    tag = "room-types",
    params(
        ("view" = Option<String>, Query, description = "live (default), deleted, or all")
    ),
    responses(
        (status = 200, description = "List room types", body = RoomTypeListResponse)
    )
)]
pub(crate) async fn list_room_types(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<RoomTypeListResponse>, ApiError> {
    let view = view_from_params(&params)?;
    let items = state
        .store
        .list_room_types(view)
        .await
        .map_err(|err| store_error("failed to list room types", err))?;
    Ok(Json(RoomTypeListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/room-types/{id}",
    tag = "room-types",
    params(("id" = i64, Path, description = "Room type id")),
    responses(
        (status = 200, description = "Room type", body = RoomType),
        (status = 404, description = "Room type not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_room_type(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<RoomType>, ApiError> {
    let room_type = state
        .store
        .get_room_type(id)
        .await
        .map_err(|err| store_error("failed to load room type", err))?;
    Ok(Json(room_type))
}

#[utoipa::path(
    post,
    path = "/v1/room-types",
    tag = "room-types",
    request_body = NewRoomType,
    responses(
        (status = 201, description = "Room type created", body = RoomType)
    )
)]
pub(crate) async fn create_room_type(
    State(state): State<AppState>,
    Json(body): Json<NewRoomType>,
) -> Result<impl IntoResponse, ApiError> {
    let room_type = state
        .store
        .create_room_type(body)
        .await
        .map_err(|err| store_error("failed to create room type", err))?;
    Ok((StatusCode::CREATED, Json(room_type)))
}

#[utoipa::path(
    put,
    path = "/v1/room-types/{id}",
    tag = "room-types",
    params(("id" = i64, Path, description = "Room type id")),
    request_body = NewRoomType,
    responses(
        (status = 200, description = "Room type updated", body = RoomType),
        (status = 404, description = "Room type not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_room_type(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<NewRoomType>,
) -> Result<Json<RoomType>, ApiError> {
    let room_type = state
        .store
        .update_room_type(id, body)
        .await
        .map_err(|err| store_error("failed to update room type", err))?;
    Ok(Json(room_type))
}

#[utoipa::path(
    delete,
    path = "/v1/room-types/{id}",
    tag = "room-types",
    params(
        ("id" = i64, Path, description = "Room type id"),
        ("cascade" = Option<bool>, Query, description = "Cascade to owned records (default true)")
    ),
    responses(
        (status = 204, description = "Room type soft-deleted"),
        (status = 404, description = "Room type not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_room_type(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    soft_delete_record(&state, RecordKind::RoomType, id, &params).await
}

#[utoipa::path(
    post,
    path = "/v1/room-types/{id}/restore",
    tag = "room-types",
    params(
        ("id" = i64, Path, description = "Room type id"),
        ("cascade" = Option<bool>, Query, description = "Cascade to owned records (default true)")
    ),
    responses(
        (status = 204, description = "Room type restored"),
        (status = 404, description = "Room type not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn restore_room_type(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    restore_record(&state, RecordKind::RoomType, id, &params).await
}

#[utoipa::path(
    delete,
    path = "/v1/room-types/{id}/hard",
    tag = "room-types",
    params(("id" = i64, Path, description = "Room type id")),
    responses(
        (status = 204, description = "Room type permanently removed"),
        (status = 404, description = "Room type not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn hard_delete_room_type(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    hard_delete_record(&state, RecordKind::RoomType, id).await
}
