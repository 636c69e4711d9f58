//! Room API handlers.
//!
//! Room status is never client-supplied: rooms are created available and the
//! booking lifecycle flips them between available and occupied.
use crate::api::error::{ApiError, store_error};
use crate::api::types::RoomListResponse;
use crate::api::{hard_delete_record, restore_record, soft_delete_record, view_from_params};
use crate::app::AppState;
use crate::model::{NewRoom, RecordKind, Room};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::collections::HashMap;

#[utoipa::path(
    get,
    path = "/v1/rooms",
    tag = "rooms",
    params(
        ("view" = Option<String>, Query, description = "live (default), deleted, or all")
    ),
    responses(
        (status = 200, description = "List rooms", body = RoomListResponse)
    )
)]
pub(crate) async fn list_rooms(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<RoomListResponse>, ApiError> {
    let view = view_from_params(&params)?;
    let items = state
        .store
        .list_rooms(view)
        .await
        .map_err(|err| store_error("failed to list rooms", err))?;
    Ok(Json(RoomListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/rooms/{id}",
    tag = "rooms",
    params(("id" = i64, Path, description = "Room id")),
    responses(
        (status = 200, description = "Room", body = Room),
        (status = 404, description = "Room not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_room(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Room>, ApiError> {
    let room = state
        .store
        .get_room(id)
        .await
        .map_err(|err| store_error("failed to load room", err))?;
    Ok(Json(room))
}

#[utoipa::path(
    post,
    path = "/v1/rooms",
    tag = "rooms",
    request_body = NewRoom,
    responses(
        (status = 201, description = "Room created", body = Room),
        (status = 400, description = "Invalid room", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_room(
    State(state): State<AppState>,
    Json(body): Json<NewRoom>,
) -> Result<impl IntoResponse, ApiError> {
    let room = state
        .store
        .create_room(body)
        .await
        .map_err(|err| store_error("failed to create room", err))?;
    Ok((StatusCode::CREATED, Json(room)))
}

#[utoipa::path(
    put,
    path = "/v1/rooms/{id}",
    tag = "rooms",
    params(("id" = i64, Path, description = "Room id")),
    request_body = NewRoom,
    responses(
        (status = 200, description = "Room updated", body = Room),
        (status = 404, description = "Room not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_room(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<NewRoom>,
) -> Result<Json<Room>, ApiError> {
    let room = state
        .store
        .update_room(id, body)
        .await
        .map_err(|err| store_error("failed to update room", err))?;
    Ok(Json(room))
}

#[utoipa::path(
    delete,
    path = "/v1/rooms/{id}",
    tag = "rooms",
    params(
        ("id" = i64, Path, description = "Room id"),
        ("cascade" = Option<bool>, Query, description = "Cascade to owned records (default true)")
    ),
    responses(
        (status = 204, description = "Room soft-deleted"),
        (status = 404, description = "Room not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_room(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    soft_delete_record(&state, RecordKind::Room, id, &params).await
}

#[utoipa::path(
    post,
    path = "/v1/rooms/{id}/restore",
    tag = "rooms",
    params(
        ("id" = i64, Path, description = "Room id"),
        ("cascade" = Option<bool>, Query, description = "Cascade to owned records (default true)")
    ),
    responses(
        (status = 204, description = "Room restored"),
        (status = 404, description = "Room not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn restore_room(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    restore_record(&state, RecordKind::Room, id, &params).await
}

#[utoipa::path(
    delete,
    path = "/v1/rooms/{id}/hard",
    tag = "rooms",
    params(("id" = i64, Path, description = "Room id")),
    responses(
        (status = 204, description = "Room permanently removed"),
        (status = 404, description = "Room not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn hard_delete_room(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    hard_delete_record(&state, RecordKind::Room, id).await
}
