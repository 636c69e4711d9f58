//! Hotel API handlers.
//!
//! # Purpose
//! Implements hotel CRUD, the soft-delete trio, and the per-hotel summary
//! endpoint with consistent error mapping for store failures.
use crate::api::error::{ApiError, store_error};
use crate::api::types::HotelListResponse;
use crate::api::{hard_delete_record, restore_record, soft_delete_record, view_from_params};
use crate::app::AppState;
use crate::model::{Hotel, HotelSummary, NewHotel, RecordKind};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::collections::HashMap;

#[utoipa::path(
    get,
    path = "/v1/hotels",
    tag = "hotels",
    params(
        ("view" = Option<String>, Query, description = "live (default), deleted, or all")
    ),
    responses(
        (status = 200, description = "List hotels", body = HotelListResponse)
    )
)]
pub(crate) async fn list_hotels(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<HotelListResponse>, ApiError> {
    let view = view_from_params(&params)?;
    let items = state
        .store
        .list_hotels(view)
        .await
        .map_err(|err| store_error("failed to list hotels", err))?;
    Ok(Json(HotelListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/hotels/{id}",
    tag = "hotels",
    params(("id" = i64, Path, description = "Hotel id")),
    responses(
        (status = 200, description = "Hotel", body = Hotel),
        (status = 404, description = "Hotel not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_hotel(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Hotel>, ApiError> {
    let hotel = state
        .store
        .get_hotel(id)
        .await
        .map_err(|err| store_error("failed to load hotel", err))?;
    Ok(Json(hotel))
}

#[utoipa::path(
    post,
    path = "/v1/hotels",
    tag = "hotels",
    request_body = NewHotel,
    responses(
        (status = 201, description = "Hotel created", body = Hotel),
        (status = 400, description = "Invalid hotel", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_hotel(
    State(state): State<AppState>,
    Json(body): Json<NewHotel>,
) -> Result<impl IntoResponse, ApiError> {
    let hotel = state
        .store
        .create_hotel(body)
        .await
        .map_err(|err| store_error("failed to create hotel", err))?;
    Ok((StatusCode::CREATED, Json(hotel)))
}

#[utoipa::path(
    put,
    path = "/v1/hotels/{id}",
    tag = "hotels",
    params(("id" = i64, Path, description = "Hotel id")),
    request_body = NewHotel,
    responses(
        (status = 200, description = "Hotel updated", body = Hotel),
        (status = 404, description = "Hotel not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_hotel(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<NewHotel>,
) -> Result<Json<Hotel>, ApiError> {
    let hotel = state
        .store
        .update_hotel(id, body)
        .await
        .map_err(|err| store_error("failed to update hotel", err))?;
    Ok(Json(hotel))
}

#[utoipa::path(
    delete,
    path = "/v1/hotels/{id}",
    tag = "hotels",
    params(
        ("id" = i64, Path, description = "Hotel id"),
        ("cascade" = Option<bool>, Query, description = "Cascade to owned records (default true)")
    ),
    responses(
        (status = 204, description = "Hotel soft-deleted"),
        (status = 404, description = "Hotel not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_hotel(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    soft_delete_record(&state, RecordKind::Hotel, id, &params).await
}

#[utoipa::path(
    post,
    path = "/v1/hotels/{id}/restore",
    tag = "hotels",
    params(
        ("id" = i64, Path, description = "Hotel id"),
        ("cascade" = Option<bool>, Query, description = "Cascade to owned records (default true)")
    ),
    responses(
        (status = 204, description = "Hotel restored"),
        (status = 404, description = "Hotel not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn restore_hotel(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    restore_record(&state, RecordKind::Hotel, id, &params).await
}

#[utoipa::path(
    delete,
    path = "/v1/hotels/{id}/hard",
    tag = "hotels",
    params(("id" = i64, Path, description = "Hotel id")),
    responses(
        (status = 204, description = "Hotel permanently removed"),
        (status = 404, description = "Hotel not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn hard_delete_hotel(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    hard_delete_record(&state, RecordKind::Hotel, id).await
}

#[utoipa::path(
    get,
    path = "/v1/hotels/{id}/summary",
    tag = "hotels",
    params(("id" = i64, Path, description = "Hotel id")),
    responses(
        (status = 200, description = "Available rooms and staff headcount", body = HotelSummary),
        (status = 404, description = "Hotel not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn hotel_summary(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<HotelSummary>, ApiError> {
    let summary = state
        .store
        .hotel_summary(id)
        .await
        .map_err(|err| store_error("failed to load hotel summary", err))?;
    Ok(Json(summary))
}
