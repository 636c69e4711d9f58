//! Guest API handlers.
//!
//! Includes the per-guest booking history endpoint alongside the usual CRUD
//! and soft-delete surface.
use crate::api::error::{ApiError, store_error};
use crate::api::types::{GuestBookingsResponse, GuestListResponse};
use crate::api::{hard_delete_record, restore_record, soft_delete_record, view_from_params};
use crate::app::AppState;
use crate::model::{Guest, NewGuest, RecordKind};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use std::collections::HashMap;

#[utoipa::path(
    get,
    path = "/v1/guests",
    tag = "guests",
    params(
        ("view" = Option<String>, Query, description = "live (default), deleted, or all")
    ),
    responses(
        (status = 200, description = "List guests", body = GuestListResponse)
    )
)]
pub(crate) async fn list_guests(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<GuestListResponse>, ApiError> {
    let view = view_from_params(&params)?;
    let items = state
        .store
        .list_guests(view)
        .await
        .map_err(|err| store_error("failed to list guests", err))?;
    Ok(Json(GuestListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/guests/{id}",
    tag = "guests",
    params(("id" = i64, Path, description = "Guest id")),
    responses(
        (status = 200, description = "Guest", body = Guest),
        (status = 404, description = "Guest not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_guest(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Guest>, ApiError> {
    let guest = state
        .store
        .get_guest(id)
        .await
        .map_err(|err| store_error("failed to load guest", err))?;
    Ok(Json(guest))
}

#[utoipa::path(
    post,
    path = "/v1/guests",
    tag = "guests",
    request_body = NewGuest,
    responses(
        (status = 201, description = "Guest created", body = Guest)
    )
)]
pub(crate) async fn create_guest(
    State(state): State<AppState>,
    Json(body): Json<NewGuest>,
) -> Result<impl IntoResponse, ApiError> {
    let guest = state
        .store
        .create_guest(body)
        .await
        .map_err(|err| store_error("failed to create guest", err))?;
    Ok((StatusCode::CREATED, Json(guest)))
}

#[utoipa::path(
    put,
    path = "/v1/guests/{id}",
    tag = "guests",
    params(("id" = i64, Path, description = "Guest id")),
    request_body = NewGuest,
    responses(
        (status = 200, description = "Guest updated", body = Guest),
        (status = 404, description = "Guest not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_guest(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<NewGuest>,
) -> Result<Json<Guest>, ApiError> {
    let guest = state
        .store
        .update_guest(id, body)
        .await
        .map_err(|err| store_error("failed to update guest", err))?;
    Ok(Json(guest))
}

#[utoipa::path(
    delete,
    path = "/v1/guests/{id}",
    tag = "guests",
    params(
        ("id" = i64, Path, description = "Guest id"),
        ("cascade" = Option<bool>, Query, description = "Cascade to owned records (default true)")
    ),
    responses(
        (status = 204, description = "Guest soft-deleted"),
        (status = 404, description = "Guest not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_guest(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    soft_delete_record(&state, RecordKind::Guest, id, &params).await
}

#[utoipa::path(
    post,
    path = "/v1/guests/{id}/restore",
    tag = "guests",
    params(
        ("id" = i64, Path, description = "Guest id"),
        ("cascade" = Option<bool>, Query, description = "Cascade to owned records (default true)")
    ),
    responses(
        (status = 204, description = "Guest restored"),
        (status = 404, description = "Guest not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn restore_guest(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    restore_record(&state, RecordKind::Guest, id, &params).await
}

#[utoipa::path(
    delete,
    path = "/v1/guests/{id}/hard",
    tag = "guests",
    params(("id" = i64, Path, description = "Guest id")),
    responses(
        (status = 204, description = "Guest permanently removed"),
        (status = 404, description = "Guest not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn hard_delete_guest(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    hard_delete_record(&state, RecordKind::Guest, id).await
}

#[utoipa::path(
    get,
    path = "/v1/guests/{id}/bookings",
    tag = "guests",
    params(("id" = i64, Path, description = "Guest id")),
    responses(
        (status = 200, description = "Live bookings for the guest, split into current and historical stays", body = GuestBookingsResponse),
        (status = 404, description = "Guest not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn guest_bookings(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<GuestBookingsResponse>, ApiError> {
    let bookings = state
        .store
        .guest_bookings(id)
        .await
        .map_err(|err| store_error("failed to load guest bookings", err))?;
    let today = Utc::now().date_naive();
    let (current, historical) = bookings
        .into_iter()
        .partition(|booking| booking.check_out_date >= today);
    Ok(Json(GuestBookingsResponse {
        current,
        historical,
    }))
}
