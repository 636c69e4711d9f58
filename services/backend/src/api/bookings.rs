//! Booking API handlers.
//!
//! # Purpose
//! Bookings drive the room state machine: creating one occupies the room,
//! deleting one (soft or hard) releases it. The total price is always derived
//! server-side from the stay length and the room type's nightly rate. This
//! module also exposes the outstanding-balance query and the expired-booking
//! sweep.
use crate::api::error::{ApiError, store_error};
use crate::api::types::{BookingListResponse, ReleaseExpiredRequest, ReleaseExpiredResponse};
use crate::api::{hard_delete_record, restore_record, soft_delete_record, view_from_params};
use crate::app::AppState;
use crate::model::{Booking, BookingBalance, BookingUpdate, NewBooking, RecordKind};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use std::collections::HashMap;

#[utoipa::path(
    get,
    path = "/v1/bookings",
    tag = "bookings",
    params(
        ("view" = Option<String>, Query, description = "live (default), deleted, or all")
    ),
    responses(
        (status = 200, description = "List bookings", body = BookingListResponse)
    )
)]
pub(crate) async fn list_bookings(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let view = view_from_params(&params)?;
    let items = state
        .store
        .list_bookings(view)
        .await
        .map_err(|err| store_error("failed to list bookings", err))?;
    Ok(Json(BookingListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/bookings/{id}",
    tag = "bookings",
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking", body = Booking),
        (status = 404, description = "Booking not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_booking(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state
        .store
        .get_booking(id)
        .await
        .map_err(|err| store_error("failed to load booking", err))?;
    Ok(Json(booking))
}

#[utoipa::path(
    post,
    path = "/v1/bookings",
    tag = "bookings",
    request_body = NewBooking,
    responses(
        (status = 201, description = "Booking created; the room is now occupied", body = Booking),
        (status = 400, description = "Invalid stay dates", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Room already occupied", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_booking(
    State(state): State<AppState>,
    Json(body): Json<NewBooking>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .store
        .create_booking(body)
        .await
        .map_err(|err| store_error("failed to create booking", err))?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[utoipa::path(
    put,
    path = "/v1/bookings/{id}",
    tag = "bookings",
    params(("id" = i64, Path, description = "Booking id")),
    request_body = BookingUpdate,
    responses(
        (status = 200, description = "Booking updated; total price recomputed", body = Booking),
        (status = 404, description = "Booking not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_booking(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<BookingUpdate>,
) -> Result<Json<Booking>, ApiError> {
    let booking = state
        .store
        .update_booking(id, body)
        .await
        .map_err(|err| store_error("failed to update booking", err))?;
    Ok(Json(booking))
}

#[utoipa::path(
    delete,
    path = "/v1/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking id"),
        ("cascade" = Option<bool>, Query, description = "Cascade to payments (default true)")
    ),
    responses(
        (status = 204, description = "Booking cancelled; the room is released"),
        (status = 404, description = "Booking not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_booking(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    soft_delete_record(&state, RecordKind::Booking, id, &params).await
}

#[utoipa::path(
    post,
    path = "/v1/bookings/{id}/restore",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking id"),
        ("cascade" = Option<bool>, Query, description = "Cascade to payments (default true)")
    ),
    responses(
        (status = 204, description = "Booking restored; the room is re-occupied if free"),
        (status = 404, description = "Booking not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn restore_booking(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    restore_record(&state, RecordKind::Booking, id, &params).await
}

#[utoipa::path(
    delete,
    path = "/v1/bookings/{id}/hard",
    tag = "bookings",
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 204, description = "Booking permanently removed; the room is released"),
        (status = 404, description = "Booking not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn hard_delete_booking(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    hard_delete_record(&state, RecordKind::Booking, id).await
}

#[utoipa::path(
    get,
    path = "/v1/bookings/{id}/balance",
    tag = "bookings",
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Total price, amount paid, and outstanding balance", body = BookingBalance),
        (status = 404, description = "Booking not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn booking_balance(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<BookingBalance>, ApiError> {
    let balance = state
        .store
        .booking_balance(id)
        .await
        .map_err(|err| store_error("failed to load booking balance", err))?;
    Ok(Json(balance))
}

#[utoipa::path(
    post,
    path = "/v1/bookings/release-expired",
    tag = "bookings",
    request_body = ReleaseExpiredRequest,
    responses(
        (status = 200, description = "Rooms released for bookings past checkout", body = ReleaseExpiredResponse)
    )
)]
pub(crate) async fn release_expired(
    State(state): State<AppState>,
    body: Option<Json<ReleaseExpiredRequest>>,
) -> Result<Json<ReleaseExpiredResponse>, ApiError> {
    let reference = body
        .and_then(|Json(req)| req.reference_date)
        .unwrap_or_else(|| Utc::now().date_naive());
    let released = state
        .store
        .release_expired_bookings(reference)
        .await
        .map_err(|err| store_error("failed to release expired bookings", err))?;
    Ok(Json(ReleaseExpiredResponse { released }))
}
