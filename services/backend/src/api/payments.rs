//! Payment API handlers.
//!
//! Payments are append-only ledger entries: the amount is always the
//! booking's outstanding balance at creation time, so there is no update
//! endpoint.
use crate::api::error::{ApiError, store_error};
use crate::api::types::PaymentListResponse;
use crate::api::{hard_delete_record, restore_record, soft_delete_record, view_from_params};
use crate::api::error::api_validation_error;
use crate::app::AppState;
use crate::model::{NewPayment, Payment, RecordKind};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::collections::HashMap;

#[utoipa::path(
    get,
    path = "/v1/payments",
    tag = "payments",
    params(
        ("view" = Option<String>, Query, description = "live (default), deleted, or all"),
        ("booking_id" = Option<i64>, Query, description = "Filter by booking")
    ),
    responses(
        (status = 200, description = "List payments", body = PaymentListResponse)
    )
)]
pub(crate) async fn list_payments(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<PaymentListResponse>, ApiError> {
    let view = view_from_params(&params)?;
    let booking_id = match params.get("booking_id") {
        None => None,
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| api_validation_error(&format!("invalid booking_id {raw:?}")))?,
        ),
    };
    let items = state
        .store
        .list_payments(view, booking_id)
        .await
        .map_err(|err| store_error("failed to list payments", err))?;
    Ok(Json(PaymentListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/payments/{id}",
    tag = "payments",
    params(("id" = i64, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 404, description = "Payment not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_payment(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Payment>, ApiError> {
    let payment = state
        .store
        .get_payment(id)
        .await
        .map_err(|err| store_error("failed to load payment", err))?;
    Ok(Json(payment))
}

#[utoipa::path(
    post,
    path = "/v1/payments",
    tag = "payments",
    request_body = NewPayment,
    responses(
        (status = 201, description = "Payment recorded for the full outstanding balance", body = Payment),
        (status = 400, description = "No outstanding balance", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_payment(
    State(state): State<AppState>,
    Json(body): Json<NewPayment>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state
        .store
        .create_payment(body)
        .await
        .map_err(|err| store_error("failed to record payment", err))?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    delete,
    path = "/v1/payments/{id}",
    tag = "payments",
    params(
        ("id" = i64, Path, description = "Payment id"),
        ("cascade" = Option<bool>, Query, description = "Unused for payments; accepted for uniformity")
    ),
    responses(
        (status = 204, description = "Payment soft-deleted"),
        (status = 404, description = "Payment not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_payment(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    soft_delete_record(&state, RecordKind::Payment, id, &params).await
}

#[utoipa::path(
    post,
    path = "/v1/payments/{id}/restore",
    tag = "payments",
    params(
        ("id" = i64, Path, description = "Payment id"),
        ("cascade" = Option<bool>, Query, description = "Unused for payments; accepted for uniformity")
    ),
    responses(
        (status = 204, description = "Payment restored"),
        (status = 404, description = "Payment not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn restore_payment(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    restore_record(&state, RecordKind::Payment, id, &params).await
}

#[utoipa::path(
    delete,
    path = "/v1/payments/{id}/hard",
    tag = "payments",
    params(("id" = i64, Path, description = "Payment id")),
    responses(
        (status = 204, description = "Payment permanently removed"),
        (status = 404, description = "Payment not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn hard_delete_payment(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    hard_delete_record(&state, RecordKind::Payment, id).await
}
