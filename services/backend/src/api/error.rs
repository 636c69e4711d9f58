//! API error types and helpers.
//!
//! # Purpose
//! Centralizes HTTP error response construction so every endpoint returns the
//! same `ErrorResponse` shape, and maps [`StoreError`] variants onto stable
//! HTTP status codes and `code` strings.
//!
//! # Security considerations
//! - Internal errors log details server-side but return generic messages.
//! - Request IDs are optional; avoid leaking sensitive details in messages.
use crate::api::types::ErrorResponse;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// Couples an HTTP status code with a JSON error body; `status` must match
/// the semantics of `body.code`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn build(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

pub fn api_not_found(message: &str) -> ApiError {
    build(StatusCode::NOT_FOUND, "not_found", message)
}

pub fn api_conflict(code: &str, message: &str) -> ApiError {
    // Caller provides a specific conflict code for precise client handling.
    build(StatusCode::CONFLICT, code, message)
}

pub fn api_validation_error(message: &str) -> ApiError {
    build(StatusCode::BAD_REQUEST, "validation_error", message)
}

/// Build a 500 from a store error, logging the details server-side.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "lodge-backend storage error");
    build(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

pub fn api_internal_message(message: &str) -> ApiError {
    build(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Map a store error onto the HTTP error taxonomy. `context` is the generic
/// message used for unexpected errors, whose details stay in the server log.
pub fn store_error(context: &str, err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(what) => api_not_found(&format!("{what} not found")),
        StoreError::Conflict(message) => api_conflict("already_exists", &message),
        StoreError::Validation(message) => api_validation_error(&message),
        StoreError::RoomOccupied(room_id) => build(
            StatusCode::CONFLICT,
            "room_occupied",
            &format!("room {room_id} is already occupied"),
        ),
        StoreError::NoOutstandingBalance(booking_id) => build(
            StatusCode::BAD_REQUEST,
            "no_outstanding_balance",
            &format!("booking {booking_id} has no outstanding balance"),
        ),
        StoreError::DateOrder => build(
            StatusCode::BAD_REQUEST,
            "date_order",
            "check-in date must be before check-out date",
        ),
        StoreError::AmbiguousDuration => build(
            StatusCode::BAD_REQUEST,
            "ambiguous_duration",
            "provide either a check-out date or a number of days, not both",
        ),
        StoreError::Unexpected(_) => api_internal(context, &err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_helpers_build_expected_codes() {
        let not_found = api_not_found("missing");
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.body.code, "not_found");

        let conflict = api_conflict("already_exists", "conflict");
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.body.code, "already_exists");

        let internal = api_internal_message("oops");
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.body.code, "internal");

        let validation = api_validation_error("bad");
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(validation.body.code, "validation_error");
    }

    #[test]
    fn store_errors_map_to_stable_codes() {
        let occupied = store_error("ctx", StoreError::RoomOccupied(7));
        assert_eq!(occupied.status, StatusCode::CONFLICT);
        assert_eq!(occupied.body.code, "room_occupied");

        let balance = store_error("ctx", StoreError::NoOutstandingBalance(3));
        assert_eq!(balance.status, StatusCode::BAD_REQUEST);
        assert_eq!(balance.body.code, "no_outstanding_balance");

        let order = store_error("ctx", StoreError::DateOrder);
        assert_eq!(order.status, StatusCode::BAD_REQUEST);
        assert_eq!(order.body.code, "date_order");

        let ambiguous = store_error("ctx", StoreError::AmbiguousDuration);
        assert_eq!(ambiguous.status, StatusCode::BAD_REQUEST);
        assert_eq!(ambiguous.body.code, "ambiguous_duration");

        let missing = store_error("ctx", StoreError::NotFound("booking".into()));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.body.message, "booking not found");

        let unexpected = store_error("ctx", StoreError::Unexpected(anyhow::anyhow!("boom")));
        assert_eq!(unexpected.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(unexpected.body.message, "ctx");
    }
}
