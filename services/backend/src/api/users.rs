//! User administration handlers.
//!
//! Users are soft-deletable like the hotel resources but own nothing, so
//! cascade flags are accepted and have no further effect.
use crate::api::error::{ApiError, store_error};
use crate::api::types::UserListResponse;
use crate::api::{hard_delete_record, restore_record, soft_delete_record, view_from_params};
use crate::app::AppState;
use crate::model::{NewUser, RecordKind, User};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::collections::HashMap;

#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "admin",
    params(
        ("view" = Option<String>, Query, description = "live (default), deleted, or all")
    ),
    responses(
        (status = 200, description = "List users", body = UserListResponse)
    )
)]
pub(crate) async fn list_users(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, ApiError> {
    let view = view_from_params(&params)?;
    let items = state
        .store
        .list_users(view)
        .await
        .map_err(|err| store_error("failed to list users", err))?;
    Ok(Json(UserListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_user(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .store
        .get_user(id)
        .await
        .map_err(|err| store_error("failed to load user", err))?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "admin",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "Username or email taken", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .create_user(body)
        .await
        .map_err(|err| store_error("failed to create user", err))?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/v1/users/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "User id")),
    request_body = NewUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_user(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .store
        .update_user(id, body)
        .await
        .map_err(|err| store_error("failed to update user", err))?;
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "User id"),
        ("cascade" = Option<bool>, Query, description = "Unused for users; accepted for uniformity")
    ),
    responses(
        (status = 204, description = "User soft-deleted"),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_user(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    soft_delete_record(&state, RecordKind::User, id, &params).await
}

#[utoipa::path(
    post,
    path = "/v1/users/{id}/restore",
    tag = "admin",
    params(
        ("id" = i64, Path, description = "User id"),
        ("cascade" = Option<bool>, Query, description = "Unused for users; accepted for uniformity")
    ),
    responses(
        (status = 204, description = "User restored"),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn restore_user(
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    restore_record(&state, RecordKind::User, id, &params).await
}

#[utoipa::path(
    delete,
    path = "/v1/users/{id}/hard",
    tag = "admin",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User permanently removed"),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn hard_delete_user(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    hard_delete_record(&state, RecordKind::User, id).await
}
