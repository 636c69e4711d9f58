//! Permission administration handlers.
use crate::api::error::{ApiError, store_error};
use crate::api::types::PermissionListResponse;
use crate::app::AppState;
use crate::model::{NewPermission, Permission};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/v1/permissions",
    tag = "admin",
    responses(
        (status = 200, description = "List permissions", body = PermissionListResponse)
    )
)]
pub(crate) async fn list_permissions(
    State(state): State<AppState>,
) -> Result<Json<PermissionListResponse>, ApiError> {
    let items = state
        .store
        .list_permissions()
        .await
        .map_err(|err| store_error("failed to list permissions", err))?;
    Ok(Json(PermissionListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/permissions/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "Permission id")),
    responses(
        (status = 200, description = "Permission", body = Permission),
        (status = 404, description = "Permission not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_permission(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Permission>, ApiError> {
    let permission = state
        .store
        .get_permission(id)
        .await
        .map_err(|err| store_error("failed to load permission", err))?;
    Ok(Json(permission))
}

#[utoipa::path(
    post,
    path = "/v1/permissions",
    tag = "admin",
    request_body = NewPermission,
    responses(
        (status = 201, description = "Permission created", body = Permission),
        (status = 409, description = "Permission name or code taken", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_permission(
    State(state): State<AppState>,
    Json(body): Json<NewPermission>,
) -> Result<impl IntoResponse, ApiError> {
    let permission = state
        .store
        .create_permission(body)
        .await
        .map_err(|err| store_error("failed to create permission", err))?;
    Ok((StatusCode::CREATED, Json(permission)))
}

#[utoipa::path(
    put,
    path = "/v1/permissions/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "Permission id")),
    request_body = NewPermission,
    responses(
        (status = 200, description = "Permission updated", body = Permission),
        (status = 404, description = "Permission not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_permission(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<NewPermission>,
) -> Result<Json<Permission>, ApiError> {
    let permission = state
        .store
        .update_permission(id, body)
        .await
        .map_err(|err| store_error("failed to update permission", err))?;
    Ok(Json(permission))
}

#[utoipa::path(
    delete,
    path = "/v1/permissions/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "Permission id")),
    responses(
        (status = 204, description = "Permission deleted"),
        (status = 404, description = "Permission not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_permission(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_permission(id)
        .await
        .map_err(|err| store_error("failed to delete permission", err))?;
    Ok(StatusCode::NO_CONTENT)
}
