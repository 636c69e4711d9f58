//! Group administration handlers. Groups are plain records with hard delete
//! only; deleting a group strips its memberships.
use crate::api::error::{ApiError, store_error};
use crate::api::types::GroupListResponse;
use crate::app::AppState;
use crate::model::{Group, NewGroup};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/v1/groups",
    tag = "admin",
    responses(
        (status = 200, description = "List groups", body = GroupListResponse)
    )
)]
pub(crate) async fn list_groups(
    State(state): State<AppState>,
) -> Result<Json<GroupListResponse>, ApiError> {
    let items = state
        .store
        .list_groups()
        .await
        .map_err(|err| store_error("failed to list groups", err))?;
    Ok(Json(GroupListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/groups/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group", body = Group),
        (status = 404, description = "Group not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_group(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Group>, ApiError> {
    let group = state
        .store
        .get_group(id)
        .await
        .map_err(|err| store_error("failed to load group", err))?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/v1/groups",
    tag = "admin",
    request_body = NewGroup,
    responses(
        (status = 201, description = "Group created", body = Group),
        (status = 409, description = "Group name taken", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_group(
    State(state): State<AppState>,
    Json(body): Json<NewGroup>,
) -> Result<impl IntoResponse, ApiError> {
    let group = state
        .store
        .create_group(body)
        .await
        .map_err(|err| store_error("failed to create group", err))?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    put,
    path = "/v1/groups/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "Group id")),
    request_body = NewGroup,
    responses(
        (status = 200, description = "Group updated", body = Group),
        (status = 404, description = "Group not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_group(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(body): Json<NewGroup>,
) -> Result<Json<Group>, ApiError> {
    let group = state
        .store
        .update_group(id, body)
        .await
        .map_err(|err| store_error("failed to update group", err))?;
    Ok(Json(group))
}

#[utoipa::path(
    delete,
    path = "/v1/groups/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "Group id")),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 404, description = "Group not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_group(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_group(id)
        .await
        .map_err(|err| store_error("failed to delete group", err))?;
    Ok(StatusCode::NO_CONTENT)
}
