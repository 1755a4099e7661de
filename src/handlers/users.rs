use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::extract::{ApiJson, ApiQuery};
use crate::dto::{
    CreateUserRequest, ListUsersQuery, PagedUsersResponse, PatchUserRequest, UserResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// GET /v1/users
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> Result<Json<PagedUsersResponse>, AppError> {
    let page = state.user_service.list_users(&query).await?;
    Ok(Json(state.assembler.paged_users(page, &query)))
}

/// GET /v1/users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.get_user(&user_id).await?;
    Ok(Json(state.assembler.user(user)))
}

/// POST /v1/users
///
/// # Security
/// - パスワードはログに出力しない
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = state.user_service.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(state.assembler.user(user))))
}

/// PATCH /v1/users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(request): ApiJson<PatchUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.update_user(&user_id, request).await?;
    Ok(Json(state.assembler.user(user)))
}

/// DELETE /v1/users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.user_service.delete_user(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
