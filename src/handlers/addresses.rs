use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::extract::ApiJson;
use crate::dto::{
    CreateUserAddressRequest, PatchUserAddressRequest, UserAddressResponse, UserAddressesResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// GET /v1/users/{user_id}/addresses
pub async fn list_addresses(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserAddressesResponse>, AppError> {
    let addresses = state.address_service.list_addresses(&user_id).await?;
    Ok(Json(state.assembler.addresses(addresses)))
}

/// GET /v1/users/{user_id}/addresses/{address_id}
pub async fn get_address(
    State(state): State<AppState>,
    Path((user_id, address_id)): Path<(String, String)>,
) -> Result<Json<UserAddressResponse>, AppError> {
    let address = state
        .address_service
        .get_address(&user_id, &address_id)
        .await?;
    Ok(Json(state.assembler.address(address)))
}

/// POST /v1/users/{user_id}/addresses
pub async fn create_address(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(request): ApiJson<CreateUserAddressRequest>,
) -> Result<(StatusCode, Json<UserAddressResponse>), AppError> {
    let address = state
        .address_service
        .create_address(&user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(state.assembler.address(address))))
}

/// PATCH /v1/users/{user_id}/addresses/{address_id}
pub async fn update_address(
    State(state): State<AppState>,
    Path((user_id, address_id)): Path<(String, String)>,
    ApiJson(request): ApiJson<PatchUserAddressRequest>,
) -> Result<Json<UserAddressResponse>, AppError> {
    let address = state
        .address_service
        .update_address(&user_id, &address_id, request)
        .await?;
    Ok(Json(state.assembler.address(address)))
}

/// DELETE /v1/users/{user_id}/addresses/{address_id}
pub async fn delete_address(
    State(state): State<AppState>,
    Path((user_id, address_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state
        .address_service
        .delete_address(&user_id, &address_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
