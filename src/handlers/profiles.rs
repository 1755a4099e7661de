use axum::{
    Json,
    extract::{Path, State},
};

use crate::dto::UserProfileResponse;
use crate::error::AppError;
use crate::state::AppState;

/// GET /v1/users/{user_id}/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfileResponse>, AppError> {
    let profile = state.user_service.get_profile(&user_id).await?;
    Ok(Json(state.assembler.profile(profile)))
}
