pub mod auth;
pub mod user;
pub mod user_address;

use uuid::Uuid;

use crate::error::AppError;

pub use user::UserService;
pub use user_address::UserAddressService;

/// パスのユーザーIDを解析（空・UUID以外は `InvalidUserId`）
pub fn parse_user_id(raw: &str) -> Result<Uuid, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidUserId);
    }
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidUserId)
}

/// パスの住所IDを解析
pub fn parse_address_id(raw: &str) -> Result<Uuid, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation(
            "住所IDが空です".to_string(),
        ));
    }
    Uuid::parse_str(raw)
        .map_err(|_| AppError::Validation(format!("住所IDが不正です: {raw}")))
}
