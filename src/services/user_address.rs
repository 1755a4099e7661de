use std::sync::Arc;

use garde::Validate;
use uuid::Uuid;

use super::{parse_address_id, parse_user_id};
use crate::dto::{
    CreateUserAddressRequest, PatchUserAddressRequest, UserAddressResponse, UserAddressesResponse,
};
use crate::error::AppError;
use crate::models::UserAddress;
use crate::repositories::{RepoError, UserAddressRepository, UserRepository};

/// 住所サービス
#[derive(Clone)]
pub struct UserAddressService {
    user_repo: Arc<dyn UserRepository>,
    address_repo: Arc<dyn UserAddressRepository>,
}

impl UserAddressService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        address_repo: Arc<dyn UserAddressRepository>,
    ) -> Self {
        Self {
            user_repo,
            address_repo,
        }
    }

    /// ユーザーの住所一覧（ユーザーが存在しない場合は 404）
    pub async fn list_addresses(&self, user_id: &str) -> Result<UserAddressesResponse, AppError> {
        let user_id = parse_user_id(user_id)?;

        if self.user_repo.find_by_id(user_id).await?.is_none() {
            tracing::warn!(user_id = %user_id, "ユーザーが見つかりません");
            return Err(AppError::UserNotFound(user_id.to_string()));
        }

        let addresses = self.address_repo.list_by_user(user_id).await?;
        Ok(UserAddressesResponse::new(user_id, addresses))
    }

    pub async fn get_address(
        &self,
        user_id: &str,
        address_id: &str,
    ) -> Result<UserAddressResponse, AppError> {
        let user_id = parse_user_id(user_id)?;
        let address_id = parse_address_id(address_id)?;

        let address = self.find_owned(user_id, address_id).await?;
        Ok(address.into())
    }

    pub async fn create_address(
        &self,
        user_id: &str,
        request: CreateUserAddressRequest,
    ) -> Result<UserAddressResponse, AppError> {
        let user_id = parse_user_id(user_id)?;
        request.validate()?;

        let new_address = request.into_new_address();
        let created = self
            .address_repo
            .create(user_id, &new_address)
            .await
            .map_err(|e| match e {
                // 外部キー制約違反 = ユーザーが存在しない
                RepoError::ForeignKeyViolation(_) => {
                    tracing::warn!(user_id = %user_id, "住所作成: ユーザーが見つかりません");
                    AppError::UserNotFound(user_id.to_string())
                }
                other => {
                    tracing::error!(error = ?other, user_id = %user_id, "住所作成に失敗");
                    other.into()
                }
            })?;

        tracing::info!(user_id = %user_id, address_id = %created.id, "住所作成成功");
        Ok(created.into())
    }

    /// 指定された項目のみ更新（address_line_2 の空文字はクリア）
    pub async fn update_address(
        &self,
        user_id: &str,
        address_id: &str,
        request: PatchUserAddressRequest,
    ) -> Result<UserAddressResponse, AppError> {
        let user_id = parse_user_id(user_id)?;
        let address_id = parse_address_id(address_id)?;
        request.validate()?;

        let mut address = self.find_owned(user_id, address_id).await?;
        if !apply_updates(&request, &mut address) {
            tracing::info!(address_id = %address_id, "変更なしのため更新をスキップ");
            return Ok(address.into());
        }

        let updated = self
            .address_repo
            .update(&address)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, address_id = %address_id, "住所更新に失敗"))?;

        tracing::info!(user_id = %user_id, address_id = %address_id, "住所更新成功");
        Ok(updated.into())
    }

    /// 住所削除（存在しなくても成功）
    pub async fn delete_address(&self, user_id: &str, address_id: &str) -> Result<(), AppError> {
        let user_id = parse_user_id(user_id)?;
        let address_id = parse_address_id(address_id)?;

        let deleted = self
            .address_repo
            .delete(user_id, address_id)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, address_id = %address_id, "住所削除に失敗"))?;

        tracing::info!(user_id = %user_id, address_id = %address_id, deleted, "住所削除");
        Ok(())
    }

    /// 指定ユーザーが所有する住所を取得
    async fn find_owned(&self, user_id: Uuid, address_id: Uuid) -> Result<UserAddress, AppError> {
        let address = self.address_repo.find_by_id(address_id).await?;

        match address {
            Some(address) if address.user_id == user_id => Ok(address),
            _ => {
                tracing::warn!(user_id = %user_id, address_id = %address_id, "住所が見つかりません");
                Err(AppError::UserAddressNotFound(format!(
                    "ユーザー {user_id} の住所 {address_id} が見つかりません"
                )))
            }
        }
    }
}

/// PATCH の内容を適用し、値が変わった場合に true を返す
fn apply_updates(request: &PatchUserAddressRequest, address: &mut UserAddress) -> bool {
    fn assign(target: &mut String, value: &Option<String>) -> bool {
        match value {
            Some(value) if value.as_str() != target.as_str() => {
                *target = value.clone();
                true
            }
            _ => false,
        }
    }

    let mut changed = false;
    changed |= assign(&mut address.address_type, &request.address_type);
    changed |= assign(&mut address.address_line_1, &request.address_line_1);
    changed |= assign(&mut address.city, &request.city);
    changed |= assign(&mut address.state, &request.state);
    changed |= assign(&mut address.zip_code, &request.zip_code);
    changed |= assign(&mut address.country, &request.country);

    if let Some(line_2) = &request.address_line_2 {
        let line_2 = Some(line_2.clone()).filter(|l| !l.is_empty());
        if line_2 != address.address_line_2 {
            address.address_line_2 = line_2;
            changed = true;
        }
    }

    changed
}
