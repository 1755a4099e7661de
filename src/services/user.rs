use std::collections::HashMap;
use std::sync::Arc;

use garde::Validate;
use uuid::Uuid;

use super::{auth::hash_password, parse_user_id};
use crate::dto::{
    CreateUserRequest, Links, ListUsersQuery, PageResponse, PagedUsersResponse, PatchUserRequest,
    UserProfileResponse, UserResponse,
};
use crate::error::AppError;
use crate::models::{NewUser, ProfileUpdate, UserAccount, UserAddress};
use crate::repositories::{
    Pagination, RepoError, USERS_USERNAME_KEY, UserAddressRepository, UserFilter, UserRepository,
};

/// ユーザーサービス
#[derive(Clone)]
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    address_repo: Arc<dyn UserAddressRepository>,
}

impl UserService {
    /// 新しい UserService を作成
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        address_repo: Arc<dyn UserAddressRepository>,
    ) -> Self {
        Self {
            user_repo,
            address_repo,
        }
    }

    /// ユーザー一覧（ページング・絞り込み）
    pub async fn list_users(&self, query: &ListUsersQuery) -> Result<PagedUsersResponse, AppError> {
        query.validate()?;

        let filter = UserFilter::new(
            query.username.clone(),
            query.email.clone(),
            query.first_name.clone(),
            query.last_name.clone(),
            query.status.clone(),
        );
        let pagination = Pagination {
            page: query.page,
            size: query.size,
        };

        let (accounts, total) = self
            .user_repo
            .find_page(&filter, pagination)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "ユーザー一覧の取得に失敗"))?;

        let user_ids: Vec<Uuid> = accounts.iter().map(|a| a.id).collect();
        let mut addresses_by_user: HashMap<Uuid, Vec<UserAddress>> = HashMap::new();
        for address in self.address_repo.list_by_users(&user_ids).await? {
            addresses_by_user
                .entry(address.user_id)
                .or_default()
                .push(address);
        }

        let users = accounts
            .into_iter()
            .map(|account| {
                let addresses = addresses_by_user.remove(&account.id).unwrap_or_default();
                UserResponse::from_account(account, addresses)
            })
            .collect();

        Ok(PagedUsersResponse {
            users,
            page: PageResponse::new(query.page, query.size, total),
            links: Links::new(),
        })
    }

    /// ユーザー取得（住所を含む）
    pub async fn get_user(&self, user_id: &str) -> Result<UserResponse, AppError> {
        let user_id = parse_user_id(user_id)?;
        let account = self.find_account(user_id).await?;
        let addresses = self.address_repo.list_by_user(user_id).await?;

        Ok(UserResponse::from_account(account, addresses))
    }

    /// プロフィール取得
    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfileResponse, AppError> {
        let parsed = parse_user_id(user_id)?;
        let profile = self
            .user_repo
            .find_profile(parsed)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, user_id = %parsed, "プロフィールの取得に失敗"))?;

        match profile {
            Some(profile) => Ok(profile.into()),
            None => {
                tracing::warn!(user_id = %parsed, "プロフィールが見つかりません");
                Err(AppError::UserProfileNotFound(parsed.to_string()))
            }
        }
    }

    /// ユーザー・プロフィール・（任意の）住所を作成
    ///
    /// # Security
    /// - パスワードはログに出力しない
    /// - パスワードは即座にハッシュ化
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        let password_hash = hash_password(&request.password)?;
        let new_user = NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            phone_number: request.phone_number,
            profile_image_url: request.profile_image_url.filter(|url| !url.is_empty()),
            address: request.address.map(|a| a.into_new_address()),
        };

        let user_id = self.user_repo.create(&new_user).await.map_err(|e| match e {
            // UNIQUE制約違反チェック
            RepoError::UniqueViolation(constraint) => {
                let message = if constraint == USERS_USERNAME_KEY {
                    format!("ユーザー名 {} は既に使用されています", new_user.username)
                } else {
                    format!("メールアドレス {} は既に使用されています", new_user.email)
                };
                tracing::warn!(constraint = %constraint, "ユーザー作成の競合");
                AppError::Conflict(message)
            }
            other => {
                tracing::error!(error = ?other, username = %new_user.username, "ユーザー作成に失敗");
                other.into()
            }
        })?;

        tracing::info!(user_id = %user_id, username = %new_user.username, "ユーザー作成成功");

        let account = self.find_account(user_id).await?;
        let addresses = self.address_repo.list_by_user(user_id).await?;
        Ok(UserResponse::from_account(account, addresses))
    }

    /// プロフィール項目を部分更新
    ///
    /// 値が変わらない場合は書き込まずに現在の状態を返す。
    pub async fn update_user(
        &self,
        user_id: &str,
        request: PatchUserRequest,
    ) -> Result<UserResponse, AppError> {
        let user_id = parse_user_id(user_id)?;

        let changes_identity = |v: &Option<String>| v.as_ref().is_some_and(|s| !s.is_empty());
        if changes_identity(&request.username) || changes_identity(&request.email) {
            return Err(AppError::Validation(
                "ユーザー名またはメールアドレスは変更できません".to_string(),
            ));
        }
        request.validate()?;

        let account = self.find_account(user_id).await?;

        let Some(update) = apply_updates(&request, &account) else {
            tracing::info!(user_id = %user_id, "変更なしのため更新をスキップ");
            let addresses = self.address_repo.list_by_user(user_id).await?;
            return Ok(UserResponse::from_account(account, addresses));
        };

        let updated = self
            .user_repo
            .update_profile(user_id, &update)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, user_id = %user_id, "ユーザー更新に失敗"))?
            .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))?;

        tracing::info!(user_id = %user_id, "ユーザー更新成功");

        let addresses = self.address_repo.list_by_user(user_id).await?;
        Ok(UserResponse::from_account(updated, addresses))
    }

    /// ユーザー削除（存在しなくても成功）
    pub async fn delete_user(&self, user_id: &str) -> Result<(), AppError> {
        let user_id = parse_user_id(user_id)?;

        let deleted = self
            .user_repo
            .delete(user_id)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, user_id = %user_id, "ユーザー削除に失敗"))?;

        tracing::info!(user_id = %user_id, deleted, "ユーザー削除");
        Ok(())
    }

    async fn find_account(&self, user_id: Uuid) -> Result<UserAccount, AppError> {
        let account = self
            .user_repo
            .find_by_id(user_id)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, user_id = %user_id, "ユーザーの取得に失敗"))?;

        account.ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "ユーザーが見つかりません");
            AppError::UserNotFound(user_id.to_string())
        })
    }
}

/// PATCH の内容を現在値に適用し、変更がある場合のみ更新後の値を返す
///
/// 空文字のチェックは `PatchUserRequest::validate` で済んでいる前提。
/// profile_image_url の空文字は画像のクリアとして扱う。
fn apply_updates(request: &PatchUserRequest, account: &UserAccount) -> Option<ProfileUpdate> {
    let mut update = ProfileUpdate::from_account(account);

    if let Some(first_name) = &request.first_name {
        update.first_name = first_name.clone();
    }
    if let Some(last_name) = &request.last_name {
        update.last_name = last_name.clone();
    }
    if let Some(phone_number) = &request.phone_number {
        update.phone_number = phone_number.clone();
    }
    if let Some(url) = &request.profile_image_url {
        update.profile_image_url = Some(url.clone()).filter(|u| !u.is_empty());
    }

    (update != ProfileUpdate::from_account(account)).then_some(update)
}
