use std::collections::HashMap;
use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    Pagination, RepoError, USER_ADDRESSES_USER_ID_FKEY, USERS_EMAIL_KEY, USERS_USERNAME_KEY,
    UserAddressRepository, UserFilter, UserRepository,
};
use crate::models::{
    DEFAULT_USER_STATUS, NewAddress, NewUser, ProfileUpdate, UserAccount, UserAddress, UserProfile,
};

struct StoredUser {
    id: Uuid,
    username: String,
    email: String,
    #[allow(dead_code)]
    password_hash: String,
    status: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

#[derive(Default)]
struct Tables {
    /// 作成順
    users: Vec<StoredUser>,
    profiles: HashMap<Uuid, UserProfile>,
    /// 作成順
    addresses: Vec<UserAddress>,
}

impl Tables {
    fn account(&self, user: &StoredUser) -> Option<UserAccount> {
        let profile = self.profiles.get(&user.id)?;
        Some(UserAccount {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            status: user.status.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            phone_number: profile.phone_number.clone(),
            profile_image_url: profile.profile_image_url.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }

    fn user_exists(&self, user_id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == user_id)
    }

    fn build_address(user_id: Uuid, address: &NewAddress, now: OffsetDateTime) -> UserAddress {
        UserAddress {
            id: Uuid::new_v4(),
            user_id,
            address_type: address.address_type.clone(),
            address_line_1: address.address_line_1.clone(),
            address_line_2: address.address_line_2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
            country: address.country.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// インメモリストア（test プロファイル用）
///
/// Postgres スキーマと同じ一意制約・外部キー制約・カスケード削除を再現する。
/// 各操作は書き込みロック内で完結するため、トランザクションと同等に原子的。
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryStore {
    async fn find_page(
        &self,
        filter: &UserFilter,
        pagination: Pagination,
    ) -> Result<(Vec<UserAccount>, i64), RepoError> {
        let tables = self.tables.read().await;
        let matched: Vec<UserAccount> = tables
            .users
            .iter()
            .filter_map(|u| tables.account(u))
            .filter(|account| filter.matches(account))
            .collect();

        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(pagination.offset().max(0) as usize)
            .take(pagination.size.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserAccount>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == user_id)
            .and_then(|u| tables.account(u)))
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.profiles.get(&user_id).cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<Uuid, RepoError> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.username == new_user.username) {
            return Err(RepoError::UniqueViolation(USERS_USERNAME_KEY.to_string()));
        }
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(RepoError::UniqueViolation(USERS_EMAIL_KEY.to_string()));
        }

        let now = OffsetDateTime::now_utc();
        let user_id = Uuid::new_v4();

        tables.users.push(StoredUser {
            id: user_id,
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            status: DEFAULT_USER_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        });
        tables.profiles.insert(
            user_id,
            UserProfile {
                user_id,
                first_name: new_user.first_name.clone(),
                last_name: new_user.last_name.clone(),
                phone_number: new_user.phone_number.clone(),
                profile_image_url: new_user.profile_image_url.clone(),
                created_at: now,
                updated_at: now,
            },
        );
        if let Some(address) = &new_user.address {
            let address = Tables::build_address(user_id, address, now);
            tables.addresses.push(address);
        }

        Ok(user_id)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<UserAccount>, RepoError> {
        let mut tables = self.tables.write().await;
        let now = OffsetDateTime::now_utc();

        let Some(profile) = tables.profiles.get_mut(&user_id) else {
            return Ok(None);
        };
        profile.first_name = update.first_name.clone();
        profile.last_name = update.last_name.clone();
        profile.phone_number = update.phone_number.clone();
        profile.profile_image_url = update.profile_image_url.clone();
        profile.updated_at = now;

        let Some(index) = tables.users.iter().position(|u| u.id == user_id) else {
            return Ok(None);
        };
        tables.users[index].updated_at = now;

        Ok(tables.account(&tables.users[index]))
    }

    async fn delete(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;

        let before = tables.users.len();
        tables.users.retain(|u| u.id != user_id);
        let deleted = (before - tables.users.len()) as u64;

        // ON DELETE CASCADE
        tables.profiles.remove(&user_id);
        tables.addresses.retain(|a| a.user_id != user_id);

        Ok(deleted)
    }
}

#[async_trait::async_trait]
impl UserAddressRepository for InMemoryStore {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<UserAddress>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .addresses
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_users(&self, user_ids: &[Uuid]) -> Result<Vec<UserAddress>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .addresses
            .iter()
            .filter(|a| user_ids.contains(&a.user_id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, address_id: Uuid) -> Result<Option<UserAddress>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.addresses.iter().find(|a| a.id == address_id).cloned())
    }

    async fn create(&self, user_id: Uuid, address: &NewAddress) -> Result<UserAddress, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.user_exists(user_id) {
            return Err(RepoError::ForeignKeyViolation(
                USER_ADDRESSES_USER_ID_FKEY.to_string(),
            ));
        }

        let created = Tables::build_address(user_id, address, OffsetDateTime::now_utc());
        tables.addresses.push(created.clone());
        Ok(created)
    }

    async fn update(&self, address: &UserAddress) -> Result<UserAddress, RepoError> {
        let mut tables = self.tables.write().await;

        let stored = tables
            .addresses
            .iter_mut()
            .find(|a| a.id == address.id)
            .ok_or(RepoError::Database(sqlx::Error::RowNotFound))?;

        stored.address_type = address.address_type.clone();
        stored.address_line_1 = address.address_line_1.clone();
        stored.address_line_2 = address.address_line_2.clone();
        stored.city = address.city.clone();
        stored.state = address.state.clone();
        stored.zip_code = address.zip_code.clone();
        stored.country = address.country.clone();
        stored.updated_at = OffsetDateTime::now_utc();

        Ok(stored.clone())
    }

    async fn delete(&self, user_id: Uuid, address_id: Uuid) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;

        let before = tables.addresses.len();
        tables
            .addresses
            .retain(|a| !(a.user_id == user_id && a.id == address_id));

        Ok((before - tables.addresses.len()) as u64)
    }
}
