pub mod memory;
pub mod user;
pub mod user_address;

use uuid::Uuid;

use crate::models::{NewAddress, NewUser, ProfileUpdate, UserAccount, UserAddress, UserProfile};

pub use memory::InMemoryStore;
pub use user::PgUserRepository;
pub use user_address::PgUserAddressRepository;

pub const USERS_USERNAME_KEY: &str = "users_username_key";
pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const USER_ADDRESSES_USER_ID_FKEY: &str = "user_addresses_user_id_fkey";

/// リポジトリ層のエラー
///
/// 制約違反は制約名付きで返し、サービス層で 409 / 404 に変換する。
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("一意制約違反: {0}")]
    UniqueViolation(String),

    #[error("外部キー制約違反: {0}")]
    ForeignKeyViolation(String),

    #[error("データベースエラー")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return Self::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return Self::ForeignKeyViolation(constraint);
            }
        }
        Self::Database(e)
    }
}

/// 空白のみの絞り込み値は未指定として扱う
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// ユーザー一覧の絞り込み条件
///
/// 文字列項目は大文字小文字を区別しない部分一致、status は大文字化して完全一致。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: Option<String>,
}

impl UserFilter {
    /// 空文字の条件は未指定として扱う
    pub fn new(
        username: Option<String>,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        status: Option<String>,
    ) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| non_blank(Some(s.as_str())).is_some());
        Self {
            username: non_empty(username),
            email: non_empty(email),
            first_name: non_empty(first_name),
            last_name: non_empty(last_name),
            status: non_empty(status).map(|s| s.to_uppercase()),
        }
    }

    pub fn matches(&self, account: &UserAccount) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }

        contains(&account.username, &self.username)
            && contains(&account.email, &self.email)
            && contains(&account.first_name, &self.first_name)
            && contains(&account.last_name, &self.last_name)
            && self.status.as_ref().is_none_or(|s| &account.status == s)
    }
}

/// ページ指定（page は 0 始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
}

impl Pagination {
    /// 桁あふれ時は i64::MAX（空ページになる）
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    /// 絞り込み・ページングしたユーザーと総件数を返す
    async fn find_page(
        &self,
        filter: &UserFilter,
        pagination: Pagination,
    ) -> Result<(Vec<UserAccount>, i64), RepoError>;

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserAccount>, RepoError>;

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, RepoError>;

    /// ユーザー・プロフィール・（任意の）住所を 1 トランザクションで作成し、ユーザーIDを返す
    async fn create(&self, new_user: &NewUser) -> Result<Uuid, RepoError>;

    /// プロフィールを更新し、ユーザーとプロフィールの updated_at を更新する
    ///
    /// ユーザーが存在しない場合は `None`
    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<UserAccount>, RepoError>;

    /// 削除した行数を返す
    async fn delete(&self, user_id: Uuid) -> Result<u64, RepoError>;
}

#[async_trait::async_trait]
pub trait UserAddressRepository: Send + Sync {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<UserAddress>, RepoError>;

    async fn list_by_users(&self, user_ids: &[Uuid]) -> Result<Vec<UserAddress>, RepoError>;

    async fn find_by_id(&self, address_id: Uuid) -> Result<Option<UserAddress>, RepoError>;

    /// # Errors
    /// - ユーザーが存在しない場合: `RepoError::ForeignKeyViolation` (`user_addresses_user_id_fkey`)
    async fn create(&self, user_id: Uuid, address: &NewAddress) -> Result<UserAddress, RepoError>;

    /// 住所の全項目を書き込み、updated_at を更新する
    async fn update(&self, address: &UserAddress) -> Result<UserAddress, RepoError>;

    /// 削除した行数を返す
    async fn delete(&self, user_id: Uuid, address_id: Uuid) -> Result<u64, RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn account(username: &str, first_name: &str, status: &str) -> UserAccount {
        let now = OffsetDateTime::now_utc();
        UserAccount {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            status: status.to_string(),
            first_name: first_name.to_string(),
            last_name: "Bombadil".to_string(),
            phone_number: "5746857273733".to_string(),
            profile_image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_filter_treats_empty_as_absent() {
        let filter = UserFilter::new(Some(String::new()), None, Some("  ".to_string()), None, None);
        assert_eq!(filter, UserFilter::default());
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" tom ")), Some(" tom "));
    }

    #[test]
    fn test_filter_case_insensitive_substring() {
        let filter = UserFilter::new(Some("WIZARD".to_string()), None, None, None, None);
        assert!(filter.matches(&account("magicalwizardman", "Tom", "ACTIVE")));
        assert!(!filter.matches(&account("hobbit", "Tom", "ACTIVE")));
    }

    #[test]
    fn test_filter_status_exact_uppercase() {
        let filter = UserFilter::new(None, None, None, None, Some("active".to_string()));
        assert_eq!(filter.status.as_deref(), Some("ACTIVE"));
        assert!(filter.matches(&account("tom", "Tom", "ACTIVE")));
        assert!(!filter.matches(&account("tom", "Tom", "INACTIVE")));
    }

    #[test]
    fn test_pagination_offset() {
        assert_eq!(Pagination { page: 0, size: 10 }.offset(), 0);
        assert_eq!(Pagination { page: 3, size: 10 }.offset(), 30);
        assert_eq!(
            Pagination {
                page: i64::MAX,
                size: 10
            }
            .offset(),
            i64::MAX
        );
    }

    #[test]
    fn test_non_database_error_kept() {
        let error = RepoError::from(sqlx::Error::RowNotFound);
        assert!(matches!(error, RepoError::Database(sqlx::Error::RowNotFound)));
    }
}
