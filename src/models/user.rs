use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// 新規ユーザーの既定ステータス
pub const DEFAULT_USER_STATUS: &str = "ACTIVE";

/// ユーザーとプロフィールの結合行
///
/// `users` と `user_profiles` を user_id で結合したもの。
/// パスワードハッシュは読み出さない。
#[derive(Debug, Clone, FromRow)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub status: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub profile_image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// ユーザー作成ペイロード
///
/// ユーザー・プロフィール・（任意の）住所を 1 トランザクションで作成する。
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub profile_image_url: Option<String>,
    pub address: Option<super::NewAddress>,
}

/// プロフィール更新後の値（全項目を書き込む）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub profile_image_url: Option<String>,
}

impl ProfileUpdate {
    pub fn from_account(account: &UserAccount) -> Self {
        Self {
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            phone_number: account.phone_number.clone(),
            profile_image_url: account.profile_image_url.clone(),
        }
    }
}
