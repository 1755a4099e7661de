use garde::Validate;
use serde::Deserialize;

use crate::models::{DEFAULT_ADDRESS_TYPE, NewAddress};

pub const DEFAULT_PAGE: i64 = 0;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
/// オフセット（page * size）が i64 に収まる最大ページ番号
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// ユーザー作成リクエスト
///
/// 必須項目が欠けている場合は空文字として扱い、バリデーションで弾く。
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[garde(length(min = 1))]
    pub username: String,
    #[serde(default)]
    #[garde(email)]
    pub email: String,
    #[serde(default)]
    #[garde(length(min = 8))]
    pub password: String, // SecretBox不要（Deserialize後すぐハッシュ化）
    #[serde(default)]
    #[garde(length(min = 1))]
    pub first_name: String,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub last_name: String,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub phone_number: String,
    #[garde(skip)]
    pub profile_image_url: Option<String>,
    #[garde(dive)]
    pub address: Option<CreateUserAddressRequest>,
}

/// 住所作成リクエスト
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateUserAddressRequest {
    #[garde(skip)]
    pub address_type: Option<String>,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub address_line_1: String,
    #[garde(skip)]
    pub address_line_2: Option<String>,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub city: String,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub state: String,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub zip_code: String,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub country: String,
}

impl CreateUserAddressRequest {
    /// 作成ペイロードに変換
    ///
    /// address_type が未指定・空なら既定値、address_line_2 が空なら未設定とする。
    pub fn into_new_address(self) -> NewAddress {
        NewAddress {
            address_type: self
                .address_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_ADDRESS_TYPE.to_string()),
            address_line_1: self.address_line_1,
            address_line_2: self.address_line_2.filter(|l| !l.is_empty()),
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self.country,
        }
    }
}

/// ユーザー更新リクエスト（PATCH）
///
/// 指定された項目のみ更新する。username / email の変更は不可。
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchUserRequest {
    #[garde(skip)]
    pub username: Option<String>,
    #[garde(skip)]
    pub email: Option<String>,
    #[garde(length(min = 1))]
    pub first_name: Option<String>,
    #[garde(length(min = 1))]
    pub last_name: Option<String>,
    #[garde(length(min = 1))]
    pub phone_number: Option<String>,
    /// 空文字の場合は画像をクリア
    #[garde(skip)]
    pub profile_image_url: Option<String>,
}

/// 住所更新リクエスト（PATCH）
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchUserAddressRequest {
    #[garde(length(min = 1))]
    pub address_type: Option<String>,
    #[garde(length(min = 1))]
    pub address_line_1: Option<String>,
    /// 空文字の場合はクリア
    #[garde(skip)]
    pub address_line_2: Option<String>,
    #[garde(length(min = 1))]
    pub city: Option<String>,
    #[garde(length(min = 1))]
    pub state: Option<String>,
    #[garde(length(min = 1))]
    pub zip_code: Option<String>,
    #[garde(length(min = 1))]
    pub country: Option<String>,
}

/// ユーザー一覧のクエリパラメータ
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    #[garde(range(min = 0, max = MAX_PAGE))]
    pub page: i64,
    #[serde(default = "default_page_size")]
    #[garde(range(min = 1, max = MAX_PAGE_SIZE))]
    pub size: i64,
    #[garde(skip)]
    pub username: Option<String>,
    #[garde(skip)]
    pub email: Option<String>,
    #[garde(skip)]
    pub first_name: Option<String>,
    #[garde(skip)]
    pub last_name: Option<String>,
    #[garde(skip)]
    pub status: Option<String>,
}

impl Default for ListUsersQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            username: None,
            email: None,
            first_name: None,
            last_name: None,
            status: None,
        }
    }
}
