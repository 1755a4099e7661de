use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// 住所種別の既定値
pub const DEFAULT_ADDRESS_TYPE: &str = "home";

/// ユーザーの住所（billing, shipping, home など）
#[derive(Debug, Clone, FromRow)]
pub struct UserAddress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_type: String,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// 住所作成ペイロード
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub address_type: String,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}
