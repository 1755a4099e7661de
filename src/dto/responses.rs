use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::Links;
use crate::models::{UserAccount, UserAddress, UserProfile};

/// ページ情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResponse {
    pub page_number: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_elements: i64,
}

impl PageResponse {
    pub fn new(page_number: i64, page_size: i64, total_elements: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_elements + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            page_number,
            page_size,
            total_pages,
            total_elements,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages - 1
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub status: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<UserAddressResponse>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(rename = "_links", skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl UserResponse {
    pub fn from_account(account: UserAccount, addresses: Vec<UserAddress>) -> Self {
        Self {
            user_id: account.id,
            username: account.username,
            email: account.email,
            status: account.status,
            first_name: account.first_name,
            last_name: account.last_name,
            phone_number: account.phone_number,
            profile_image_url: account.profile_image_url,
            addresses: addresses.into_iter().map(UserAddressResponse::from).collect(),
            created_at: account.created_at,
            updated_at: account.updated_at,
            links: Links::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PagedUsersResponse {
    pub users: Vec<UserResponse>,
    pub page: PageResponse,
    #[serde(rename = "_links", skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserProfileResponse {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(rename = "_links", skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            phone_number: profile.phone_number,
            profile_image_url: profile.profile_image_url,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
            links: Links::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserAddressResponse {
    pub address_id: Uuid,
    pub user_id: Uuid,
    pub address_type: String,
    pub address_line_1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(rename = "_links", skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl From<UserAddress> for UserAddressResponse {
    fn from(address: UserAddress) -> Self {
        Self {
            address_id: address.id,
            user_id: address.user_id,
            address_type: address.address_type,
            address_line_1: address.address_line_1,
            address_line_2: address.address_line_2,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
            country: address.country,
            created_at: address.created_at,
            updated_at: address.updated_at,
            links: Links::new(),
        }
    }
}

/// ユーザーの住所一覧（住所がなくても `addresses` は常に出力する）
#[derive(Debug, Clone, Serialize)]
pub struct UserAddressesResponse {
    pub user_id: Uuid,
    pub addresses: Vec<UserAddressResponse>,
    #[serde(rename = "_links", skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl UserAddressesResponse {
    pub fn new(user_id: Uuid, addresses: Vec<UserAddress>) -> Self {
        Self {
            user_id,
            addresses: addresses.into_iter().map(UserAddressResponse::from).collect(),
            links: Links::new(),
        }
    }
}
