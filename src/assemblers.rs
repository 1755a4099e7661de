//! HAL `_links` の組み立て
//!
//! href は `public_base_url` + パスで生成する。

use uuid::Uuid;

use crate::dto::{
    ListUsersQuery, Links, PagedUsersResponse, UserAddressResponse, UserAddressesResponse,
    UserProfileResponse, UserResponse,
};
use crate::repositories::non_blank;

const USERS_PATH: &str = "/v1/users";

#[derive(Debug, Clone)]
pub struct ModelAssembler {
    base_url: String,
}

impl ModelAssembler {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn users_href(&self) -> String {
        format!("{}{USERS_PATH}", self.base_url)
    }

    fn user_href(&self, user_id: Uuid) -> String {
        format!("{}/{user_id}", self.users_href())
    }

    fn profile_href(&self, user_id: Uuid) -> String {
        format!("{}/profile", self.user_href(user_id))
    }

    fn addresses_href(&self, user_id: Uuid) -> String {
        format!("{}/addresses", self.user_href(user_id))
    }

    fn address_href(&self, user_id: Uuid, address_id: Uuid) -> String {
        format!("{}/{address_id}", self.addresses_href(user_id))
    }

    fn page_href(&self, query: &ListUsersQuery, page: i64) -> String {
        let mut href = format!("{}?page={page}&size={}", self.users_href(), query.size);
        let filters = [
            ("username", &query.username),
            ("email", &query.email),
            ("first_name", &query.first_name),
            ("last_name", &query.last_name),
            ("status", &query.status),
        ];
        for (name, value) in filters {
            if let Some(value) = non_blank(value.as_deref()) {
                href.push_str(&format!("&{name}={}", urlencoding::encode(value)));
            }
        }
        href
    }

    /// 住所: self, user
    fn embedded_address(&self, address: &mut UserAddressResponse) {
        address
            .links
            .add("self", self.address_href(address.user_id, address.address_id));
        address.links.add("user", self.user_href(address.user_id));
    }

    /// 一覧内のユーザー: self, profile, addresses
    fn user_links(&self, user: &mut UserResponse) {
        let user_id = user.user_id;
        user.links.add("self", self.user_href(user_id));
        user.links.add("profile", self.profile_href(user_id));
        user.links.add("addresses", self.addresses_href(user_id));
        for address in &mut user.addresses {
            self.embedded_address(address);
        }
    }

    /// 単一ユーザー: self, profile, addresses, collection
    pub fn user(&self, mut user: UserResponse) -> UserResponse {
        self.user_links(&mut user);
        user.links.add("collection", self.users_href());
        user
    }

    /// ユーザー一覧: self / next / prev / first / last
    pub fn paged_users(
        &self,
        mut paged: PagedUsersResponse,
        query: &ListUsersQuery,
    ) -> PagedUsersResponse {
        for user in &mut paged.users {
            self.user_links(user);
        }

        let page = &paged.page;
        let mut links = Links::new();
        links.add("self", self.page_href(query, page.page_number));
        if page.has_next() {
            links.add("next", self.page_href(query, page.page_number + 1));
        }
        if page.has_previous() {
            links.add("prev", self.page_href(query, page.page_number - 1));
            links.add("first", self.page_href(query, 0));
        }
        if page.has_next() {
            links.add("last", self.page_href(query, page.total_pages - 1));
        }
        paged.links = links;
        paged
    }

    /// プロフィール: self, user, addresses
    pub fn profile(&self, mut profile: UserProfileResponse) -> UserProfileResponse {
        let user_id = profile.user_id;
        profile.links.add("self", self.profile_href(user_id));
        profile.links.add("user", self.user_href(user_id));
        profile.links.add("addresses", self.addresses_href(user_id));
        profile
    }

    /// 単一住所: self, user, collection
    pub fn address(&self, mut address: UserAddressResponse) -> UserAddressResponse {
        self.embedded_address(&mut address);
        address
            .links
            .add("collection", self.addresses_href(address.user_id));
        address
    }

    /// 住所一覧: self, user
    pub fn addresses(&self, mut addresses: UserAddressesResponse) -> UserAddressesResponse {
        let user_id = addresses.user_id;
        for address in &mut addresses.addresses {
            self.embedded_address(address);
        }
        addresses.links.add("self", self.addresses_href(user_id));
        addresses.links.add("user", self.user_href(user_id));
        addresses
    }
}
