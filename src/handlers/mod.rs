pub mod addresses;
pub mod docs;
pub mod extract;
pub mod health;
pub mod profiles;
pub mod users;

pub use addresses::{create_address, delete_address, get_address, list_addresses, update_address};
pub use docs::api_docs;
pub use health::{health_check, ping};
pub use profiles::get_profile;
pub use users::{create_user, delete_user, get_user, list_users, update_user};
