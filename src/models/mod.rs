pub mod user;
pub mod user_address;
pub mod user_profile;

pub use user::{DEFAULT_USER_STATUS, NewUser, ProfileUpdate, UserAccount};
pub use user_address::{DEFAULT_ADDRESS_TYPE, NewAddress, UserAddress};
pub use user_profile::UserProfile;
