pub mod links;
pub mod requests;
pub mod responses;

pub use links::{Link, Links};
pub use requests::{
    CreateUserAddressRequest, CreateUserRequest, ListUsersQuery, PatchUserAddressRequest,
    PatchUserRequest,
};
pub use responses::{
    PageResponse, PagedUsersResponse, UserAddressResponse, UserAddressesResponse,
    UserProfileResponse, UserResponse,
};
