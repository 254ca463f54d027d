pub mod auth_token;
pub mod authz;
pub mod current_user;

pub use auth_token::AuthToken;
pub use authz::require_role;
pub use current_user::CurrentUser;
