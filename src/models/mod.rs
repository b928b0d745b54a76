pub mod api;
pub mod app;
pub mod role;
pub mod user;

// Re-export the wire types so code outside can do
// "use crate::models::{ApiResponse, User};"
pub use api::{ApiResponse, ApiStatus, PostLogin, PostRefresh};
pub use app::App;
pub use role::{Role, RoleName};
pub use user::User;
