pub mod auth;
pub mod remove_blanks;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use remove_blanks::{remove_blank_fields, remove_blanks};
