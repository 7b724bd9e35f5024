pub mod auth;

pub use auth::{current_user, session_auth_middleware};
