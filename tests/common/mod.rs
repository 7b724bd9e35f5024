#![allow(dead_code)]

pub mod database;
pub mod helpers;
pub mod test_app;

pub use database::TestDb;
pub use helpers::{create_test_user, login, unique_username, TEST_PASSWORD};
pub use test_app::TestApp;
