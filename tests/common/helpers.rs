//! Shared test helper functions

use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use workhours::{
    DbConn,
    models::users::{NewUser, Role, User},
    queries,
    services::users::hash_password,
};

use crate::common::TestApp;

pub const TEST_PASSWORD: &str = "password123";

/// Login name unique across parallel tests, e.g. `alice_x1Y2z3`
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, nanoid::nanoid!(6, &nanoid::alphabet::SAFE))
}

/// Inserts a user with [`TEST_PASSWORD`], bypassing the service layer
pub async fn create_test_user(conn: &mut DbConn, prefix: &str, role: Role) -> User {
    let new_user = NewUser {
        username: unique_username(prefix),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        display_name: Some(format!("{prefix} display")),
        timezone: "Asia/Shanghai".to_string(),
        role,
    };

    queries::users::create_user(conn, new_user)
        .await
        .expect("Failed to create test user")
}

/// Posts the login form and asserts the redirect to the dashboard.
///
/// The session cookie ends up in `client`'s cookie jar.
pub async fn login(app: &TestApp, client: &Client, username: &str, password: &str) {
    let response = client
        .post(app.url("/login"))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(format!("username={username}&password={password}"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER, "login should redirect");
    assert_eq!(response.headers()["location"], "/dashboard");
}
