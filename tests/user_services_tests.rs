mod common;

use workhours::{
    Error,
    config::{AuthConfig, BootstrapConfig},
    models::users::{CreateUser, LoginUser, Role, UpdateProfile},
    services::{sessions, users},
};

use common::{TEST_PASSWORD, TestDb, create_test_user, unique_username};

#[tokio::test]
async fn test_bootstrap_admin_runs_once() {
    let test_db = TestDb::new("test_bootstrap_admin_runs_once").await;
    let mut conn = test_db.get_connection().await;
    let config = BootstrapConfig::default();

    let admin = users::ensure_bootstrap_admin(&mut conn, &config).await.unwrap();
    let admin = admin.expect("Empty database should get an admin");
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(admin.username, config.admin_username);

    let second = users::ensure_bootstrap_admin(&mut conn, &config).await.unwrap();
    assert!(second.is_none(), "Bootstrap must not run when users exist");
    assert_eq!(test_db.count_rows("users").await, 1);
}

#[tokio::test]
async fn test_admin_creates_member() {
    let test_db = TestDb::new("test_admin_creates_member").await;
    let mut conn = test_db.get_connection().await;
    let admin = create_test_user(&mut conn, "admin", Role::Admin).await;
    let username = unique_username("erin");

    let created = users::create_user(
        &mut conn,
        &admin,
        CreateUser {
            username: format!("  {username} "),
            password: "hunter22".to_string(),
            display_name: Some("Erin".to_string()),
        },
        "Europe/London",
    )
    .await
    .unwrap();

    assert_eq!(created.username, username, "Username should be trimmed");
    assert_eq!(created.role, Role::Member);
    assert_eq!(created.timezone, "Europe/London");
    assert!(users::verify_password("hunter22", &created.password_hash).unwrap());

    let duplicate = users::create_user(
        &mut conn,
        &admin,
        CreateUser {
            username,
            password: "another1".to_string(),
            display_name: None,
        },
        "Europe/London",
    )
    .await;
    assert!(matches!(duplicate, Err(Error::Conflict(_))));
}

#[tokio::test]
async fn test_member_cannot_manage_users() {
    let test_db = TestDb::new("test_member_cannot_manage_users").await;
    let mut conn = test_db.get_connection().await;
    let member = create_test_user(&mut conn, "frank", Role::Member).await;
    let other = create_test_user(&mut conn, "grace", Role::Member).await;

    let create = users::create_user(
        &mut conn,
        &member,
        CreateUser {
            username: unique_username("intruder"),
            password: "secret1".to_string(),
            display_name: None,
        },
        "Asia/Shanghai",
    )
    .await;
    assert!(matches!(create, Err(Error::Forbidden(_))));

    let delete = users::delete_user(&mut conn, &member, other.id).await;
    assert!(matches!(delete, Err(Error::Forbidden(_))));

    let list = users::list_all_users(&mut conn, &member).await;
    assert!(matches!(list, Err(Error::Forbidden(_))));
    assert_eq!(test_db.count_rows("users").await, 2);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let test_db = TestDb::new("test_admin_cannot_delete_self").await;
    let mut conn = test_db.get_connection().await;
    let admin = create_test_user(&mut conn, "root", Role::Admin).await;
    let member = create_test_user(&mut conn, "henry", Role::Member).await;

    let result = users::delete_user(&mut conn, &admin, admin.id).await;
    assert!(matches!(result, Err(Error::Forbidden(_))));

    users::delete_user(&mut conn, &admin, member.id).await.unwrap();
    let missing = users::delete_user(&mut conn, &admin, member.id).await;
    assert!(matches!(missing, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_login_opens_session() {
    let test_db = TestDb::new("test_login_opens_session").await;
    let mut conn = test_db.get_connection().await;
    let user = create_test_user(&mut conn, "ivy", Role::Member).await;
    let auth = AuthConfig::default();

    let result = users::login_user(
        &mut conn,
        LoginUser {
            username: user.username.clone(),
            password: TEST_PASSWORD.to_string(),
        },
        &auth,
    )
    .await
    .unwrap();

    let resolved = sessions::authenticate_session(&mut conn, &result.session_token).await.unwrap();
    assert_eq!(resolved.id, user.id);
    assert_eq!(test_db.count_rows("user_sessions").await, 1);

    sessions::revoke_session_by_token(&mut conn, &result.session_token).await.unwrap();
    let revoked = sessions::authenticate_session(&mut conn, &result.session_token).await;
    assert!(matches!(revoked, Err(Error::Authentication(_))));
    assert_eq!(test_db.count_rows("user_sessions").await, 0);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let test_db = TestDb::new("test_login_rejects_wrong_password").await;
    let mut conn = test_db.get_connection().await;
    let user = create_test_user(&mut conn, "jack", Role::Member).await;

    let result = users::login_user(
        &mut conn,
        LoginUser {
            username: user.username.clone(),
            password: "not-it".to_string(),
        },
        &AuthConfig::default(),
    )
    .await;
    assert!(matches!(result, Err(Error::Authentication(_))));

    let unknown = users::login_user(
        &mut conn,
        LoginUser {
            username: "nobody".to_string(),
            password: TEST_PASSWORD.to_string(),
        },
        &AuthConfig::default(),
    )
    .await;
    assert!(matches!(unknown, Err(Error::Authentication(_))));
    assert_eq!(test_db.count_rows("user_sessions").await, 0);
}

#[tokio::test]
async fn test_update_profile_changes_password_and_zone() {
    let test_db = TestDb::new("test_update_profile_changes_password_and_zone").await;
    let mut conn = test_db.get_connection().await;
    let user = create_test_user(&mut conn, "kate", Role::Member).await;

    let updated = users::update_profile(
        &mut conn,
        &user,
        UpdateProfile {
            display_name: Some("Kate K.".to_string()),
            timezone: Some("America/New_York".to_string()),
            current_password: Some(TEST_PASSWORD.to_string()),
            new_password: Some("brand-new".to_string()),
            confirm_password: Some("brand-new".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name(), "Kate K.");
    assert_eq!(updated.timezone, "America/New_York");
    assert!(users::verify_password("brand-new", &updated.password_hash).unwrap());
}

#[tokio::test]
async fn test_update_profile_rejects_before_writing() {
    let test_db = TestDb::new("test_update_profile_rejects_before_writing").await;
    let mut conn = test_db.get_connection().await;
    let user = create_test_user(&mut conn, "liam", Role::Member).await;

    let wrong_current = users::update_profile(
        &mut conn,
        &user,
        UpdateProfile {
            current_password: Some("guess".to_string()),
            new_password: Some("brand-new".to_string()),
            confirm_password: Some("brand-new".to_string()),
            ..UpdateProfile::default()
        },
    )
    .await;
    assert!(matches!(wrong_current, Err(Error::Validation(_))));

    let bad_zone = users::update_profile(
        &mut conn,
        &user,
        UpdateProfile {
            timezone: Some("Mars/Olympus".to_string()),
            current_password: Some(TEST_PASSWORD.to_string()),
            new_password: Some("brand-new".to_string()),
            confirm_password: Some("brand-new".to_string()),
            ..UpdateProfile::default()
        },
    )
    .await;
    assert!(matches!(bad_zone, Err(Error::Validation(_))));

    let stored = users::get_user(&mut conn, user.id).await.unwrap();
    assert!(users::verify_password(TEST_PASSWORD, &stored.password_hash).unwrap());
    assert_eq!(stored.timezone, "Asia/Shanghai");
}
