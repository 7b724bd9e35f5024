mod common;

use chrono::NaiveDate;
use workhours::{
    models::{
        time_records::{NewTimeRecord, Period},
        users::{Role, UpdateUser},
    },
    queries::{
        time_records::{count_records_for_user, create_record},
        users::{
            count_users, delete_user, get_user_by_id, get_user_by_username, list_users,
            list_users_excluding_role, update_user,
        },
    },
};

use common::{TestDb, create_test_user};

#[tokio::test]
async fn test_create_and_get_user_query() {
    let test_db = TestDb::new("test_create_and_get_user_query").await;
    let mut conn = test_db.get_connection().await;

    let created = create_test_user(&mut conn, "alice", Role::Member).await;

    let by_id = get_user_by_id(&mut conn, created.id).await.unwrap().unwrap();
    assert_eq!(by_id.username, created.username);
    assert_eq!(by_id.role, Role::Member);
    assert_eq!(by_id.timezone, "Asia/Shanghai");

    let by_name = get_user_by_username(&mut conn, &created.username).await.unwrap().unwrap();
    assert_eq!(by_name.id, created.id);

    let missing = get_user_by_id(&mut conn, uuid::Uuid::now_v7()).await.unwrap();
    assert!(missing.is_none(), "Unknown id should return None");
}

#[tokio::test]
async fn test_list_users_excluding_admins() {
    let test_db = TestDb::new("test_list_users_excluding_admins").await;
    let mut conn = test_db.get_connection().await;

    let admin = create_test_user(&mut conn, "boss", Role::Admin).await;
    let member_a = create_test_user(&mut conn, "a", Role::Member).await;
    let member_b = create_test_user(&mut conn, "b", Role::Member).await;

    assert_eq!(count_users(&mut conn).await.unwrap(), 3);
    assert_eq!(list_users(&mut conn).await.unwrap().len(), 3);

    let members = list_users_excluding_role(&mut conn, Role::Admin).await.unwrap();
    let ids: Vec<_> = members.iter().map(|u| u.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&member_a.id));
    assert!(ids.contains(&member_b.id));
    assert!(!ids.contains(&admin.id));
}

#[tokio::test]
async fn test_update_user_query() {
    let test_db = TestDb::new("test_update_user_query").await;
    let mut conn = test_db.get_connection().await;
    let user = create_test_user(&mut conn, "carol", Role::Member).await;

    let updated = update_user(
        &mut conn,
        user.id,
        UpdateUser {
            display_name: Some("Carol C.".to_string()),
            timezone: Some("Europe/Berlin".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.display_name.as_deref(), Some("Carol C."));
    assert_eq!(updated.timezone, "Europe/Berlin");
    assert_eq!(updated.username, user.username, "Username should not change");
}

#[tokio::test]
async fn test_delete_user_cascades_to_records() {
    let test_db = TestDb::new("test_delete_user_cascades_to_records").await;
    let mut conn = test_db.get_connection().await;
    let user = create_test_user(&mut conn, "dave", Role::Member).await;

    for period in Period::ALL {
        create_record(
            &mut conn,
            NewTimeRecord {
                user_id: user.id,
                date: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
                period,
                hours: 2.0,
                project_name: "Alpha".to_string(),
                description: None,
                is_manual: true,
            },
        )
        .await
        .unwrap();
    }
    assert_eq!(count_records_for_user(&mut conn, user.id).await.unwrap(), 2);

    let rows = delete_user(&mut conn, user.id).await.unwrap();
    assert_eq!(rows, 1);

    assert_eq!(count_records_for_user(&mut conn, user.id).await.unwrap(), 0);
    assert_eq!(test_db.count_rows("time_records").await, 0);
    assert_eq!(delete_user(&mut conn, user.id).await.unwrap(), 0, "Second delete finds nothing");
}
