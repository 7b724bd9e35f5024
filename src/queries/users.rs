use crate::{
    error::{Error, Result, ValidationErrors},
    models::users::{NewUser, Role, UpdateUser, User},
};
use chrono::Utc;
use uuid::Uuid;

use crate::DbConn;

const USER_COLUMNS: &str = "id, username, password_hash, display_name, timezone, role, created_at";

/// Creates a new user in the database.
pub async fn create_user(conn: &mut DbConn, new_user: NewUser) -> Result<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, username, password_hash, display_name, timezone, role, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Uuid::now_v7())
    .bind(&new_user.username)
    .bind(&new_user.password_hash)
    .bind(&new_user.display_name)
    .bind(&new_user.timezone)
    .bind(new_user.role)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
    .map_err(|e| {
        let error_msg = e.to_string().to_lowercase();

        // Check for unique constraint violations
        if error_msg.contains("unique") || error_msg.contains("users.username") {
            Error::Validation(ValidationErrors::Single {
                field: "username".to_string(),
                message: "Username already exists".to_string(),
            })
        } else {
            Error::Sqlx(e)
        }
    })?;

    Ok(user)
}

/// Gets a single user by their ID. The user may not exist.
pub async fn get_user_by_id(conn: &mut DbConn, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(user)
}

/// Gets a single user by their login name. The user may not exist.
pub async fn get_user_by_username(conn: &mut DbConn, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(user)
}

/// Lists all users, oldest first.
pub async fn list_users(conn: &mut DbConn) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, username ASC"
    ))
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(users)
}

/// Lists users whose role differs from `excluded`, ordered by login name.
pub async fn list_users_excluding_role(conn: &mut DbConn, excluded: Role) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE role <> ? ORDER BY username ASC"
    ))
    .bind(excluded)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(users)
}

/// Counts every account.
pub async fn count_users(conn: &mut DbConn) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(conn)
        .await
        .map_err(Error::Sqlx)?;

    Ok(count)
}

/// Updates display name and/or time zone, leaving `None` fields untouched.
pub async fn update_user(conn: &mut DbConn, id: Uuid, update: UpdateUser) -> Result<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET display_name = COALESCE(?, display_name),
            timezone = COALESCE(?, timezone)
        WHERE id = ?
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(update.display_name)
    .bind(update.timezone)
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?
    .ok_or_else(|| Error::NotFound(format!("User with ID {} not found", id)))?;

    Ok(user)
}

/// Updates a user's password hash.
pub async fn update_user_password(
    conn: &mut DbConn,
    user_id: Uuid,
    password_hash: &str,
) -> Result<()> {
    let rows_affected = sqlx::query(
        r#"
        UPDATE users
        SET password_hash = ?
        WHERE id = ?
        "#,
    )
    .bind(password_hash)
    .bind(user_id)
    .execute(conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    if rows_affected == 0 {
        return Err(Error::NotFound(format!("User with ID {} not found", user_id)));
    }

    Ok(())
}

/// Deletes a user by their ID. Records, sessions and timers cascade.
pub async fn delete_user(conn: &mut DbConn, id: Uuid) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    Ok(rows_affected)
}
