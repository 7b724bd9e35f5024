use crate::{
    error::{Error, Result},
    models::users::{NewUserSession, UserSession},
};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::DbConn;

const SESSION_COLUMNS: &str = "id, user_id, token_hash, expires_at, created_at, updated_at";

/// Hash a session token using SHA-256 for secure storage
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Creates a new user session in the database.
pub async fn create_session(conn: &mut DbConn, new_session: NewUserSession) -> Result<UserSession> {
    let now = Utc::now();
    let session = sqlx::query_as::<_, UserSession>(&format!(
        r#"
        INSERT INTO user_sessions (id, user_id, token_hash, expires_at, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(Uuid::now_v7())
    .bind(new_session.user_id)
    .bind(&new_session.token_hash)
    .bind(new_session.expires_at)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(session)
}

/// Gets a single session by its token hash. The session may not exist.
pub async fn get_session_by_token_hash(
    conn: &mut DbConn,
    token_hash: &str,
) -> Result<Option<UserSession>> {
    let session = sqlx::query_as::<_, UserSession>(&format!(
        "SELECT {SESSION_COLUMNS} FROM user_sessions WHERE token_hash = ?"
    ))
    .bind(token_hash)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(session)
}

/// Deletes a session by its token hash.
pub async fn delete_session_by_token_hash(conn: &mut DbConn, token_hash: &str) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM user_sessions
        WHERE token_hash = ?
        "#,
    )
    .bind(token_hash)
    .execute(conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    Ok(rows_affected)
}

/// Deletes every session that expired before `now`.
pub async fn delete_expired_sessions(conn: &mut DbConn, now: DateTime<Utc>) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM user_sessions
        WHERE expires_at < ?
        "#,
    )
    .bind(now)
    .execute(conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    Ok(rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_session_token_is_stable_hex() {
        let first = hash_session_token("abc");
        assert_eq!(first, hash_session_token("abc"));
        assert_eq!(first.len(), 64);
        assert_ne!(first, hash_session_token("abd"));
    }
}
