use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::users::{NewUserSession, User, UserSession},
    queries::{sessions, users},
};
use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

/// Generates an opaque session token: 32 random bytes, hex encoded.
pub fn generate_session_token() -> String {
    let mut rng = rand::rng();
    let mut random_bytes = [0u8; 32];
    rng.fill(&mut random_bytes);
    hex::encode(random_bytes)
}

/// Creates a session for `user_id` and returns the plain token with the stored row.
///
/// Expired sessions are purged first.
pub async fn open_session(
    conn: &mut DbConn,
    user_id: Uuid,
    ttl_hours: i64,
) -> Result<(String, UserSession)> {
    let now = Utc::now();
    let purged = sessions::delete_expired_sessions(conn, now).await?;
    if purged > 0 {
        tracing::debug!(purged, "Expired sessions removed");
    }

    let token = generate_session_token();
    let session = sessions::create_session(
        conn,
        NewUserSession {
            user_id,
            token_hash: sessions::hash_session_token(&token),
            expires_at: now + Duration::hours(ttl_hours),
        },
    )
    .await?;

    Ok((token, session))
}

/// Resolves a session token to its user
pub async fn authenticate_session(conn: &mut DbConn, session_token: &str) -> Result<User> {
    let token = session_token.trim();
    if token.is_empty() {
        return Err(Error::Authentication("Missing session token".to_string()));
    }

    let token_hash = sessions::hash_session_token(token);
    let session = sessions::get_session_by_token_hash(conn, &token_hash)
        .await?
        .ok_or_else(|| Error::Authentication("Session not found".to_string()))?;

    if session.expires_at <= Utc::now() {
        sessions::delete_session_by_token_hash(conn, &token_hash).await?;
        return Err(Error::Authentication("Session expired".to_string()));
    }

    users::get_user_by_id(conn, session.user_id)
        .await?
        .ok_or_else(|| Error::Authentication("User not found".to_string()))
}

/// Revokes a specific session by its token
pub async fn revoke_session_by_token(conn: &mut DbConn, session_token: &str) -> Result<()> {
    // Validate input
    if session_token.trim().is_empty() {
        return Err(Error::validation("session_token", "Session token cannot be empty"));
    }

    // Hash the token for database lookup
    let token_hash = sessions::hash_session_token(session_token.trim());
    let rows_affected = sessions::delete_session_by_token_hash(conn, &token_hash).await?;

    if rows_affected == 0 {
        return Err(Error::Authentication("Session token not found".to_string()));
    }

    Ok(())
}
