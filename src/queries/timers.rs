use crate::{
    error::{Error, Result},
    models::timers::ActiveTimer,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::DbConn;

const TIMER_COLUMNS: &str = "user_id, started_at, project_name, created_at";

/// Inserts the user's timer. Fails with `Conflict` when one is already running.
pub async fn create_timer(
    conn: &mut DbConn,
    user_id: Uuid,
    started_at: DateTime<Utc>,
    project_name: &str,
) -> Result<ActiveTimer> {
    let timer = sqlx::query_as::<_, ActiveTimer>(&format!(
        r#"
        INSERT INTO active_timers (user_id, started_at, project_name, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING {TIMER_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(started_at)
    .bind(project_name)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
    .map_err(|e| {
        let error_msg = e.to_string().to_lowercase();
        if error_msg.contains("unique") || error_msg.contains("primary key") {
            Error::Conflict("A timer is already running".to_string())
        } else {
            Error::Sqlx(e)
        }
    })?;

    Ok(timer)
}

/// Gets the user's running timer, if any.
pub async fn get_timer(conn: &mut DbConn, user_id: Uuid) -> Result<Option<ActiveTimer>> {
    let timer = sqlx::query_as::<_, ActiveTimer>(&format!(
        "SELECT {TIMER_COLUMNS} FROM active_timers WHERE user_id = ?"
    ))
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(timer)
}

/// Removes and returns the user's running timer in one statement.
pub async fn take_timer(conn: &mut DbConn, user_id: Uuid) -> Result<Option<ActiveTimer>> {
    let timer = sqlx::query_as::<_, ActiveTimer>(&format!(
        "DELETE FROM active_timers WHERE user_id = ? RETURNING {TIMER_COLUMNS}"
    ))
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(timer)
}
