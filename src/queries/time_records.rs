use crate::{
    error::{Error, Result},
    models::time_records::{NewTimeRecord, RecordFields, TimeRecord},
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::DbConn;

const RECORD_COLUMNS: &str =
    "id, user_id, date, period, hours, project_name, description, is_manual, created_at";

/// Inserts a record.
pub async fn create_record(conn: &mut DbConn, new_record: NewTimeRecord) -> Result<TimeRecord> {
    let record = sqlx::query_as::<_, TimeRecord>(&format!(
        r#"
        INSERT INTO time_records
            (id, user_id, date, period, hours, project_name, description, is_manual, created_at)
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {RECORD_COLUMNS}
        "#
    ))
    .bind(Uuid::now_v7())
    .bind(new_record.user_id)
    .bind(new_record.date)
    .bind(new_record.period)
    .bind(new_record.hours)
    .bind(&new_record.project_name)
    .bind(&new_record.description)
    .bind(new_record.is_manual)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(record)
}

/// Gets a single record by ID. The record may not exist.
pub async fn get_record_by_id(conn: &mut DbConn, id: Uuid) -> Result<Option<TimeRecord>> {
    let record = sqlx::query_as::<_, TimeRecord>(&format!(
        "SELECT {RECORD_COLUMNS} FROM time_records WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(record)
}

/// Lists a user's records dated within `[from, to]`, ordered by date, period, then entry order.
pub async fn list_records_in_range(
    conn: &mut DbConn,
    user_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<TimeRecord>> {
    let records = sqlx::query_as::<_, TimeRecord>(&format!(
        r#"
        SELECT {RECORD_COLUMNS}
        FROM time_records
        WHERE user_id = ? AND date BETWEEN ? AND ?
        ORDER BY date ASC,
                 CASE period WHEN 'morning' THEN 0 ELSE 1 END ASC,
                 created_at ASC
        "#
    ))
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(records)
}

/// Lists a user's records for one day.
pub async fn list_records_on(
    conn: &mut DbConn,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<TimeRecord>> {
    list_records_in_range(conn, user_id, date, date).await
}

/// Overwrites the editable fields of a record.
pub async fn update_record(
    conn: &mut DbConn,
    id: Uuid,
    fields: &RecordFields,
) -> Result<TimeRecord> {
    let record = sqlx::query_as::<_, TimeRecord>(&format!(
        r#"
        UPDATE time_records
        SET date = ?, period = ?, hours = ?, project_name = ?, description = ?
        WHERE id = ?
        RETURNING {RECORD_COLUMNS}
        "#
    ))
    .bind(fields.date)
    .bind(fields.period)
    .bind(fields.hours)
    .bind(&fields.project_name)
    .bind(&fields.description)
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?
    .ok_or_else(|| Error::NotFound(format!("Record with ID {} not found", id)))?;

    Ok(record)
}

/// Deletes a record by ID.
pub async fn delete_record(conn: &mut DbConn, id: Uuid) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM time_records
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

/// Counts all records owned by a user.
pub async fn count_records_for_user(conn: &mut DbConn, user_id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM time_records WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(conn)
        .await
        .map_err(Error::Sqlx)?;

    Ok(count)
}
