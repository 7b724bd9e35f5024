use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::{
        time_records::{NewTimeRecord, Period, RecordFields, TimeRecord},
        users::User,
    },
    queries::time_records,
};
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// A single day's records with per-period sums
#[derive(Debug, Clone, Serialize)]
pub struct DailyOverview {
    pub date: NaiveDate,
    pub records: Vec<TimeRecord>,
    pub morning_hours: f64,
    pub afternoon_hours: f64,
    pub total_hours: f64,
}

/// Sums `hours` of the records in `period`
pub fn sum_hours<'a>(records: impl IntoIterator<Item = &'a TimeRecord>, period: Period) -> f64 {
    records
        .into_iter()
        .filter(|record| record.period == period)
        .map(|record| record.hours)
        .sum()
}

/// Stores a typed entry for `user`
pub async fn create_manual_record(
    conn: &mut DbConn,
    user: &User,
    fields: RecordFields,
) -> Result<TimeRecord> {
    let record = time_records::create_record(
        conn,
        NewTimeRecord {
            user_id: user.id,
            date: fields.date,
            period: fields.period,
            hours: fields.hours,
            project_name: fields.project_name,
            description: fields.description,
            is_manual: true,
        },
    )
    .await?;

    tracing::info!(
        user_id = %user.id,
        record_id = %record.id,
        hours = record.hours,
        "Manual record added"
    );
    Ok(record)
}

/// Loads a record and checks that `user` owns it
pub async fn get_owned_record(
    conn: &mut DbConn,
    user: &User,
    record_id: Uuid,
) -> Result<TimeRecord> {
    let record = time_records::get_record_by_id(conn, record_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Record with ID {} not found", record_id)))?;

    if record.user_id != user.id {
        tracing::warn!(
            user_id = %user.id,
            record_id = %record_id,
            "Rejected access to another user's record"
        );
        return Err(Error::Forbidden("You do not have access to this record".to_string()));
    }

    Ok(record)
}

/// Replaces the editable fields of a record owned by `user`
pub async fn update_record(
    conn: &mut DbConn,
    user: &User,
    record_id: Uuid,
    fields: RecordFields,
) -> Result<TimeRecord> {
    get_owned_record(conn, user, record_id).await?;
    let record = time_records::update_record(conn, record_id, &fields).await?;

    tracing::info!(user_id = %user.id, record_id = %record_id, "Record updated");
    Ok(record)
}

/// Deletes a record owned by `user`
pub async fn delete_record(conn: &mut DbConn, user: &User, record_id: Uuid) -> Result<()> {
    get_owned_record(conn, user, record_id).await?;
    time_records::delete_record(conn, record_id).await?;

    tracing::info!(user_id = %user.id, record_id = %record_id, "Record deleted");
    Ok(())
}

/// Records and sums for one day
pub async fn daily_overview(
    conn: &mut DbConn,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<DailyOverview> {
    let records = time_records::list_records_on(conn, user_id, date).await?;
    let morning_hours = sum_hours(&records, Period::Morning);
    let afternoon_hours = sum_hours(&records, Period::Afternoon);

    Ok(DailyOverview {
        date,
        records,
        morning_hours,
        afternoon_hours,
        total_hours: morning_hours + afternoon_hours,
    })
}
