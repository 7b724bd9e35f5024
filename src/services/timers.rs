//! Start/stop timer bookkeeping and the conversion of elapsed time into a record.

use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::{
        time_records::{NewTimeRecord, Period},
        timers::{ActiveTimer, StopTimer, TimerStopResult},
        users::User,
    },
    queries::{time_records, timers},
    validation::normalize_project_name,
};
use chrono::{DateTime, NaiveDate, TimeDelta, Timelike, Utc};
use chrono_tz::Tz;
use sqlx::Connection;

pub const MIN_TIMER_HOURS: f64 = 0.5;
pub const MAX_TIMER_HOURS: f64 = 8.0;

/// Elapsed time in hours, rounded to the nearest half hour and clamped to
/// `[MIN_TIMER_HOURS, MAX_TIMER_HOURS]`. Exact ties go to the even multiple.
pub fn timer_hours(elapsed: TimeDelta) -> f64 {
    let hours = elapsed.num_milliseconds() as f64 / 3_600_000.0;
    let rounded = (hours * 2.0).round_ties_even() / 2.0;
    rounded.clamp(MIN_TIMER_HOURS, MAX_TIMER_HOURS)
}

/// Local date and half-day of `stop` in zone `tz`.
pub fn classify_stop(stop: DateTime<Utc>, tz: Tz) -> (NaiveDate, Period) {
    let local = stop.with_timezone(&tz);
    let period = if local.hour() < 12 {
        Period::Morning
    } else {
        Period::Afternoon
    };

    (local.date_naive(), period)
}

/// Starts a timer for `user` at `now`. A second start while one runs is a conflict.
pub async fn start_timer(
    conn: &mut DbConn,
    user: &User,
    project_name: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ActiveTimer> {
    let project_name = normalize_project_name(project_name.unwrap_or_default())?;
    let timer = timers::create_timer(conn, user.id, now, &project_name).await?;

    tracing::info!(user_id = %user.id, project = %timer.project_name, "Timer started");
    Ok(timer)
}

/// The user's running timer, if any
pub async fn current_timer(conn: &mut DbConn, user: &User) -> Result<Option<ActiveTimer>> {
    timers::get_timer(conn, user.id).await
}

/// Stops the user's timer at `now` and stores the derived record.
///
/// Consuming the timer and inserting the record happen in one transaction.
pub async fn stop_timer(
    conn: &mut DbConn,
    user: &User,
    request: StopTimer,
    now: DateTime<Utc>,
) -> Result<TimerStopResult> {
    let mut tx = conn.begin().await.map_err(Error::Sqlx)?;

    let timer = timers::take_timer(&mut tx, user.id)
        .await?
        .ok_or_else(|| Error::TimerNotRunning("No timer has been started".to_string()))?;

    let hours = timer_hours(now - timer.started_at);
    let (date, period) = classify_stop(now, user.tz());
    let description = request
        .description
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    let record = time_records::create_record(
        &mut tx,
        NewTimeRecord {
            user_id: user.id,
            date,
            period,
            hours,
            project_name: timer.project_name.clone(),
            description,
            is_manual: false,
        },
    )
    .await?;

    tx.commit().await.map_err(Error::Sqlx)?;

    tracing::info!(
        user_id = %user.id,
        record_id = %record.id,
        hours,
        period = %period,
        "Timer stopped"
    );

    Ok(TimerStopResult {
        record,
        hours,
        project_name: timer.project_name,
    })
}
