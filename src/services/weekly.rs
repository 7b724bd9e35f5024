use crate::DbConn;
use crate::{
    error::{Error, Result},
    models::{
        time_records::{Period, TimeRecord},
        weekly::{DayAggregate, Week, WeeklySummary},
    },
    queries::time_records,
};
use chrono::{Local, NaiveDate};
use uuid::Uuid;

/// Resolves a week offset against the server's local date
pub fn resolve_week(offset: i64) -> Result<Week> {
    resolve_week_from(Local::now().date_naive(), offset)
}

pub fn resolve_week_from(today: NaiveDate, offset: i64) -> Result<Week> {
    Week::containing(today, offset)
        .ok_or_else(|| Error::validation("week", "Week offset is out of range"))
}

/// Folds records into seven per-day aggregates.
///
/// Records dated outside `week` are ignored.
pub fn summarize(week: &Week, records: &[TimeRecord]) -> WeeklySummary {
    let mut days: Vec<DayAggregate> = week.dates().into_iter().map(DayAggregate::empty).collect();

    for record in records {
        let Some(day) = days.iter_mut().find(|day| day.date == record.date) else {
            continue;
        };
        match record.period {
            Period::Morning => day.morning_hours += record.hours,
            Period::Afternoon => day.afternoon_hours += record.hours,
        }
    }

    for day in &mut days {
        day.total_hours = day.morning_hours + day.afternoon_hours;
    }
    let week_total = days.iter().map(|day| day.total_hours).sum();

    WeeklySummary {
        week: *week,
        days,
        week_total,
    }
}

/// All records of `user_id` within `week`, ordered by date then period
pub async fn weekly_records(
    conn: &mut DbConn,
    user_id: Uuid,
    week: &Week,
) -> Result<Vec<TimeRecord>> {
    time_records::list_records_in_range(conn, user_id, week.start, week.end()).await
}

pub async fn weekly_summary(
    conn: &mut DbConn,
    user_id: Uuid,
    week: &Week,
) -> Result<WeeklySummary> {
    let records = weekly_records(conn, user_id, week).await?;
    Ok(summarize(week, &records))
}
