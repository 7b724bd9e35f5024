//! Askama page templates and the display rows they iterate over.
//!
//! Templates only loop and print; every value is formatted here.

use askama::Template;
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use crate::{
    models::{
        time_records::{Period, RecordForm, TimeRecord},
        timers::ActiveTimer,
        users::User,
        weekly::{Week, WeeklySummary},
    },
    reports::format_hours,
    services::time_records::DailyOverview,
};

/// Zones listed first in the profile form
pub const COMMON_TIMEZONES: [&str; 9] = [
    "Asia/Shanghai",
    "Asia/Hong_Kong",
    "Asia/Taipei",
    "Asia/Tokyo",
    "Asia/Singapore",
    "US/Pacific",
    "US/Eastern",
    "Europe/London",
    "Europe/Paris",
];

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub struct Nav {
    pub name: String,
    pub is_admin: bool,
}

impl Nav {
    pub fn for_user(user: &User) -> Self {
        Self {
            name: user.name().to_string(),
            is_admin: user.is_admin(),
        }
    }
}

pub struct RecordRow {
    pub id: String,
    pub date: String,
    pub period: &'static str,
    pub hours: String,
    pub project_name: String,
    pub description: String,
    pub source: &'static str,
}

impl From<&TimeRecord> for RecordRow {
    fn from(record: &TimeRecord) -> Self {
        Self {
            id: record.id.to_string(),
            date: record.date.format("%Y-%m-%d").to_string(),
            period: record.period.label(),
            hours: format_hours(record.hours),
            project_name: record.project_name.clone(),
            description: record.description.clone().unwrap_or_default(),
            source: if record.is_manual { "Manual" } else { "Timer" },
        }
    }
}

pub struct DayRow {
    pub date: String,
    pub weekday: &'static str,
    pub is_today: bool,
    pub morning: String,
    pub afternoon: String,
    pub total: String,
    pub records: Vec<RecordRow>,
}

/// One row per day of `summary`, each carrying that day's records.
pub fn day_rows(summary: &WeeklySummary, records: &[TimeRecord], today: NaiveDate) -> Vec<DayRow> {
    summary
        .days
        .iter()
        .map(|day| DayRow {
            date: day.date.format("%m-%d").to_string(),
            weekday: WEEKDAYS[day.date.weekday().num_days_from_monday() as usize],
            is_today: day.date == today,
            morning: format_hours(day.morning_hours),
            afternoon: format_hours(day.afternoon_hours),
            total: format_hours(day.total_hours),
            records: records
                .iter()
                .filter(|record| record.date == day.date)
                .map(RecordRow::from)
                .collect(),
        })
        .collect()
}

/// Previous/next links around a week
pub struct WeekNav {
    pub offset: i64,
    pub label: String,
    pub prev_offset: i64,
    pub next_offset: i64,
}

impl WeekNav {
    pub fn new(week: &Week) -> Self {
        Self {
            offset: week.offset,
            label: format!(
                "{} to {}",
                week.start.format("%Y-%m-%d"),
                week.end().format("%Y-%m-%d")
            ),
            prev_offset: week.offset.saturating_sub(1),
            next_offset: week.offset.saturating_add(1),
        }
    }
}

pub struct TimerView {
    pub project_name: String,
    pub started_local: String,
    pub started_at: String,
}

impl TimerView {
    pub fn new(timer: &ActiveTimer, tz: Tz) -> Self {
        Self {
            project_name: timer.project_name.clone(),
            started_local: timer.started_at.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string(),
            started_at: timer.started_at.to_rfc3339(),
        }
    }
}

pub struct PeriodOption {
    pub value: String,
    pub label: &'static str,
    pub selected: bool,
}

pub fn period_options(selected: &str) -> Vec<PeriodOption> {
    Period::ALL
        .iter()
        .map(|period| {
            let value = period.to_string();
            PeriodOption {
                selected: value == selected,
                label: period.label(),
                value,
            }
        })
        .collect()
}

pub struct MemberOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub created_at: String,
    pub is_self: bool,
}

impl UserRow {
    pub fn new(user: &User, actor: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            display_name: user.display_name.clone().unwrap_or_default(),
            role: user.role.to_string(),
            created_at: user
                .created_at
                .with_timezone(&actor.tz())
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            is_self: user.id == actor.id,
        }
    }
}

pub struct TimezoneOption {
    pub name: &'static str,
    pub selected: bool,
}

/// Common zones first, then every other IANA zone alphabetically.
pub fn timezone_options(selected: &str) -> Vec<TimezoneOption> {
    let mut rest: Vec<&'static str> = chrono_tz::TZ_VARIANTS
        .iter()
        .map(|tz| tz.name())
        .filter(|name| !COMMON_TIMEZONES.contains(name))
        .collect();
    rest.sort_unstable();

    COMMON_TIMEZONES
        .iter()
        .copied()
        .chain(rest)
        .map(|name| TimezoneOption {
            name,
            selected: name == selected,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub nav: Nav,
    pub today: String,
    pub records: Vec<RecordRow>,
    pub morning: String,
    pub afternoon: String,
    pub total: String,
    pub timer: Option<TimerView>,
}

impl DashboardTemplate {
    pub fn new(user: &User, overview: &DailyOverview, timer: Option<&ActiveTimer>) -> Self {
        Self {
            nav: Nav::for_user(user),
            today: overview.date.format("%Y-%m-%d").to_string(),
            records: overview.records.iter().map(RecordRow::from).collect(),
            morning: format_hours(overview.morning_hours),
            afternoon: format_hours(overview.afternoon_hours),
            total: format_hours(overview.total_hours),
            timer: timer.map(|timer| TimerView::new(timer, user.tz())),
        }
    }
}

#[derive(Template)]
#[template(path = "record_form.html")]
pub struct RecordFormTemplate {
    pub nav: Nav,
    pub heading: &'static str,
    pub action: String,
    pub form: RecordForm,
    pub periods: Vec<PeriodOption>,
    pub description: String,
    pub next: String,
    pub error: Option<String>,
}

impl RecordFormTemplate {
    pub fn new(
        user: &User,
        heading: &'static str,
        action: String,
        form: RecordForm,
        error: Option<String>,
    ) -> Self {
        Self {
            nav: Nav::for_user(user),
            heading,
            action,
            periods: period_options(&form.time_period),
            description: form.description.clone().unwrap_or_default(),
            next: form.next.clone().unwrap_or_default(),
            form,
            error,
        }
    }
}

#[derive(Template)]
#[template(path = "weekly.html")]
pub struct WeeklyTemplate {
    pub nav: Nav,
    pub week: WeekNav,
    pub days: Vec<DayRow>,
    pub week_total: String,
    pub average: String,
}

/// The per-day table shared by the admin page and its AJAX refresh.
#[derive(Template)]
#[template(path = "admin_weekly_table.html")]
pub struct AdminWeeklyTableTemplate {
    pub member_name: String,
    pub days: Vec<DayRow>,
    pub week_total: String,
    pub average: String,
}

#[derive(Template)]
#[template(path = "admin_weekly.html")]
pub struct AdminWeeklyTemplate {
    pub nav: Nav,
    pub week: WeekNav,
    pub members: Vec<MemberOption>,
    pub selected_id: String,
    /// Pre-rendered [`AdminWeeklyTableTemplate`]
    pub table_html: String,
}

#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub nav: Nav,
    pub users: Vec<UserRow>,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub username: String,
    pub display_name: String,
    pub timezones: Vec<TimezoneOption>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl ProfileTemplate {
    pub fn new(user: &User, error: Option<String>, notice: Option<String>) -> Self {
        Self {
            nav: Nav::for_user(user),
            username: user.username.clone(),
            display_name: user.display_name.clone().unwrap_or_default(),
            timezones: timezone_options(&user.timezone),
            error,
            notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::weekly::summarize;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_timezone_options_put_common_zones_first() {
        let options = timezone_options("Europe/Paris");
        assert_eq!(options[0].name, "Asia/Shanghai");
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
        assert_eq!(options.iter().filter(|o| o.name == "Asia/Shanghai").count(), 1);
        assert!(options.iter().any(|o| o.name == "America/New_York"));
    }

    #[test]
    fn test_day_rows_mark_today_and_attach_records() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let week = Week::containing(today, 0).unwrap();
        let records = vec![TimeRecord {
            id: Uuid::now_v7(),
            user_id: Uuid::nil(),
            date: today,
            period: Period::Afternoon,
            hours: 2.5,
            project_name: "Alpha".to_string(),
            description: None,
            is_manual: false,
            created_at: Utc::now(),
        }];

        let rows = day_rows(&summarize(&week, &records), &records, today);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].weekday, "Mon");
        let friday = &rows[4];
        assert!(friday.is_today);
        assert_eq!(friday.afternoon, "2.5");
        assert_eq!(friday.records.len(), 1);
        assert_eq!(friday.records[0].source, "Timer");
    }

    #[test]
    fn test_login_template_escapes_input() {
        let html = LoginTemplate {
            username: "<script>".to_string(),
            error: Some("Invalid username or password".to_string()),
        }
        .render()
        .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("Invalid username or password"));
    }
}
