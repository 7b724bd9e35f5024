use chrono::{Datelike, Days, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

/// Fixed divisor for the per-day average, regardless of how many days have records.
pub const WORKING_DAYS_PER_WEEK: f64 = 5.0;

/// A Monday-to-Sunday span addressed by its offset from the current week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub offset: i64,
    pub start: NaiveDate,
}

impl Week {
    /// The week containing `today`, shifted by `offset` whole weeks.
    ///
    /// Returns `None` when the shifted range falls outside the supported calendar.
    pub fn containing(today: NaiveDate, offset: i64) -> Option<Self> {
        let days_since_monday = u64::from(today.weekday().num_days_from_monday());
        let monday = today.checked_sub_days(Days::new(days_since_monday))?;
        let start = monday.checked_add_signed(TimeDelta::try_weeks(offset)?)?;
        // the whole span has to be representable
        start.checked_add_days(Days::new(6))?;
        Some(Self { offset, start })
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Days::new(6)
    }

    /// The seven dates, Monday first.
    pub fn dates(&self) -> [NaiveDate; 7] {
        std::array::from_fn(|i| self.start + Days::new(i as u64))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }

    /// `YYYYMMDD-YYYYMMDD`, used in export file names.
    pub fn compact_range(&self) -> String {
        format!(
            "{}-{}",
            self.start.format("%Y%m%d"),
            self.end().format("%Y%m%d")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAggregate {
    pub date: NaiveDate,
    pub morning_hours: f64,
    pub afternoon_hours: f64,
    pub total_hours: f64,
}

impl DayAggregate {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            morning_hours: 0.0,
            afternoon_hours: 0.0,
            total_hours: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub week: Week,
    /// Exactly seven entries, Monday first
    pub days: Vec<DayAggregate>,
    pub week_total: f64,
}

impl WeeklySummary {
    pub fn average_per_working_day(&self) -> f64 {
        self.week_total / WORKING_DAYS_PER_WEEK
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayAggregate> {
        self.days.iter().find(|day| day.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_current_week_starts_on_monday() {
        // 2026-10-16 is a Friday
        let week = Week::containing(date(2026, 10, 16), 0).unwrap();
        assert_eq!(week.start, date(2026, 10, 12));
        assert_eq!(week.start.weekday(), Weekday::Mon);
        assert_eq!(week.end(), date(2026, 10, 18));
        assert_eq!(week.end().weekday(), Weekday::Sun);
    }

    #[test]
    fn test_monday_and_sunday_map_to_same_week() {
        let from_monday = Week::containing(date(2026, 10, 12), 0).unwrap();
        let from_sunday = Week::containing(date(2026, 10, 18), 0).unwrap();
        assert_eq!(from_monday.start, from_sunday.start);
    }

    #[test]
    fn test_offsets_shift_whole_weeks() {
        let today = date(2026, 10, 16);
        assert_eq!(Week::containing(today, -1).unwrap().start, date(2026, 10, 5));
        assert_eq!(Week::containing(today, 2).unwrap().start, date(2026, 10, 26));
        // crossing a year boundary
        assert_eq!(Week::containing(date(2027, 1, 1), 0).unwrap().start, date(2026, 12, 28));
    }

    #[test]
    fn test_absurd_offset_is_rejected() {
        assert!(Week::containing(date(2026, 10, 16), i64::MAX).is_none());
        assert!(Week::containing(date(2026, 10, 16), 100_000_000).is_none());
    }

    #[test]
    fn test_dates_and_contains() {
        let week = Week::containing(date(2026, 10, 16), 0).unwrap();
        let dates = week.dates();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], date(2026, 10, 12));
        assert_eq!(dates[6], date(2026, 10, 18));
        assert!(week.contains(date(2026, 10, 18)));
        assert!(!week.contains(date(2026, 10, 19)));
        assert!(!week.contains(date(2026, 10, 11)));
    }

    #[test]
    fn test_compact_range() {
        let week = Week::containing(date(2026, 10, 16), 0).unwrap();
        assert_eq!(week.compact_range(), "20261012-20261018");
    }
}
