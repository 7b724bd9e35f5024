use super::{ColumnPlan, ReportFile, cell_format, grid_header_format, user_report_file_name};
use crate::{
    error::Result,
    models::{time_records::TimeRecord, weekly::Week},
};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{RowNum, Workbook, Worksheet};

const TITLE_ROW: RowNum = 0;
const DATE_ROW: RowNum = 1;
const ROLE_ROW: RowNum = 2;
const FIRST_DATA_ROW: RowNum = 3;
const ROW_HEIGHT: f64 = 20.0;
const NAME_WIDTH: f64 = 15.0;

const WEEKDAY_LABELS: [&str; 7] = ["(一)", "(二)", "(三)", "(四)", "(五)", "(六)", "(日)"];

/// Header text for one day, e.g. `10月12日(一)`
pub fn day_header(date: NaiveDate) -> String {
    let weekday = WEEKDAY_LABELS[date.weekday().num_days_from_monday() as usize];
    format!("{}{}", date.format("%m月%d日"), weekday)
}

/// Title row text, e.g. `周工时统计（10.12-10.18）`
pub fn week_title(week: &Week) -> String {
    format!(
        "周工时统计（{}-{}）",
        week.start.format("%m.%d"),
        week.end().format("%m.%d")
    )
}

/// Number of data rows the grid needs: the longest per-period list of any
/// day, and at least one so the name cell has a row.
pub fn data_row_count(plan: &ColumnPlan, records: &[TimeRecord]) -> RowNum {
    plan.days()
        .iter()
        .flat_map(|day| {
            day.roles.iter().map(move |role| {
                records
                    .iter()
                    .filter(|r| r.date == day.date && r.period == role.period())
                    .count()
            })
        })
        .max()
        .unwrap_or(0)
        .max(1) as RowNum
}

/// The per-user weekly grid: one day group per date, each record's project
/// and hours under its period's columns.
pub fn weekly_sheet(name: &str, week: &Week, records: &[TimeRecord]) -> Result<Worksheet> {
    let plan = ColumnPlan::for_week(week);
    let cell = cell_format();
    let header = grid_header_format();
    let last_col = plan.last_col();
    let data_rows = data_row_count(&plan, records);
    let last_row = FIRST_DATA_ROW + data_rows - 1;

    let mut sheet = Worksheet::new();

    // Borders first so merged and written cells override the blanks
    for row in TITLE_ROW..=last_row {
        for col in 0..=last_col {
            sheet.write_blank(row, col, &cell)?;
        }
        sheet.set_row_height(row, ROW_HEIGHT)?;
    }

    sheet.merge_range(TITLE_ROW, 0, TITLE_ROW, last_col, &week_title(week), &header)?;
    sheet.merge_range(DATE_ROW, plan.name_col, ROLE_ROW, plan.name_col, "姓名", &header)?;
    sheet.set_column_width(plan.name_col, NAME_WIDTH)?;

    for day in plan.days() {
        let label = day_header(day.date);
        if day.last_col() > day.first_col {
            sheet.merge_range(DATE_ROW, day.first_col, DATE_ROW, day.last_col(), &label, &header)?;
        } else {
            sheet.write_string_with_format(DATE_ROW, day.first_col, &label, &header)?;
        }

        for (col, role) in day.columns() {
            sheet.write_string_with_format(ROLE_ROW, col, role.label(), &header)?;
            sheet.set_column_width(col, role.width())?;

            let entries = records
                .iter()
                .filter(|r| r.date == day.date && r.period == role.period());
            for (row, record) in (FIRST_DATA_ROW..).zip(entries) {
                if role.is_hours() {
                    sheet.write_number_with_format(row, col, record.hours, &cell)?;
                } else {
                    sheet.write_string_with_format(row, col, &record.project_name, &cell)?;
                }
            }
        }
    }

    if data_rows > 1 {
        sheet.merge_range(FIRST_DATA_ROW, plan.name_col, last_row, plan.name_col, name, &cell)?;
    } else {
        sheet.write_string_with_format(FIRST_DATA_ROW, plan.name_col, name, &cell)?;
    }

    Ok(sheet)
}

/// Single-sheet weekly workbook for one user.
pub fn build_weekly_report(name: &str, week: &Week, records: &[TimeRecord]) -> Result<ReportFile> {
    let mut workbook = Workbook::new();
    workbook.push_worksheet(weekly_sheet(name, week, records)?);
    let bytes = workbook.save_to_buffer()?;

    Ok(ReportFile {
        file_name: user_report_file_name(name, week),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time_records::Period;
    use chrono::Utc;
    use uuid::Uuid;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn record(date: NaiveDate, period: Period, hours: f64, project: &str) -> TimeRecord {
        TimeRecord {
            id: Uuid::now_v7(),
            user_id: Uuid::nil(),
            date,
            period,
            hours,
            project_name: project.to_string(),
            description: None,
            is_manual: true,
            created_at: Utc::now(),
        }
    }

    fn week() -> Week {
        Week::containing(date(16), 0).unwrap()
    }

    #[test]
    fn test_labels() {
        assert_eq!(day_header(date(12)), "10月12日(一)");
        assert_eq!(day_header(date(18)), "10月18日(日)");
        assert_eq!(week_title(&week()), "周工时统计（10.12-10.18）");
    }

    #[test]
    fn test_data_row_count_uses_longest_period_list() {
        let plan = ColumnPlan::for_week(&week());
        assert_eq!(data_row_count(&plan, &[]), 1);

        let records = vec![
            record(date(12), Period::Morning, 1.0, "A"),
            record(date(12), Period::Morning, 1.0, "B"),
            record(date(12), Period::Afternoon, 1.0, "C"),
            record(date(14), Period::Afternoon, 1.0, "D"),
            record(date(14), Period::Afternoon, 1.0, "E"),
            record(date(14), Period::Afternoon, 1.0, "F"),
        ];
        assert_eq!(data_row_count(&plan, &records), 3);
    }

    #[test]
    fn test_build_weekly_report_produces_workbook() {
        let records = vec![
            record(date(13), Period::Morning, 3.5, "A"),
            record(date(13), Period::Afternoon, 2.0, "B"),
        ];
        let report = build_weekly_report("alice", &week(), &records).unwrap();
        assert_eq!(report.file_name, "alice-工时统计_20261012-20261018.xlsx");
        // xlsx files are zip archives
        assert!(report.bytes.starts_with(b"PK"));
    }
}
