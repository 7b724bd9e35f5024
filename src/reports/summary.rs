use super::{
    ReportFile, SheetNames, all_members_file_name, cell_format, format_hours, table_header_format,
    text_format,
};
use crate::{
    error::Result,
    models::{
        time_records::TimeRecord,
        weekly::{Week, WeeklySummary},
    },
};
use rust_xlsxwriter::{Format, RowNum, Workbook, Worksheet};

pub const SUMMARY_SHEET_NAME: &str = "工时汇总";

const SUMMARY_COLUMNS: [(&str, f64); 3] =
    [("用户", 15.0), ("周工时", 10.0), ("日均工时", 10.0)];
const DETAIL_COLUMNS: [(&str, f64); 5] = [
    ("日期", 12.0),
    ("时段", 8.0),
    ("工时", 8.0),
    ("工作内容", 30.0),
    ("补充说明", 40.0),
];

/// One member's week, as fed to the all-members workbook
#[derive(Debug, Clone)]
pub struct MemberWeek {
    pub name: String,
    pub summary: WeeklySummary,
    pub records: Vec<TimeRecord>,
}

impl MemberWeek {
    /// Week total as shown on the summary sheet; a week without records reads `0h`.
    fn total_label(&self) -> String {
        if self.records.is_empty() {
            "0h".to_string()
        } else {
            format!("{}h", format_hours(self.summary.week_total))
        }
    }
}

pub(crate) fn write_header_row(sheet: &mut Worksheet, columns: &[(&str, f64)]) -> Result<()> {
    let header = table_header_format();
    for (col, (label, width)) in columns.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *label, &header)?;
        sheet.set_column_width(col, *width)?;
    }
    Ok(())
}

fn summary_sheet(members: &[MemberWeek]) -> Result<Worksheet> {
    let cell = cell_format();
    let mut sheet = Worksheet::new();
    sheet.set_name(SUMMARY_SHEET_NAME)?;
    write_header_row(&mut sheet, &SUMMARY_COLUMNS)?;

    for (row, member) in (1..).zip(members) {
        let total = member.total_label();
        let average = format!("{:.1}h", member.summary.average_per_working_day());
        sheet.write_string_with_format(row, 0, &member.name, &cell)?;
        sheet.write_string_with_format(row, 1, &total, &cell)?;
        sheet.write_string_with_format(row, 2, &average, &cell)?;
    }

    Ok(sheet)
}

fn write_detail_row(
    sheet: &mut Worksheet,
    row: RowNum,
    record: &TimeRecord,
    cell: &Format,
    text: &Format,
) -> Result<()> {
    sheet.write_string_with_format(row, 0, record.date.format("%Y-%m-%d").to_string(), cell)?;
    sheet.write_string_with_format(row, 1, record.period.sheet_label(), cell)?;
    sheet.write_string_with_format(row, 2, format!("{}h", format_hours(record.hours)), cell)?;
    sheet.write_string_with_format(row, 3, &record.project_name, text)?;
    let description = record.description.as_deref().unwrap_or_default();
    sheet.write_string_with_format(row, 4, description, text)?;
    Ok(())
}

fn member_sheet(sheet_name: &str, member: &MemberWeek) -> Result<Worksheet> {
    let cell = cell_format();
    let text = text_format();
    let mut sheet = Worksheet::new();
    sheet.set_name(sheet_name)?;
    write_header_row(&mut sheet, &DETAIL_COLUMNS)?;

    for (row, record) in (1..).zip(&member.records) {
        write_detail_row(&mut sheet, row, record, &cell, &text)?;
    }

    Ok(sheet)
}

/// Summary sheet plus one detail sheet per member, in the given order.
pub fn build_all_members_report(week: &Week, members: &[MemberWeek]) -> Result<ReportFile> {
    let mut names = SheetNames::new();
    names.claim(SUMMARY_SHEET_NAME);

    let mut workbook = Workbook::new();
    workbook.push_worksheet(summary_sheet(members)?);
    for member in members {
        let sheet_name = names.claim(&member.name);
        workbook.push_worksheet(member_sheet(&sheet_name, member)?);
    }
    let bytes = workbook.save_to_buffer()?;

    Ok(ReportFile {
        file_name: all_members_file_name(week),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::time_records::Period, services::weekly::summarize};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    #[test]
    fn test_build_all_members_report_with_clashing_names() {
        let week = Week::containing(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(), 0).unwrap();
        let records = vec![TimeRecord {
            id: Uuid::now_v7(),
            user_id: Uuid::nil(),
            date: week.start,
            period: Period::Morning,
            hours: 4.0,
            project_name: "Alpha".to_string(),
            description: Some("kickoff".to_string()),
            is_manual: true,
            created_at: Utc::now(),
        }];
        let member = |name: &str| MemberWeek {
            name: name.to_string(),
            summary: summarize(&week, &records),
            records: records.clone(),
        };

        // "工时汇总" as a member name must not collide with the summary sheet
        let members = vec![member("bob"), member("Bob"), member(SUMMARY_SHEET_NAME)];
        let report = build_all_members_report(&week, &members).unwrap();
        assert_eq!(report.file_name, "全员工时统计_20261012.xlsx");
        assert!(report.bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_total_label_for_idle_member() {
        let week = Week::containing(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(), 0).unwrap();
        let idle = MemberWeek {
            name: "idle".to_string(),
            summary: summarize(&week, &[]),
            records: Vec::new(),
        };
        assert_eq!(idle.total_label(), "0h");
        assert_eq!(format!("{:.1}h", idle.summary.average_per_working_day()), "0.0h");
    }
}
