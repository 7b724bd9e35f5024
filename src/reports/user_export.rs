use super::{
    ReportFile, cell_format, format_hours, summary::write_header_row, text_format,
    user_report_file_name,
};
use crate::{
    error::Result,
    models::{time_records::TimeRecord, weekly::Week},
};
use rust_xlsxwriter::{Format, RowNum, Workbook, Worksheet};

pub const SUBTOTAL_LABEL: &str = "统计信息";

const COLUMNS: [(&str, f64); 6] = [
    ("日期", 12.0),
    ("用户", 15.0),
    ("时段", 8.0),
    ("工时", 8.0),
    ("工作内容", 30.0),
    ("补充说明", 40.0),
];

/// Sheet name for the admin export, e.g. `2026-10-12周报表`
pub fn export_sheet_name(week: &Week) -> String {
    format!("{}周报表", week.start.format("%Y-%m-%d"))
}

/// Row where the subtotal block starts: one blank row after the data.
pub fn subtotal_row(record_count: usize) -> RowNum {
    record_count as RowNum + 2
}

/// Record listing for one member with a subtotal block underneath.
pub fn build_member_export(name: &str, week: &Week, records: &[TimeRecord]) -> Result<ReportFile> {
    let cell = cell_format();
    let text = text_format();
    let bold = Format::new().set_bold();

    let mut sheet = Worksheet::new();
    sheet.set_name(export_sheet_name(week))?;
    write_header_row(&mut sheet, &COLUMNS)?;

    for (row, record) in (1..).zip(records) {
        sheet.write_string_with_format(row, 0, record.date.format("%Y-%m-%d").to_string(), &cell)?;
        sheet.write_string_with_format(row, 1, name, &cell)?;
        sheet.write_string_with_format(row, 2, record.period.sheet_label(), &cell)?;
        sheet.write_number_with_format(row, 3, record.hours, &cell)?;
        sheet.write_string_with_format(row, 4, &record.project_name, &text)?;
        let description = record.description.as_deref().unwrap_or_default();
        sheet.write_string_with_format(row, 5, description, &text)?;
    }

    let total: f64 = records.iter().map(|r| r.hours).sum();
    let row = subtotal_row(records.len());
    sheet.write_string_with_format(row, 0, SUBTOTAL_LABEL, &bold)?;
    sheet.write_string(row + 1, 0, name)?;
    sheet.write_string(row + 1, 1, format!("{}小时", format_hours(total)))?;

    let mut workbook = Workbook::new();
    workbook.push_worksheet(sheet);
    let bytes = workbook.save_to_buffer()?;

    Ok(ReportFile {
        file_name: user_report_file_name(name, week),
        bytes,
    })
}
