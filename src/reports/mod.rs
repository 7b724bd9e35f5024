//! In-memory `.xlsx` workbooks built from weekly records.
//!
//! Every builder returns a [`ReportFile`]: the workbook bytes plus the
//! download name. Nothing touches the filesystem.

pub mod column_plan;
pub mod summary;
pub mod user_export;
pub mod weekly;

use crate::models::weekly::Week;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};
use std::collections::HashSet;

pub use column_plan::{ColumnPlan, ColumnRole, DayColumns};
pub use summary::{MemberWeek, build_all_members_report};
pub use user_export::build_member_export;
pub use weekly::build_weekly_report;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Excel's limit on worksheet name length
pub const MAX_SHEET_NAME_CHARS: usize = 31;

const GRID_HEADER_FILL: u32 = 0xE6E6FA;
const TABLE_HEADER_FILL: u32 = 0xCCE5FF;

/// A finished workbook ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ReportFile {
    /// `Content-Disposition` value carrying both an ASCII fallback name and
    /// the UTF-8 name (RFC 6266 `filename*`).
    pub fn content_disposition(&self) -> String {
        let fallback: String = self
            .file_name
            .chars()
            .map(|c| {
                if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            utf8_percent_encode(&self.file_name, NON_ALPHANUMERIC)
        )
    }
}

/// `{name}-工时统计_{YYYYMMDD}-{YYYYMMDD}.xlsx`
pub fn user_report_file_name(name: &str, week: &Week) -> String {
    format!("{}-工时统计_{}.xlsx", name, week.compact_range())
}

/// `全员工时统计_{YYYYMMDD}.xlsx`, keyed by the week start
pub fn all_members_file_name(week: &Week) -> String {
    format!("全员工时统计_{}.xlsx", week.start.format("%Y%m%d"))
}

/// Hours as shown in text cells: whole values keep one decimal (`5.0`),
/// fractional values print as-is (`2.25`).
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{:.1}", hours)
    } else {
        format!("{}", hours)
    }
}

/// Thin border, centered both ways
pub(crate) fn cell_format() -> Format {
    Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

/// Thin border only, for free-text columns
pub(crate) fn text_format() -> Format {
    Format::new().set_border(FormatBorder::Thin)
}

pub(crate) fn grid_header_format() -> Format {
    cell_format()
        .set_bold()
        .set_background_color(Color::RGB(GRID_HEADER_FILL))
}

pub(crate) fn table_header_format() -> Format {
    cell_format()
        .set_bold()
        .set_background_color(Color::RGB(TABLE_HEADER_FILL))
}

/// Makes `name` usable as a worksheet name: forbidden characters become `_`,
/// surrounding apostrophes are dropped and the result is cut to 31 chars.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('\'');
    let truncated: String = trimmed.chars().take(MAX_SHEET_NAME_CHARS).collect();

    if truncated.trim().is_empty() {
        "Sheet".to_string()
    } else {
        truncated
    }
}

/// Hands out sanitized sheet names that are unique within one workbook.
///
/// Excel compares sheet names case-insensitively.
#[derive(Debug, Default)]
pub struct SheetNames {
    taken: HashSet<String>,
}

impl SheetNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, name: &str) -> String {
        let base = sanitize_sheet_name(name);
        if self.taken.insert(base.to_lowercase()) {
            return base;
        }

        let mut n = 2;
        loop {
            let suffix = format!(" ({})", n);
            let room = MAX_SHEET_NAME_CHARS - suffix.chars().count();
            let candidate: String = base.chars().take(room).chain(suffix.chars()).collect();
            if self.taken.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}
