//! Input validation utilities for the service layer.
//!
//! Form payloads arrive as raw strings; these functions turn them into typed
//! values or a field-level `Error::Validation`.

use std::str::FromStr;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::error::{Error, Result};
use crate::models::time_records::{Period, RecordFields, RecordForm};

pub const MAX_USERNAME_LENGTH: usize = 80;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 80;
pub const MAX_PROJECT_NAME_LENGTH: usize = 100;
pub const MIN_PASSWORD_LENGTH: usize = 4;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validates a login name
///
/// # Examples
/// ```
/// use workhours::validation::validate_username;
///
/// validate_username("alice").unwrap();
/// assert!(validate_username("").is_err());
/// assert!(validate_username("al ice").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(Error::validation("username", "Username cannot be empty"));
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(Error::validation(
            "username",
            format!("Username is too long (max {} characters)", MAX_USERNAME_LENGTH),
        ));
    }

    if username.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::validation("username", "Username cannot contain spaces"));
    }

    Ok(())
}

/// Validates password length and format
pub fn validate_password(password: &str) -> Result<()> {
    let length = password.chars().count();

    if length < MIN_PASSWORD_LENGTH {
        return Err(Error::validation(
            "password",
            format!("Password must be at least {} characters long", MIN_PASSWORD_LENGTH),
        ));
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(Error::validation(
            "password",
            format!("Password is too long (max {} characters)", MAX_PASSWORD_LENGTH),
        ));
    }

    Ok(())
}

/// Trims an optional display name, mapping blank input to `None`
pub fn normalize_display_name(display_name: Option<&str>) -> Result<Option<String>> {
    let Some(name) = display_name.map(str::trim).filter(|name| !name.is_empty()) else {
        return Ok(None);
    };

    if name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(Error::validation(
            "display_name",
            format!("Display name is too long (max {} characters)", MAX_DISPLAY_NAME_LENGTH),
        ));
    }

    if name.chars().any(|c| c.is_control()) {
        return Err(Error::validation(
            "display_name",
            "Display name cannot contain control characters",
        ));
    }

    Ok(Some(name.to_string()))
}

/// Checks `zone` against the IANA database
pub fn validate_timezone(zone: &str) -> Result<Tz> {
    zone.trim()
        .parse::<Tz>()
        .map_err(|_| Error::validation("timezone", format!("Unknown time zone '{}'", zone.trim())))
}

/// Parses a `YYYY-MM-DD` date
pub fn parse_record_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation("date", "Date must use the YYYY-MM-DD format"))
}

/// Parses `morning` or `afternoon`
pub fn parse_period(value: &str) -> Result<Period> {
    Period::from_str(value.trim())
        .map_err(|_| Error::validation("time_period", "Period must be 'morning' or 'afternoon'"))
}

/// Parses a non-negative, finite number of hours
pub fn parse_hours(value: &str) -> Result<f64> {
    let hours: f64 = value
        .trim()
        .parse()
        .map_err(|_| Error::validation("hours", "Hours must be a number"))?;

    if !hours.is_finite() {
        return Err(Error::validation("hours", "Hours must be a finite number"));
    }

    if hours < 0.0 {
        return Err(Error::validation("hours", "Hours cannot be negative"));
    }

    Ok(hours)
}

/// Trims a project name and checks its length
pub fn normalize_project_name(value: &str) -> Result<String> {
    let name = value.trim();

    if name.chars().count() > MAX_PROJECT_NAME_LENGTH {
        return Err(Error::validation(
            "project_name",
            format!("Project name is too long (max {} characters)", MAX_PROJECT_NAME_LENGTH),
        ));
    }

    Ok(name.to_string())
}

/// Validates every field of a record form
pub fn parse_record_form(form: &RecordForm) -> Result<RecordFields> {
    let description = form
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    Ok(RecordFields {
        date: parse_record_date(&form.date)?,
        period: parse_period(&form.time_period)?,
        hours: parse_hours(&form.hours)?,
        project_name: normalize_project_name(&form.project_name)?,
        description,
    })
}

/// Accepts only same-site relative paths as redirect targets
pub fn safe_redirect_target(next: Option<&str>) -> Option<String> {
    let next = next?.trim();
    let is_local = next.starts_with('/') && !next.starts_with("//") && !next.contains('\\');
    is_local.then(|| next.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(date: &str, period: &str, hours: &str) -> RecordForm {
        RecordForm {
            date: date.to_string(),
            time_period: period.to_string(),
            hours: hours.to_string(),
            project_name: "  Alpha ".to_string(),
            description: Some("   ".to_string()),
            next: None,
        }
    }

    #[test]
    fn test_parse_record_form_valid() {
        let fields = parse_record_form(&form("2026-10-12", "morning", "3.5")).unwrap();
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());
        assert_eq!(fields.period, Period::Morning);
        assert_eq!(fields.hours, 3.5);
        assert_eq!(fields.project_name, "Alpha");
        assert_eq!(fields.description, None);
    }

    #[test]
    fn test_parse_record_form_rejects_bad_fields() {
        assert!(matches!(
            parse_record_form(&form("12/10/2026", "morning", "1")),
            Err(Error::Validation(_))
        ));
        assert!(parse_record_form(&form("2026-10-12", "evening", "1")).is_err());
        assert!(parse_record_form(&form("2026-10-12", "morning", "abc")).is_err());
        assert!(parse_record_form(&form("2026-10-12", "morning", "-1")).is_err());
        assert!(parse_record_form(&form("2026-10-12", "morning", "NaN")).is_err());
    }

    #[test]
    fn test_manual_hours_are_not_capped() {
        assert_eq!(parse_hours("12").unwrap(), 12.0);
        assert_eq!(parse_hours("0").unwrap(), 0.0);
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"x".repeat(81)).is_err());
    }

    #[test]
    fn test_display_name_normalization() {
        assert_eq!(normalize_display_name(None).unwrap(), None);
        assert_eq!(normalize_display_name(Some("  ")).unwrap(), None);
        assert_eq!(
            normalize_display_name(Some(" 张三 ")).unwrap(),
            Some("张三".to_string())
        );
    }

    #[test]
    fn test_timezone_validation() {
        assert_eq!(validate_timezone("Asia/Tokyo").unwrap(), chrono_tz::Asia::Tokyo);
        assert!(validate_timezone("Nowhere/Special").is_err());
    }

    #[test]
    fn test_safe_redirect_target() {
        assert_eq!(
            safe_redirect_target(Some("/weekly?week=-1")),
            Some("/weekly?week=-1".to_string())
        );
        assert_eq!(safe_redirect_target(Some("//evil.example")), None);
        assert_eq!(safe_redirect_target(Some("https://evil.example")), None);
        assert_eq!(safe_redirect_target(None), None);
    }
}
