pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod profile;
pub mod records;
pub mod timer;
pub mod users;
pub mod weekly;

use askama::Template;
use axum::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    reports::{ReportFile, XLSX_CONTENT_TYPE},
};

/// `?week=N`, defaulting to the current week
#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    #[serde(default)]
    pub week: i64,
}

/// Renders a page template into an HTML response
pub fn render<T: Template>(template: T) -> Result<Html<String>> {
    Ok(Html(template.render()?))
}

/// Sends a workbook as a file download
pub fn attachment(report: ReportFile) -> Response {
    let disposition = report.content_disposition();
    let headers = [
        (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (CONTENT_DISPOSITION, disposition),
    ];
    (headers, report.bytes).into_response()
}

/// Message shown next to a form for errors the user can correct
pub fn form_error_message(error: &Error) -> Option<String> {
    match error {
        Error::Validation(errors) => Some(errors.to_string()),
        Error::Authentication(message) | Error::Conflict(message) => Some(message.clone()),
        _ => None,
    }
}
