use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Local;

use crate::{
    error::Result,
    handlers::{WeekQuery, attachment, render},
    models::users::User,
    reports::format_hours,
    services::{exports, weekly},
    state::AppState,
    views::{Nav, WeekNav, WeeklyTemplate, day_rows},
};

/// GET /weekly?week=N
///
/// The user's own week. Administrators are sent to the team view instead.
pub async fn weekly_view(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<WeekQuery>,
) -> Result<Response> {
    if user.role.can_view_all_hours() {
        return Ok(Redirect::to(&format!("/admin/weekly?week={}", query.week)).into_response());
    }

    let week = weekly::resolve_week(query.week)?;
    let mut conn = state.pool.acquire().await?;
    let records = weekly::weekly_records(&mut conn, user.id, &week).await?;
    let summary = weekly::summarize(&week, &records);

    let page = WeeklyTemplate {
        nav: Nav::for_user(&user),
        week: WeekNav::new(&week),
        days: day_rows(&summary, &records, Local::now().date_naive()),
        week_total: format_hours(summary.week_total),
        average: format!("{:.1}", summary.average_per_working_day()),
    };
    Ok(render(page)?.into_response())
}

/// GET /weekly/export?week=N
///
/// The user's weekly grid as an `.xlsx` download.
pub async fn export_weekly(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<WeekQuery>,
) -> Result<Response> {
    let week = weekly::resolve_week(query.week)?;
    let mut conn = state.pool.acquire().await?;
    let report = exports::export_own_week(&mut conn, &user, &week).await?;

    Ok(attachment(report))
}
