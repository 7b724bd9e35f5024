//! Administrator views of every member's hours.

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
    DbConn,
    error::{Error, Result},
    handlers::{WeekQuery, attachment, render},
    models::{users::User, weekly::Week},
    reports::format_hours,
    services::{exports, users as user_service, weekly},
    state::AppState,
    views::{AdminWeeklyTableTemplate, AdminWeeklyTemplate, MemberOption, Nav, WeekNav, day_rows},
};
use askama::Template;

#[derive(Debug, Default, Deserialize)]
pub struct AdminWeekQuery {
    #[serde(default, deserialize_with = "lenient_week")]
    pub week: i64,
    pub user: Option<String>,
    pub ajax: Option<String>,
}

/// A `week` that is not an integer means the current week.
fn lenient_week<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.trim().parse().ok()).unwrap_or_default())
}

impl AdminWeekQuery {
    fn member_id(&self) -> Result<Option<Uuid>> {
        match self.user.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => Uuid::parse_str(id)
                .map(Some)
                .map_err(|_| Error::validation("user", "Invalid user id")),
            None => Ok(None),
        }
    }

    fn is_ajax(&self) -> bool {
        self.ajax.as_deref().is_some_and(|flag| !flag.is_empty() && flag != "0")
    }
}

/// JSON body of the AJAX refresh
#[derive(Debug, Serialize)]
pub struct AdminWeeklyData {
    pub table_html: String,
    pub selected_user: String,
    pub week_total: String,
    pub avg_hours: String,
}

struct MemberTable {
    members: Vec<User>,
    selected: Option<User>,
    data: Option<AdminWeeklyData>,
}

/// Loads the member list and, when there is someone to show, the rendered table.
async fn load_member_table(
    conn: &mut DbConn,
    week: &Week,
    member_id: Option<Uuid>,
) -> Result<MemberTable> {
    let members = user_service::list_members(conn).await?;
    let selected = match member_id {
        Some(id) => Some(user_service::get_user(conn, id).await?),
        None => members.first().cloned(),
    };

    let Some(member) = selected.as_ref() else {
        return Ok(MemberTable {
            members,
            selected: None,
            data: None,
        });
    };

    let records = weekly::weekly_records(conn, member.id, week).await?;
    let summary = weekly::summarize(week, &records);
    let week_total = format_hours(summary.week_total);
    let avg_hours = format!("{:.1}", summary.average_per_working_day());

    let table_html = AdminWeeklyTableTemplate {
        member_name: member.name().to_string(),
        days: day_rows(&summary, &records, Local::now().date_naive()),
        week_total: week_total.clone(),
        average: avg_hours.clone(),
    }
    .render()?;

    Ok(MemberTable {
        data: Some(AdminWeeklyData {
            table_html,
            selected_user: member.name().to_string(),
            week_total,
            avg_hours,
        }),
        members,
        selected,
    })
}

async fn ajax_data(
    state: &AppState,
    week: i64,
    member_id: Option<Uuid>,
) -> Result<AdminWeeklyData> {
    let week = weekly::resolve_week(week)?;
    let mut conn = state.pool.acquire().await?;
    load_member_table(&mut conn, &week, member_id)
        .await?
        .data
        .ok_or_else(|| Error::NotFound("There are no members to show".to_string()))
}

/// GET /admin/weekly?week=N&user=ID[&ajax=1]
///
/// Weekly table for one member (the first member when `user` is absent).
/// With `ajax=1` the table comes back as JSON:
/// `{table_html, selected_user, week_total, avg_hours}`; failures there are
/// reported as `{"status": "error", "error": ...}` instead of an HTML page.
pub async fn admin_weekly_view(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<AdminWeekQuery>,
) -> Result<Response> {
    if !user.role.can_view_all_hours() {
        return Ok(Redirect::to(&format!("/weekly?week={}", query.week)).into_response());
    }

    if query.is_ajax() {
        let outcome = match query.member_id() {
            Ok(member_id) => ajax_data(&state, query.week, member_id).await,
            Err(e) => Err(e),
        };
        return Ok(match outcome {
            Ok(data) => Json(data).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Admin weekly refresh failed");
                let status = match e.status_code() {
                    status if status.is_client_error() => status,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = if status.is_server_error() {
                    "Failed to load weekly data".to_string()
                } else {
                    e.to_string()
                };
                let body = serde_json::json!({ "status": "error", "error": message });
                (status, Json(body)).into_response()
            }
        });
    }

    let week = weekly::resolve_week(query.week)?;
    let mut conn = state.pool.acquire().await?;
    let table = load_member_table(&mut conn, &week, query.member_id()?).await?;

    let selected_id = table.selected.as_ref().map(|m| m.id);
    let page = AdminWeeklyTemplate {
        nav: Nav::for_user(&user),
        week: WeekNav::new(&week),
        members: table
            .members
            .iter()
            .map(|member| MemberOption {
                id: member.id.to_string(),
                name: member.name().to_string(),
                selected: Some(member.id) == selected_id,
            })
            .collect(),
        selected_id: selected_id.map(|id| id.to_string()).unwrap_or_default(),
        table_html: table.data.map(|data| data.table_html).unwrap_or_default(),
    };
    Ok(render(page)?.into_response())
}

/// GET /admin/weekly/export?week=N&user=ID
pub async fn admin_export_member(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<AdminWeekQuery>,
) -> Result<Response> {
    let member_id = query
        .member_id()?
        .ok_or_else(|| Error::validation("user", "Choose a user to export"))?;
    let week = weekly::resolve_week(query.week)?;

    let mut conn = state.pool.acquire().await?;
    let report = exports::export_member_week(&mut conn, &user, member_id, &week).await?;

    Ok(attachment(report))
}

/// GET /admin/weekly/export/all?week=N
pub async fn admin_export_all(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<WeekQuery>,
) -> Result<Response> {
    let week = weekly::resolve_week(query.week)?;
    let mut conn = state.pool.acquire().await?;
    let report = exports::export_all_members(&mut conn, &user, &week).await?;

    Ok(attachment(report))
}
