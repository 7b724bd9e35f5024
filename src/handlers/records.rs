use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Local;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    handlers::render,
    models::{
        time_records::{Period, RecordForm, TimeRecord},
        users::User,
    },
    services::time_records,
    state::AppState,
    validation::{parse_record_form, safe_redirect_target},
    views::RecordFormTemplate,
};

const NEW_RECORD_HEADING: &str = "Add record";
const EDIT_RECORD_HEADING: &str = "Edit record";

/// Prefill values for the new-record form
#[derive(Debug, Default, Deserialize)]
pub struct NewRecordQuery {
    pub date: Option<String>,
    pub time_period: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

fn edit_form(record: &TimeRecord, next: Option<String>) -> RecordForm {
    RecordForm {
        date: record.date.format("%Y-%m-%d").to_string(),
        time_period: record.period.to_string(),
        hours: record.hours.to_string(),
        project_name: record.project_name.clone(),
        description: record.description.clone(),
        next,
    }
}

fn after_save(next: Option<&str>) -> Redirect {
    let target = safe_redirect_target(next).unwrap_or_else(|| "/dashboard".to_string());
    Redirect::to(&target)
}

/// Re-renders the form for validation failures; other errors propagate.
fn form_failure(
    user: &User,
    heading: &'static str,
    action: String,
    form: RecordForm,
    error: Error,
) -> Result<Response> {
    match error {
        Error::Validation(errors) => {
            let template =
                RecordFormTemplate::new(user, heading, action, form, Some(errors.to_string()));
            let page = render(template)?;
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        other => Err(other),
    }
}

/// GET /records/new
pub async fn new_record_page(
    Extension(user): Extension<User>,
    Query(query): Query<NewRecordQuery>,
) -> Result<Response> {
    let form = RecordForm {
        date: query
            .date
            .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string()),
        time_period: query.time_period.unwrap_or_else(|| Period::Morning.to_string()),
        next: query.next,
        ..RecordForm::default()
    };

    let action = "/records/new".to_string();
    let template = RecordFormTemplate::new(&user, NEW_RECORD_HEADING, action, form, None);
    Ok(render(template)?.into_response())
}

/// POST /records/new
///
/// # HTTP Status Codes
/// - `303 SEE_OTHER`: Saved, redirected to `next` (local paths only) or the dashboard
/// - `400 BAD_REQUEST`: Invalid field (form re-rendered with the message)
pub async fn create_record(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Form(form): Form<RecordForm>,
) -> Result<Response> {
    let fields = match parse_record_form(&form) {
        Ok(fields) => fields,
        Err(e) => {
            let action = "/records/new".to_string();
            return form_failure(&user, NEW_RECORD_HEADING, action, form, e);
        }
    };

    let mut conn = state.pool.acquire().await?;
    time_records::create_manual_record(&mut conn, &user, fields).await?;

    Ok(after_save(form.next.as_deref()).into_response())
}

/// GET /records/{id}
///
/// Edit form for a record the user owns; anyone else gets 403.
pub async fn edit_record_page(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(record_id): Path<Uuid>,
    Query(query): Query<NextQuery>,
) -> Result<Response> {
    let mut conn = state.pool.acquire().await?;
    let record = time_records::get_owned_record(&mut conn, &user, record_id).await?;

    let form = edit_form(&record, query.next);
    let action = format!("/records/{}", record.id);
    let template = RecordFormTemplate::new(&user, EDIT_RECORD_HEADING, action, form, None);
    Ok(render(template)?.into_response())
}

/// POST /records/{id}
pub async fn update_record(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(record_id): Path<Uuid>,
    Form(form): Form<RecordForm>,
) -> Result<Response> {
    let mut conn = state.pool.acquire().await?;
    // ownership before validation
    time_records::get_owned_record(&mut conn, &user, record_id).await?;

    let fields = match parse_record_form(&form) {
        Ok(fields) => fields,
        Err(e) => {
            let action = format!("/records/{}", record_id);
            return form_failure(&user, EDIT_RECORD_HEADING, action, form, e);
        }
    };
    time_records::update_record(&mut conn, &user, record_id, fields).await?;

    Ok(after_save(form.next.as_deref()).into_response())
}

/// DELETE /records/{id}
///
/// # Returns
/// `{"status": "success"}`; 403 for someone else's record, 404 if missing.
pub async fn delete_record(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(record_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    time_records::delete_record(&mut conn, &user, record_id).await?;

    Ok(Json(serde_json::json!({ "status": "success" })))
}
