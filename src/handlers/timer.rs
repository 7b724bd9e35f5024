use axum::{
    Extension, Form, Json,
    extract::{FromRequest, Request, State},
    http::header,
};
use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::{
    error::{Error, Result},
    models::{
        timers::{StartTimer, StopTimer},
        users::User,
    },
    services::timers,
    state::AppState,
};

/// Timer request body: JSON or form-encoded, and optional.
///
/// A request without a body (or with another content type) reads as
/// `T::default()`.
pub struct TimerBody<T>(pub T);

impl<S, T> FromRequest<S> for TimerBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let Json(body) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| Error::validation("body", rejection.body_text()))?;
            Ok(Self(body))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(body) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| Error::validation("body", rejection.body_text()))?;
            Ok(Self(body))
        } else {
            Ok(Self(T::default()))
        }
    }
}

/// POST /timer/start
///
/// # Request Body (JSON, form, or empty)
/// - `project_name`: Optional project label carried onto the record
///
/// # HTTP Status Codes
/// - `200 OK`: Timer started
/// - `409 CONFLICT`: A timer is already running for this user
pub async fn start_timer(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    TimerBody(request): TimerBody<StartTimer>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let timer =
        timers::start_timer(&mut conn, &user, request.project_name.as_deref(), Utc::now()).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "started_at": timer.started_at,
        "project_name": timer.project_name,
    })))
}

/// POST /timer/stop
///
/// Converts the running timer into a record dated and classified in the
/// user's time zone.
///
/// # Request Body (JSON, form, or empty)
/// - `description`: Optional note stored on the record
///
/// # HTTP Status Codes
/// - `200 OK`: `{"status", "hours", "project_name", "record"}`
/// - `409 CONFLICT`: No timer running (`TIMER_NOT_RUNNING`)
pub async fn stop_timer(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    TimerBody(request): TimerBody<StopTimer>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let result = timers::stop_timer(&mut conn, &user, request, Utc::now()).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "hours": result.hours,
        "project_name": result.project_name,
        "record": result.record,
    })))
}
