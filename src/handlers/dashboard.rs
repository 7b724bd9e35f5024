use axum::{
    Extension,
    extract::State,
    response::Html,
};
use chrono::Local;

use crate::{
    error::Result,
    handlers::render,
    models::users::User,
    services::{time_records, timers},
    state::AppState,
    views::DashboardTemplate,
};

/// GET /dashboard
///
/// Today's records with per-period sums and the running timer, if any.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Html<String>> {
    let mut conn = state.pool.acquire().await?;
    let today = Local::now().date_naive();

    let overview = time_records::daily_overview(&mut conn, user.id, today).await?;
    let timer = timers::current_timer(&mut conn, &user).await?;

    render(DashboardTemplate::new(&user, &overview, timer.as_ref()))
}
