use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    response::Html,
};
use uuid::Uuid;

use crate::{
    error::Result,
    handlers::render,
    models::users::{CreateUser, User},
    services::users,
    state::AppState,
    views::{Nav, UserRow, UsersTemplate},
};

/// GET /users
///
/// Account list for administrators; 403 for everyone else.
pub async fn users_page(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Html<String>> {
    let mut conn = state.pool.acquire().await?;
    let accounts = users::list_all_users(&mut conn, &user).await?;

    render(UsersTemplate {
        nav: Nav::for_user(&user),
        users: accounts.iter().map(|account| UserRow::new(account, &user)).collect(),
    })
}

/// POST /users
///
/// # Request Body (form)
/// - `username`: Unique login name
/// - `password`: Initial password
/// - `display_name`: Optional display name
///
/// # HTTP Status Codes
/// - `200 OK`: `{"status": "success", "user": {...}}`
/// - `400 BAD_REQUEST`: Invalid field
/// - `403 FORBIDDEN`: Caller is not an administrator
/// - `409 CONFLICT`: Username already taken
pub async fn add_user(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Form(request): Form<CreateUser>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    let default_timezone = &state.config.bootstrap.default_timezone;
    let created = users::create_user(&mut conn, &user, request, default_timezone).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "user": created,
    })))
}

/// DELETE /users/{id}
///
/// Removes the account and, through the foreign key, all of its records.
/// Deleting yourself is refused with 403.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await?;
    users::delete_user(&mut conn, &user, user_id).await?;

    Ok(Json(serde_json::json!({ "status": "success" })))
}
