use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    error::Result,
    handlers::{form_error_message, render},
    middleware::auth::{current_user, session_token},
    models::users::LoginUser,
    services::{
        cookies::{build_clear_session_cookie, build_session_cookie},
        sessions, users,
    },
    state::AppState,
    views::LoginTemplate,
};

/// GET /
///
/// Sends signed-in users to the dashboard and everyone else to the login page.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    match current_user(&state, &headers).await {
        Ok(_) => Redirect::to("/dashboard"),
        Err(_) => Redirect::to("/login"),
    }
}

/// GET /login
pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    if current_user(&state, &headers).await.is_ok() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    Ok(render(LoginTemplate {
        username: String::new(),
        error: None,
    })?
    .into_response())
}

/// POST /login
///
/// Checks the credentials, opens a session and sets the session cookie.
///
/// # HTTP Status Codes
/// - `303 SEE_OTHER`: Logged in, redirected to the dashboard
/// - `400 BAD_REQUEST`: Empty username or password (form re-rendered)
/// - `401 UNAUTHORIZED`: Wrong credentials (form re-rendered)
pub async fn login(
    State(state): State<AppState>,
    Form(request): Form<LoginUser>,
) -> Result<Response> {
    let mut conn = state.pool.acquire().await?;
    let username = request.username.clone();

    match users::login_user(&mut conn, request, &state.config.auth).await {
        Ok(result) => {
            let cookie = build_session_cookie(&result.session_token, &state.cookies);
            Ok(([(SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response())
        }
        Err(e) => {
            let Some(message) = form_error_message(&e) else {
                return Err(e);
            };
            let page = render(LoginTemplate {
                username,
                error: Some(message),
            })?;
            Ok((e.status_code(), page).into_response())
        }
    }
}

/// GET /logout
///
/// Deletes the session row (if any) and clears the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    if let Some(token) = session_token(&headers, &state.cookies.session_cookie_name) {
        let mut conn = state.pool.acquire().await?;
        if let Err(e) = sessions::revoke_session_by_token(&mut conn, &token).await {
            tracing::debug!(error = %e, "Logout with an unknown session");
        }
    }

    let cookie = build_clear_session_cookie(&state.cookies);
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/login")).into_response())
}
