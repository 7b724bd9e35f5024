//! Session cookie authentication
//!
//! Resolves the `session_token` cookie to a [`User`] and stores it in the
//! request extensions. Handlers read it with `Extension<User>`.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, header::COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{error::Error, models::users::User, services::sessions, state::AppState};

pub const LOGIN_PATH: &str = "/login";

/// Session authentication middleware
///
/// # Behavior
/// 1. Reads the session cookie from the `Cookie` header
/// 2. Resolves it to a user (expired sessions are removed on the way)
/// 3. Adds the `User` to request extensions
///
/// Unauthenticated `GET` requests are redirected to the login page; every
/// other method gets a 401 JSON body.
///
/// # Usage
/// ```ignore
/// Router::new()
///     .route("/dashboard", get(dashboard))
///     .route_layer(middleware::from_fn_with_state(state.clone(), session_auth_middleware))
/// ```
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    match current_user(&state, &headers).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(Error::Authentication(reason)) => {
            tracing::debug!(
                path = %request.uri().path(),
                reason = %reason,
                "Unauthenticated request"
            );
            if request.method() == Method::GET {
                Redirect::to(LOGIN_PATH).into_response()
            } else {
                Error::Authentication(reason).into_response()
            }
        }
        Err(e) => e.into_response(),
    }
}

/// Resolves the session cookie in `headers` to its user
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<User, Error> {
    let token = session_token(headers, &state.cookies.session_cookie_name)
        .ok_or_else(|| Error::Authentication("Missing session cookie".to_string()))?;

    let mut conn = state.pool.acquire().await?;
    sessions::authenticate_session(&mut conn, &token).await
}

/// Reads the named cookie from the `Cookie` headers
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookies| extract_cookie_value(cookies, cookie_name))
}

/// Extract specific cookie value from Cookie header
///
/// # Returns
/// * `Some(value)` - Cookie value if found and non-empty
/// * `None` - Cookie not found
fn extract_cookie_value(cookie_str: &str, cookie_name: &str) -> Option<String> {
    cookie_str
        .split(';')
        .map(|s| s.trim())
        .filter_map(|cookie| cookie.split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_cookie_value() {
        let header = "theme=dark; session_token=abc123; other=1";
        assert_eq!(extract_cookie_value(header, "session_token"), Some("abc123".to_string()));
        assert_eq!(extract_cookie_value(header, "missing"), None);
        assert_eq!(extract_cookie_value("session_token=", "session_token"), None);
        // prefix of another cookie name must not match
        assert_eq!(extract_cookie_value("xsession_token=zzz", "session_token"), None);
    }

    #[test]
    fn test_session_token_scans_all_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("session_token=tok"));
        assert_eq!(session_token(&headers, "session_token"), Some("tok".to_string()));
    }
}
