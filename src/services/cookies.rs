use crate::config::AuthConfig;

/// Cookie carrying the login session token
pub const SESSION_COOKIE: &str = "session_token";

/// Cookie security configuration
///
/// Controls how the session cookie is created and secured for browser clients
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct CookieConfig {
    /// Name of the session cookie (default: "session_token")
    pub session_cookie_name: String,
    /// HttpOnly flag prevents JavaScript access (XSS protection)
    pub http_only: bool,
    /// Secure flag ensures HTTPS-only transmission
    pub secure: bool,
    /// SameSite attribute for CSRF protection
    pub same_site: SameSite,
    /// Path attribute to limit cookie scope
    pub path: String,
    /// Lifetime in seconds
    pub max_age_seconds: i64,
}

/// SameSite cookie attribute for CSRF protection
#[derive(Debug, Clone, Copy, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Strict mode - cookie not sent with cross-site requests
    Strict,
    /// Lax mode - cookie sent with top-level navigations
    Lax,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: SESSION_COOKIE.to_string(),
            http_only: true,
            secure: false,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_seconds: 7 * 24 * 3600,
        }
    }
}

impl CookieConfig {
    /// Cookie settings matching the configured session lifetime
    pub fn from_auth(auth: &AuthConfig) -> Self {
        Self {
            secure: auth.secure_cookies,
            max_age_seconds: auth.session_ttl_hours * 3600,
            ..Self::default()
        }
    }
}

/// Builds a Set-Cookie header value for the session token
///
/// # Example
/// ```
/// use workhours::services::cookies::{build_session_cookie, CookieConfig};
///
/// let cookie = build_session_cookie("abc123", &CookieConfig::default());
/// assert_eq!(cookie, "session_token=abc123; HttpOnly; SameSite=Lax; Path=/; Max-Age=604800");
/// ```
pub fn build_session_cookie(token: &str, config: &CookieConfig) -> String {
    format!(
        "{}={}{}{}; SameSite={}; Path={}; Max-Age={}",
        config.session_cookie_name,
        token,
        if config.http_only { "; HttpOnly" } else { "" },
        if config.secure { "; Secure" } else { "" },
        config.same_site.as_str(),
        config.path,
        config.max_age_seconds
    )
}

/// Builds a Set-Cookie header value that clears the session cookie
///
/// Used during logout to invalidate the cookie by setting Max-Age=0
pub fn build_clear_session_cookie(config: &CookieConfig) -> String {
    format!(
        "{}=; HttpOnly; SameSite={}; Path={}; Max-Age=0",
        config.session_cookie_name,
        config.same_site.as_str(),
        config.path
    )
}
