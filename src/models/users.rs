use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Zone used when a stored zone name no longer parses.
pub const FALLBACK_TIMEZONE: Tz = chrono_tz::Asia::Shanghai;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Adding and deleting accounts.
    pub fn can_manage_users(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Viewing and exporting every member's hours.
    pub fn can_view_all_hours(self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub timezone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Display name, falling back to the login name when unset or blank.
    pub fn name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }

    /// The user's configured zone.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(FALLBACK_TIMEZONE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub timezone: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub display_name: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub user: User,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserSession {
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn user(display_name: Option<&str>, role: Role) -> User {
        User {
            id: Uuid::now_v7(),
            username: "alice".to_string(),
            password_hash: String::new(),
            display_name: display_name.map(str::to_string),
            timezone: "Europe/Paris".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_name_falls_back_to_username() {
        assert_eq!(user(None, Role::Member).name(), "alice");
        assert_eq!(user(Some("  "), Role::Member).name(), "alice");
        assert_eq!(user(Some("Alice L."), Role::Member).name(), "Alice L.");
    }

    #[test]
    fn test_role_capabilities() {
        assert!(user(None, Role::Admin).is_admin());
        assert!(Role::Admin.can_manage_users());
        assert!(!Role::Member.can_manage_users());
        assert!(!Role::Member.can_view_all_hours());
        assert_eq!(Role::from_str("member").unwrap(), Role::Member);
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_tz_parses_and_falls_back() {
        assert_eq!(user(None, Role::Member).tz(), chrono_tz::Europe::Paris);
        let mut broken = user(None, Role::Member);
        broken.timezone = "Mars/Olympus".to_string();
        assert_eq!(broken.tz(), FALLBACK_TIMEZONE);
    }
}
