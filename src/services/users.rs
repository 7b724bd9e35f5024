use crate::DbConn;
use crate::{
    config::{AuthConfig, BootstrapConfig},
    error::{Error, Result},
    models::users::{
        CreateUser, LoginResult, LoginUser, NewUser, Role, UpdateProfile, UpdateUser, User,
    },
    queries::users,
    services::sessions,
    validation::{normalize_display_name, validate_password, validate_timezone, validate_username},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sqlx::Connection;
use uuid::Uuid;

/// Hashes a password using Argon2 with a fresh salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a password against a password hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| Error::Internal(format!("Invalid password hash: {}", e)))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

/// Creates the configured admin account when no users exist yet.
///
/// Returns the new admin, or `None` if the table already had accounts.
pub async fn ensure_bootstrap_admin(
    conn: &mut DbConn,
    config: &BootstrapConfig,
) -> Result<Option<User>> {
    if users::count_users(conn).await? > 0 {
        return Ok(None);
    }

    validate_timezone(&config.default_timezone)?;

    let new_user = NewUser {
        username: config.admin_username.trim().to_string(),
        password_hash: hash_password(config.admin_password.expose_secret())?,
        display_name: normalize_display_name(Some(&config.admin_display_name))?,
        timezone: config.default_timezone.clone(),
        role: Role::Admin,
    };
    let admin = users::create_user(conn, new_user).await?;

    tracing::info!(
        user_id = %admin.id,
        username = %admin.username,
        "Bootstrap admin account created"
    );
    Ok(Some(admin))
}

/// Adds a member account on behalf of `actor`
pub async fn create_user(
    conn: &mut DbConn,
    actor: &User,
    request: CreateUser,
    default_timezone: &str,
) -> Result<User> {
    if !actor.role.can_manage_users() {
        tracing::warn!(actor_id = %actor.id, "Rejected user creation by non-admin");
        return Err(Error::Forbidden("Only administrators can add users".to_string()));
    }

    validate_username(&request.username)?;
    validate_password(&request.password)?;
    let display_name = normalize_display_name(request.display_name.as_deref())?;
    let username = request.username.trim().to_string();

    if users::get_user_by_username(conn, &username).await?.is_some() {
        return Err(Error::Conflict(format!("Username '{}' already exists", username)));
    }

    let new_user = NewUser {
        username,
        password_hash: hash_password(&request.password)?,
        display_name,
        timezone: default_timezone.to_string(),
        role: Role::Member,
    };
    let user = users::create_user(conn, new_user).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User created");
    Ok(user)
}

/// Checks credentials and opens a session
pub async fn login_user(
    conn: &mut DbConn,
    request: LoginUser,
    auth: &AuthConfig,
) -> Result<LoginResult> {
    let username = request.username.trim();
    if username.is_empty() || request.password.is_empty() {
        return Err(Error::validation("username", "Username and password are required"));
    }

    let user = users::get_user_by_username(conn, username)
        .await?
        .ok_or_else(|| Error::Authentication("Invalid username or password".to_string()))?;

    if !verify_password(&request.password, &user.password_hash)? {
        tracing::warn!(username = %username, "Failed login attempt");
        return Err(Error::Authentication("Invalid username or password".to_string()));
    }

    let (session_token, session) =
        sessions::open_session(conn, user.id, auth.session_ttl_hours).await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(LoginResult {
        user,
        session_token,
        expires_at: session.expires_at,
    })
}

/// Applies a profile form: display name, time zone and optional password change.
///
/// Every field is validated before anything is written.
pub async fn update_profile(
    conn: &mut DbConn,
    user: &User,
    request: UpdateProfile,
) -> Result<User> {
    let display_name = normalize_display_name(request.display_name.as_deref())?;
    let timezone = match request.timezone.as_deref().map(str::trim).filter(|z| !z.is_empty()) {
        Some(zone) => {
            validate_timezone(zone)?;
            Some(zone.to_string())
        }
        None => None,
    };

    let new_password_hash = match request.new_password.as_deref().filter(|p| !p.is_empty()) {
        Some(new_password) => {
            let current = request.current_password.as_deref().unwrap_or_default();
            if !verify_password(current, &user.password_hash)? {
                return Err(Error::validation("current_password", "Current password is incorrect"));
            }

            if request.confirm_password.as_deref() != Some(new_password) {
                return Err(Error::validation(
                    "confirm_password",
                    "New password and confirmation do not match",
                ));
            }

            validate_password(new_password)?;
            Some(hash_password(new_password)?)
        }
        None => None,
    };

    let mut tx = conn.begin().await?;
    if let Some(hash) = new_password_hash.as_deref() {
        users::update_user_password(&mut tx, user.id, hash).await?;
        tracing::info!(user_id = %user.id, "Password changed");
    }
    let updated = users::update_user(
        &mut tx,
        user.id,
        UpdateUser {
            display_name,
            timezone,
        },
    )
    .await?;
    tx.commit().await?;

    Ok(updated)
}

/// Every account, for the management page
pub async fn list_all_users(conn: &mut DbConn, actor: &User) -> Result<Vec<User>> {
    if !actor.role.can_manage_users() {
        return Err(Error::Forbidden("Only administrators can manage users".to_string()));
    }

    users::list_users(conn).await
}

/// Accounts whose hours are reported: everyone except administrators
pub async fn list_members(conn: &mut DbConn) -> Result<Vec<User>> {
    users::list_users_excluding_role(conn, Role::Admin).await
}

/// Looks up a user, failing with `NotFound`
pub async fn get_user(conn: &mut DbConn, user_id: Uuid) -> Result<User> {
    users::get_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User with ID {} not found", user_id)))
}

/// Deletes `target_id` on behalf of `actor`. Administrators cannot delete themselves.
pub async fn delete_user(conn: &mut DbConn, actor: &User, target_id: Uuid) -> Result<()> {
    if !actor.role.can_manage_users() {
        tracing::warn!(actor_id = %actor.id, "Rejected user deletion by non-admin");
        return Err(Error::Forbidden("Only administrators can delete users".to_string()));
    }

    if actor.id == target_id {
        return Err(Error::Forbidden("You cannot delete your own account".to_string()));
    }

    let rows_affected = users::delete_user(conn, target_id).await?;
    if rows_affected == 0 {
        return Err(Error::NotFound(format!("User with ID {} not found", target_id)));
    }

    tracing::info!(actor_id = %actor.id, user_id = %target_id, "User deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("s3cret").unwrap();
        assert_ne!(hash, "s3cret");
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(verify_password("s3cret", "not-a-phc-string").is_err());
    }
}
