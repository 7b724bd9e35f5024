use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    error::Result,
    handlers::{form_error_message, render},
    models::users::{UpdateProfile, User},
    services::users,
    state::AppState,
    views::ProfileTemplate,
};

/// GET /profile
pub async fn profile_page(Extension(user): Extension<User>) -> Result<Response> {
    Ok(render(ProfileTemplate::new(&user, None, None))?.into_response())
}

/// POST /profile
///
/// Updates display name and time zone; changes the password when
/// `new_password` is filled in. Errors re-render the form with a message.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Form(request): Form<UpdateProfile>,
) -> Result<Response> {
    let mut conn = state.pool.acquire().await?;

    match users::update_profile(&mut conn, &user, request).await {
        Ok(updated) => {
            tracing::info!(user_id = %updated.id, "Profile updated");
            let page = ProfileTemplate::new(&updated, None, Some("Profile saved".to_string()));
            Ok(render(page)?.into_response())
        }
        Err(e) => {
            let Some(message) = form_error_message(&e) else {
                return Err(e);
            };
            let page = render(ProfileTemplate::new(&user, Some(message), None))?;
            Ok((e.status_code(), page).into_response())
        }
    }
}
