use axum::{
    Router, middleware,
    http::{HeaderValue, header::X_CONTENT_TYPE_OPTIONS},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, dashboard, health, profile, records, timer, users, weekly},
    middleware::session_auth_middleware,
    state::AppState,
};

/// Builds the application router.
///
/// `/login`, `/logout` and `/health` are public; everything else goes
/// through the session middleware.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/profile", get(profile::profile_page).post(profile::update_profile))
        .route("/records/new", get(records::new_record_page).post(records::create_record))
        .route(
            "/records/{id}",
            get(records::edit_record_page)
                .post(records::update_record)
                .delete(records::delete_record),
        )
        .route("/timer/start", post(timer::start_timer))
        .route("/timer/stop", post(timer::stop_timer))
        .route("/weekly", get(weekly::weekly_view))
        .route("/weekly/export", get(weekly::export_weekly))
        .route("/admin/weekly", get(admin::admin_weekly_view))
        .route("/admin/weekly/export", get(admin::admin_export_member))
        .route("/admin/weekly/export/all", get(admin::admin_export_all))
        .route("/users", get(users::users_page).post(users::add_user))
        .route("/users/{id}", axum::routing::delete(users::delete_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_auth_middleware));

    Router::new()
        .route("/", get(auth::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/health", get(health::health_check))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::if_not_present(
                    X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .with_state(state)
}
