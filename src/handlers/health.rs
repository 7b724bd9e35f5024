//! Health check handler
//!
//! Reports whether the service can reach its database.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{error::Result, state::AppState};

/// Public health check response
///
/// Simple status indicator for load balancers and health monitoring.
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    /// Status indicator (always "ok")
    pub status: String,
}

/// GET /health
///
/// Runs a trivial query so a broken database shows up as a 500.
///
/// # Example
/// ```bash
/// curl http://localhost:3000/health
/// # Returns: {"status":"ok"}
/// ```
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthCheckResponse>> {
    let mut conn = state.pool.acquire().await?;
    let users = crate::queries::users::count_users(&mut conn).await?;

    tracing::debug!(users, "Health check requested");
    Ok(Json(HealthCheckResponse {
        status: "ok".to_string(),
    }))
}
