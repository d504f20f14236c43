//! Health Check API Handler
//!
//! Reports whether the server can still reach its database.

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::api::AppState;

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (StatusCode::OK, "OK"),
        Err(err) => {
            tracing::warn!("Health check failed: {}", err);
            (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
        }
    }
}
