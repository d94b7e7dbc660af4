//! Host dashboard counters.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use quizmaster_live::application::query_handlers::{self, DashboardStats};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(
        query_handlers::dashboard_stats(&*state.store, &state.engine).await?,
    ))
}

/// Returns the router for the dashboard.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}
