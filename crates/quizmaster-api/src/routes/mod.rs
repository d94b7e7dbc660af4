//! Route modules organized by bounded context.

use axum::Router;

use crate::state::AppState;

pub mod dashboard;
pub mod health;
pub mod join;
pub mod live;
pub mod quizzes;
pub mod results;

/// Returns the full `/api/v1` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", health::router())
        .nest("/api/v1/quizzes", quizzes::router())
        .nest("/api/v1/join", join::router())
        .nest("/api/v1/live", live::router())
        .nest("/api/v1/results", results::router())
        .nest("/api/v1/dashboard", dashboard::router())
}
