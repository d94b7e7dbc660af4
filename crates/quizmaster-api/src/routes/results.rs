//! Routes for leaderboards and results.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use quizmaster_live::application::query_handlers;
use quizmaster_live::domain::leaderboard::Standing;
use quizmaster_live::domain::results::{ParticipantDetail, QuizAnalytics, ResultsExport};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /{id}/leaderboard
async fn leaderboard(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<Vec<Standing>>, ApiError> {
    Ok(Json(query_handlers::leaderboard(quiz_id, &*state.store).await?))
}

/// GET /{id}/export
async fn export(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<ResultsExport>, ApiError> {
    Ok(Json(query_handlers::export_results(quiz_id, &*state.store).await?))
}

/// GET /{id}/analytics
async fn analytics(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<QuizAnalytics>, ApiError> {
    Ok(Json(query_handlers::analytics(quiz_id, &*state.store).await?))
}

/// GET /{id}/participants/{pid}
async fn participant_detail(
    State(state): State<AppState>,
    Path((quiz_id, participant_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ParticipantDetail>, ApiError> {
    Ok(Json(
        query_handlers::participant_detail(quiz_id, participant_id, &*state.store).await?,
    ))
}

/// Returns the router for results.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/leaderboard", get(leaderboard))
        .route("/{id}/export", get(export))
        .route("/{id}/analytics", get(analytics))
        .route("/{id}/participants/{pid}", get(participant_detail))
}
