//! Routes for the live session engine: host pacing and participant answers.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get, routing::post};
use quizmaster_catalog::domain::answer::Answer;
use quizmaster_catalog::domain::participant::Response;
use quizmaster_live::application::query_handlers::{LiveQuestion, SessionSnapshot};
use quizmaster_live::domain::commands;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{id}/responses.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    /// The answering participant.
    pub participant_id: Uuid,
    /// The answer; omitted or null for a blank submission.
    #[serde(default)]
    pub answer: Option<Answer>,
}

/// POST /{id}/select
#[instrument(skip(state), fields(quiz_id = %quiz_id))]
async fn select(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let command = commands::SelectQuiz {
        correlation_id: Uuid::new_v4(),
        quiz_id,
    };
    info!(correlation_id = %command.correlation_id, "handling select_quiz command");
    Ok(Json(state.engine.select(&command).await?))
}

/// POST /{id}/start
#[instrument(skip(state), fields(quiz_id = %quiz_id))]
async fn start(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let command = commands::StartSession {
        correlation_id: Uuid::new_v4(),
        quiz_id,
    };
    info!(correlation_id = %command.correlation_id, "handling start_session command");
    Ok(Json(state.engine.start(&command).await?))
}

/// POST /{id}/advance
#[instrument(skip(state), fields(quiz_id = %quiz_id))]
async fn advance(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let command = commands::AdvanceQuestion {
        correlation_id: Uuid::new_v4(),
        quiz_id,
    };
    info!(correlation_id = %command.correlation_id, "handling advance_question command");
    Ok(Json(state.engine.advance(&command).await?))
}

/// POST /{id}/pause
#[instrument(skip(state), fields(quiz_id = %quiz_id))]
async fn pause(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let command = commands::PauseSession {
        correlation_id: Uuid::new_v4(),
        quiz_id,
    };
    info!(correlation_id = %command.correlation_id, "handling pause_session command");
    Ok(Json(state.engine.pause(&command).await?))
}

/// POST /{id}/resume
#[instrument(skip(state), fields(quiz_id = %quiz_id))]
async fn resume(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let command = commands::ResumeSession {
        correlation_id: Uuid::new_v4(),
        quiz_id,
    };
    info!(correlation_id = %command.correlation_id, "handling resume_session command");
    Ok(Json(state.engine.resume(&command).await?))
}

/// POST /{id}/end
#[instrument(skip(state), fields(quiz_id = %quiz_id))]
async fn end(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let command = commands::EndSession {
        correlation_id: Uuid::new_v4(),
        quiz_id,
    };
    info!(correlation_id = %command.correlation_id, "handling end_session command");
    Ok(Json(state.engine.end(&command).await?))
}

/// GET /{id}
async fn snapshot(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.engine.snapshot(quiz_id).await?))
}

/// GET /{id}/question
async fn current_question(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<LiveQuestion>, ApiError> {
    Ok(Json(state.engine.current_question_for_participants(quiz_id).await?))
}

/// POST /{id}/responses
#[instrument(skip(state, request), fields(quiz_id = %quiz_id, participant_id = %request.participant_id))]
async fn submit_response(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<Response>, ApiError> {
    let command = commands::SubmitAnswer {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        participant_id: request.participant_id,
        answer: request.answer,
    };
    info!(correlation_id = %command.correlation_id, "handling submit_answer command");
    Ok(Json(state.engine.submit_response(&command).await?))
}

/// Returns the router for live sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(snapshot))
        .route("/{id}/question", get(current_question))
        .route("/{id}/select", post(select))
        .route("/{id}/start", post(start))
        .route("/{id}/advance", post(advance))
        .route("/{id}/pause", post(pause))
        .route("/{id}/resume", post(resume))
        .route("/{id}/end", post(end))
        .route("/{id}/responses", post(submit_response))
}
