//! Participant join by quiz code.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use quizmaster_catalog::application::command_handlers;
use quizmaster_catalog::domain::commands;
use quizmaster_catalog::domain::participant::Participant;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    /// Quiz code, any case.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional contact email.
    #[serde(default)]
    pub email: Option<String>,
}

/// POST /
#[instrument(skip(state, request), fields(code = %request.code))]
async fn join_quiz(
    State(state): State<AppState>,
    Json(request): Json<JoinRequest>,
) -> Result<(StatusCode, Json<Participant>), ApiError> {
    let command = commands::JoinQuiz {
        correlation_id: Uuid::new_v4(),
        code: request.code,
        name: request.name,
        email: request.email,
    };

    info!(correlation_id = %command.correlation_id, "handling join_quiz command");

    let participant =
        command_handlers::handle_join_quiz(&command, state.clock.as_ref(), &*state.store).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

/// Returns the router for joining quizzes.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(join_quiz))
}
