//! Routes for quiz authoring: the question catalog and quiz repository.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post, routing::put};
use quizmaster_catalog::application::{command_handlers, query_handlers};
use quizmaster_catalog::domain::aggregates::Quiz;
use quizmaster_catalog::domain::commands;
use quizmaster_catalog::domain::participant::Participant;
use quizmaster_catalog::domain::question::{Question, QuestionDraft};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateQuizRequest {
    /// Quiz title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Join code; generated when absent or blank.
    #[serde(default)]
    pub code: Option<String>,
}

/// Request body for PUT /{id}.
#[derive(Debug, Deserialize)]
pub struct UpdateQuizRequest {
    /// New title.
    pub title: String,
    /// New description.
    #[serde(default)]
    pub description: String,
    /// New join code.
    pub code: String,
    /// New category.
    #[serde(default)]
    pub category: String,
}

/// Query string for GET /.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Only published quizzes, as offered for a live session.
    #[serde(default)]
    pub selectable: bool,
}

/// POST /
#[instrument(skip(state, request), fields(title = %request.title))]
async fn create_quiz(
    State(state): State<AppState>,
    Json(request): Json<CreateQuizRequest>,
) -> Result<(StatusCode, Json<Quiz>), ApiError> {
    let command = commands::CreateQuiz {
        correlation_id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
        category: request.category,
        code: request.code,
        code_length: state.code_length,
    };

    info!(correlation_id = %command.correlation_id, "handling create_quiz command");

    let quiz = command_handlers::handle_create_quiz(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.store,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// GET /
async fn list_quizzes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<query_handlers::QuizSummary>>, ApiError> {
    let summaries = if query.selectable {
        query_handlers::list_selectable_quizzes(&*state.store).await?
    } else {
        query_handlers::list_quizzes(&*state.store).await?
    };
    Ok(Json(summaries))
}

/// GET /{id}
async fn get_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<Quiz>, ApiError> {
    Ok(Json(query_handlers::get_quiz(quiz_id, &*state.store).await?))
}

/// PUT /{id}
#[instrument(skip(state, request), fields(quiz_id = %quiz_id))]
async fn update_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Json(request): Json<UpdateQuizRequest>,
) -> Result<Json<Quiz>, ApiError> {
    let command = commands::UpdateQuizDetails {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        title: request.title,
        description: request.description,
        code: request.code,
        category: request.category,
    };

    info!(correlation_id = %command.correlation_id, "handling update_quiz_details command");

    let quiz =
        command_handlers::handle_update_quiz_details(&command, state.clock.as_ref(), &*state.store)
            .await?;
    Ok(Json(quiz))
}

/// POST /{id}/publish
#[instrument(skip(state), fields(quiz_id = %quiz_id))]
async fn publish_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<Quiz>, ApiError> {
    let command = commands::PublishQuiz {
        correlation_id: Uuid::new_v4(),
        quiz_id,
    };

    info!(correlation_id = %command.correlation_id, "handling publish_quiz command");

    let quiz =
        command_handlers::handle_publish_quiz(&command, state.clock.as_ref(), &*state.store)
            .await?;
    Ok(Json(quiz))
}

/// POST /{id}/questions
#[instrument(skip(state, draft), fields(quiz_id = %quiz_id, question_type = %draft.kind))]
async fn add_question(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Json(draft): Json<QuestionDraft>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    let command = commands::AddQuestion {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        draft,
    };

    info!(correlation_id = %command.correlation_id, "handling add_question command");

    let question =
        command_handlers::handle_add_question(&command, state.clock.as_ref(), &*state.store)
            .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// PUT /{id}/questions/{qid}
#[instrument(skip(state, draft), fields(quiz_id = %quiz_id, question_id = %question_id))]
async fn edit_question(
    State(state): State<AppState>,
    Path((quiz_id, question_id)): Path<(Uuid, Uuid)>,
    Json(draft): Json<QuestionDraft>,
) -> Result<Json<Question>, ApiError> {
    let command = commands::EditQuestion {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        question_id,
        draft,
    };

    info!(correlation_id = %command.correlation_id, "handling edit_question command");

    let question =
        command_handlers::handle_edit_question(&command, state.clock.as_ref(), &*state.store)
            .await?;
    Ok(Json(question))
}

/// DELETE /{id}/questions/{qid}
#[instrument(skip(state), fields(quiz_id = %quiz_id, question_id = %question_id))]
async fn delete_question(
    State(state): State<AppState>,
    Path((quiz_id, question_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Question>, ApiError> {
    let command = commands::DeleteQuestion {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        question_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_question command");

    let removed =
        command_handlers::handle_delete_question(&command, state.clock.as_ref(), &*state.store)
            .await?;
    Ok(Json(removed))
}

/// GET /{id}/participants
async fn list_participants(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<Vec<Participant>>, ApiError> {
    Ok(Json(query_handlers::list_participants(quiz_id, &*state.store).await?))
}

/// Returns the router for quiz authoring.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_quiz).get(list_quizzes))
        .route("/{id}", get(get_quiz).put(update_quiz))
        .route("/{id}/publish", post(publish_quiz))
        .route("/{id}/questions", post(add_question))
        .route(
            "/{id}/questions/{qid}",
            put(edit_question).delete(delete_question),
        )
        .route("/{id}/participants", get(list_participants))
}
