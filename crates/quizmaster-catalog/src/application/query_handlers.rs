//! Query handlers for the catalog context.

use quizmaster_core::error::DomainError;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{Quiz, QuizStatus, normalize_code};
use crate::domain::participant::Participant;
use crate::domain::repository::QuizStore;

/// Read-only summary of a quiz for listings.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    /// The quiz identifier.
    pub quiz_id: Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Join code.
    pub code: String,
    /// Category label.
    pub category: String,
    /// Authoring status.
    pub status: QuizStatus,
    /// Number of questions.
    pub question_count: usize,
    /// Number of joined participants.
    pub participant_count: usize,
    /// Whether a live session is running.
    pub live: bool,
}

async fn summarize(quiz: &Quiz, store: &dyn QuizStore) -> Result<QuizSummary, DomainError> {
    Ok(QuizSummary {
        quiz_id: quiz.id,
        title: quiz.title.clone(),
        description: quiz.description.clone(),
        code: quiz.code.clone(),
        category: quiz.category.clone(),
        status: quiz.status,
        question_count: quiz.questions.len(),
        participant_count: store.participants(quiz.id).await?.len(),
        live: quiz.live,
    })
}

/// Loads a quiz with its full questions (host view).
///
/// # Errors
///
/// Returns `DomainError::QuizNotFound` if the quiz does not exist.
pub async fn get_quiz(quiz_id: Uuid, store: &dyn QuizStore) -> Result<Quiz, DomainError> {
    store
        .load_quiz(quiz_id)
        .await?
        .ok_or(DomainError::QuizNotFound(quiz_id))
}

/// Lists every quiz in creation order.
///
/// # Errors
///
/// Returns a store failure.
pub async fn list_quizzes(store: &dyn QuizStore) -> Result<Vec<QuizSummary>, DomainError> {
    let mut summaries = Vec::new();
    for quiz in store.list_quizzes().await? {
        summaries.push(summarize(&quiz, store).await?);
    }
    Ok(summaries)
}

/// Lists the published quizzes a host may select for a live session.
///
/// # Errors
///
/// Returns a store failure.
pub async fn list_selectable_quizzes(
    store: &dyn QuizStore,
) -> Result<Vec<QuizSummary>, DomainError> {
    let mut summaries = Vec::new();
    for quiz in store.list_quizzes().await?.iter().filter(|q| q.is_published()) {
        summaries.push(summarize(quiz, store).await?);
    }
    Ok(summaries)
}

/// Resolves a published quiz by code, ignoring case and surrounding blanks.
///
/// # Errors
///
/// Returns `DomainError::CodeNotFound` if no published quiz uses the code.
pub async fn find_by_code(code: &str, store: &dyn QuizStore) -> Result<Quiz, DomainError> {
    let code = normalize_code(code);
    store
        .list_quizzes()
        .await?
        .into_iter()
        .find(|q| q.is_published() && normalize_code(&q.code) == code)
        .ok_or(DomainError::CodeNotFound(code))
}

/// Loads one participant of a quiz.
///
/// # Errors
///
/// Returns `DomainError::ParticipantNotFound` if the participant did not join
/// this quiz.
pub async fn get_participant(
    quiz_id: Uuid,
    participant_id: Uuid,
    store: &dyn QuizStore,
) -> Result<Participant, DomainError> {
    store
        .load_participant(quiz_id, participant_id)
        .await?
        .ok_or(DomainError::ParticipantNotFound(participant_id))
}

/// Lists the participants of a quiz in join order.
///
/// # Errors
///
/// Returns `DomainError::QuizNotFound` if the quiz does not exist.
pub async fn list_participants(
    quiz_id: Uuid,
    store: &dyn QuizStore,
) -> Result<Vec<Participant>, DomainError> {
    get_quiz(quiz_id, store).await?;
    store.participants(quiz_id).await
}
