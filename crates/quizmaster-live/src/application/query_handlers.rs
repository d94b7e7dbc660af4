//! Query handlers for the live context.
//!
//! Results queries read the quiz and its participants from the store and
//! project them; session views are built by the engine under the session
//! lock.

use chrono::{DateTime, Utc};
use quizmaster_catalog::application::query_handlers::get_quiz;
use quizmaster_catalog::domain::question::{ParticipantQuestion, Question};
use quizmaster_catalog::domain::repository::QuizStore;
use quizmaster_core::error::{DomainError, SessionState};
use serde::Serialize;
use uuid::Uuid;

use crate::application::engine::LiveSessionEngine;
use crate::domain::leaderboard::{self, Standing};
use crate::domain::results::{self, ParticipantDetail, QuizAnalytics, ResultsExport};

/// Host view of a live session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// The quiz being run.
    pub quiz_id: Uuid,
    /// Join code.
    pub code: String,
    /// Quiz title.
    pub title: String,
    /// Session state.
    pub state: SessionState,
    /// 0-based index of the current question.
    pub current_question_index: usize,
    /// Number of questions.
    pub question_count: usize,
    /// Seconds left on the countdown.
    pub time_remaining: u32,
    /// Whether the countdown reached zero.
    pub expired: bool,
    /// Number of joined participants.
    pub participant_count: usize,
    /// The current question including its answer key.
    pub current_question: Option<Question>,
    /// When the first question was shown.
    pub started_at: Option<DateTime<Utc>>,
    /// When the session ended.
    pub ended_at: Option<DateTime<Utc>>,
    /// Final standings once ended.
    pub leaderboard: Option<Vec<Standing>>,
}

/// Participant view of a live session.
#[derive(Debug, Clone, Serialize)]
pub struct LiveQuestion {
    /// The quiz being run.
    pub quiz_id: Uuid,
    /// Session state.
    pub state: SessionState,
    /// 0-based index of the current question.
    pub question_index: usize,
    /// Number of questions.
    pub question_count: usize,
    /// Seconds left on the countdown.
    pub time_remaining: u32,
    /// Whether time is up.
    pub expired: bool,
    /// The current question without its answer key; `None` before start
    /// and after the end.
    pub question: Option<ParticipantQuestion>,
}

/// Counters for the host dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// Number of quizzes, drafts included.
    pub total_quizzes: usize,
    /// Number of published quizzes.
    pub published_quizzes: usize,
    /// Participants across every quiz.
    pub total_participants: usize,
    /// Sessions currently showing or paused on a question.
    pub active_sessions: usize,
}

/// Current standings of a quiz.
///
/// # Errors
///
/// Returns `DomainError::QuizNotFound` if the quiz does not exist.
pub async fn leaderboard(quiz_id: Uuid, store: &dyn QuizStore) -> Result<Vec<Standing>, DomainError> {
    get_quiz(quiz_id, store).await?;
    let participants = store.participants(quiz_id).await?;
    Ok(leaderboard::rank(&participants))
}

/// Tabular results of a quiz.
///
/// # Errors
///
/// Returns `DomainError::QuizNotFound` if the quiz does not exist.
pub async fn export_results(quiz_id: Uuid, store: &dyn QuizStore) -> Result<ResultsExport, DomainError> {
    let quiz = get_quiz(quiz_id, store).await?;
    let participants = store.participants(quiz_id).await?;
    Ok(results::export_results(&quiz, &participants))
}

/// Aggregate figures of a quiz.
///
/// # Errors
///
/// Returns `DomainError::QuizNotFound` if the quiz does not exist.
pub async fn analytics(quiz_id: Uuid, store: &dyn QuizStore) -> Result<QuizAnalytics, DomainError> {
    let quiz = get_quiz(quiz_id, store).await?;
    let participants = store.participants(quiz_id).await?;
    Ok(results::analytics(&quiz, &participants))
}

/// One participant's summary and per-question results.
///
/// # Errors
///
/// Returns `QuizNotFound` or `ParticipantNotFound`.
pub async fn participant_detail(
    quiz_id: Uuid,
    participant_id: Uuid,
    store: &dyn QuizStore,
) -> Result<ParticipantDetail, DomainError> {
    let quiz = get_quiz(quiz_id, store).await?;
    let participants = store.participants(quiz_id).await?;
    results::participant_detail(&quiz, &participants, participant_id)
        .ok_or(DomainError::ParticipantNotFound(participant_id))
}

/// Dashboard counters.
///
/// # Errors
///
/// Returns a store failure.
pub async fn dashboard_stats(
    store: &dyn QuizStore,
    engine: &LiveSessionEngine,
) -> Result<DashboardStats, DomainError> {
    let quizzes = store.list_quizzes().await?;
    Ok(DashboardStats {
        total_quizzes: quizzes.len(),
        published_quizzes: quizzes.iter().filter(|q| q.is_published()).count(),
        total_participants: store.participant_count().await?,
        active_sessions: engine.active_session_count().await?,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quizmaster_catalog::application::command_handlers::add_participant;
    use quizmaster_catalog::domain::aggregates::Quiz;
    use quizmaster_catalog::domain::answer::Answer;
    use quizmaster_catalog::domain::participant::Response;
    use quizmaster_catalog::domain::question::{CorrectAnswer, QuestionDraft};
    use quizmaster_catalog::infra::memory::InMemoryQuizStore;
    use quizmaster_core::publisher::NoopPublisher;
    use quizmaster_test_support::{FixedClock, fixed_now};

    use super::*;
    use crate::application::engine::EngineConfig;
    use crate::domain::commands::StartSession;

    fn true_false(points: u32) -> QuestionDraft {
        QuestionDraft {
            kind: "true_false".to_owned(),
            text: "The Earth is flat.".to_owned(),
            options: vec![],
            correct_answers: vec![CorrectAnswer::Bool(false)],
            timer: 20,
            points,
            media: None,
        }
    }

    async fn seeded_store() -> (InMemoryQuizStore, Quiz) {
        let store = InMemoryQuizStore::new();
        let mut quiz = Quiz::new(Uuid::new_v4(), "Facts", "", "FACTS1", "", fixed_now()).unwrap();
        quiz.add_question(Uuid::new_v4(), true_false(5), fixed_now()).unwrap();
        quiz.add_question(Uuid::new_v4(), true_false(5), fixed_now()).unwrap();
        quiz.publish(fixed_now()).unwrap();
        store.upsert_quiz(quiz.clone()).await.unwrap();
        (store, quiz)
    }

    async fn answer(
        store: &InMemoryQuizStore,
        quiz: &Quiz,
        name: &str,
        answers: &[(usize, bool, f64)],
    ) -> Uuid {
        let mut p = add_participant(quiz.id, name, None, &FixedClock::default(), store)
            .await
            .unwrap();
        for (index, value, time) in answers {
            let correct = !value;
            p.record(Response {
                question_id: quiz.questions[*index].id,
                answer: Some(Answer::Boolean(*value)),
                correct,
                points: if correct { 5 } else { 0 },
                response_time: *time,
                graded: true,
                submitted_at: fixed_now(),
            })
            .unwrap();
        }
        let id = p.id;
        store.save_participant(p).await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_leaderboard_ranks_stored_participants() {
        // Arrange
        let (store, quiz) = seeded_store().await;
        answer(&store, &quiz, "Slow", &[(0, false, 9.0), (1, false, 9.0)]).await;
        answer(&store, &quiz, "Fast", &[(0, false, 2.0), (1, false, 2.0)]).await;
        answer(&store, &quiz, "Wrong", &[(0, true, 1.0)]).await;

        // Act
        let standings = leaderboard(quiz.id, &store).await.unwrap();

        // Assert
        let names: Vec<&str> = standings.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Fast", "Slow", "Wrong"]);
        assert_eq!(standings[2].rank, 3);
    }

    #[tokio::test]
    async fn test_results_queries_reject_unknown_quiz() {
        let store = InMemoryQuizStore::new();
        let missing = Uuid::new_v4();

        assert!(matches!(leaderboard(missing, &store).await, Err(DomainError::QuizNotFound(_))));
        assert!(matches!(export_results(missing, &store).await, Err(DomainError::QuizNotFound(_))));
        assert!(matches!(analytics(missing, &store).await, Err(DomainError::QuizNotFound(_))));
    }

    #[tokio::test]
    async fn test_export_has_four_columns_per_question() {
        let (store, quiz) = seeded_store().await;
        answer(&store, &quiz, "Alice", &[(1, false, 3.0)]).await;

        let export = export_results(quiz.id, &store).await.unwrap();

        assert_eq!(export.columns.len(), 7 + 8);
        assert_eq!(export.columns[7], "Q1 Response");
        assert_eq!(export.rows.len(), 1);
        assert!(export.rows[0].cells[0].is_none());
        assert_eq!(export.rows[0].cells[1].as_ref().unwrap().response.as_deref(), Some("False"));
    }

    #[tokio::test]
    async fn test_analytics_average_over_participants() {
        let (store, quiz) = seeded_store().await;
        answer(&store, &quiz, "Full", &[(0, false, 4.0), (1, false, 6.0)]).await;
        answer(&store, &quiz, "Half", &[(0, true, 2.0)]).await;

        let figures = analytics(quiz.id, &store).await.unwrap();

        assert_eq!(figures.participant_count, 2);
        assert!((figures.average_correct_answers - 1.0).abs() < 1e-9);
        assert!((figures.average_score_percent - 50.0).abs() < 1e-9);
        assert!((figures.average_completion_rate - 75.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_participant_detail_lists_every_question() {
        let (store, quiz) = seeded_store().await;
        let id = answer(&store, &quiz, "Alice", &[(0, false, 3.0)]).await;

        let detail = participant_detail(quiz.id, id, &store).await.unwrap();

        assert_eq!(detail.rank, 1);
        assert_eq!(detail.questions.len(), 2);
        assert!(detail.questions[0].answered);
        assert!(!detail.questions[1].answered);
        assert!((detail.completion_rate - 50.0).abs() < 1e-9);

        match participant_detail(quiz.id, Uuid::new_v4(), &store).await.unwrap_err() {
            DomainError::ParticipantNotFound(_) => {}
            other => panic!("expected ParticipantNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dashboard_counts_quizzes_participants_and_sessions() {
        // Arrange
        let (store, quiz) = seeded_store().await;
        let draft = Quiz::new(Uuid::new_v4(), "Draft", "", "DRAFT1", "", fixed_now()).unwrap();
        store.upsert_quiz(draft).await.unwrap();
        answer(&store, &quiz, "Alice", &[]).await;
        let store = Arc::new(store);
        let engine = LiveSessionEngine::new(
            Arc::clone(&store) as Arc<dyn QuizStore>,
            Arc::new(FixedClock::default()),
            Arc::new(NoopPublisher),
            EngineConfig::default(),
        );
        engine
            .start(&StartSession {
                correlation_id: Uuid::new_v4(),
                quiz_id: quiz.id,
            })
            .await
            .unwrap();

        // Act
        let stats = dashboard_stats(store.as_ref(), &engine).await.unwrap();

        // Assert
        assert_eq!(stats.total_quizzes, 2);
        assert_eq!(stats.published_quizzes, 1);
        assert_eq!(stats.total_participants, 1);
        assert_eq!(stats.active_sessions, 1);
    }
}
