//! Command handlers for the catalog context.
//!
//! Each handler loads the quiz, applies the command through the aggregate,
//! and stores the result.

use std::collections::HashSet;
use std::sync::Mutex;

use quizmaster_core::clock::Clock;
use quizmaster_core::command::Command;
use quizmaster_core::error::{Conflict, DomainError};
use quizmaster_core::rng::DeterministicRng;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::codes::create_code;
use crate::application::query_handlers::find_by_code;
use crate::domain::aggregates::{Quiz, normalize_code};
use crate::domain::commands::{
    AddQuestion, CreateQuiz, DeleteQuestion, EditQuestion, JoinQuiz, PublishQuiz,
    UpdateQuizDetails,
};
use crate::domain::participant::Participant;
use crate::domain::question::Question;
use crate::domain::repository::QuizStore;

async fn load(store: &dyn QuizStore, quiz_id: Uuid) -> Result<Quiz, DomainError> {
    store
        .load_quiz(quiz_id)
        .await?
        .ok_or(DomainError::QuizNotFound(quiz_id))
}

/// Handles the `CreateQuiz` command: generates a code when none was given,
/// builds a draft quiz and stores it.
///
/// The `Mutex` is locked only around code generation, never across an await.
///
/// # Errors
///
/// Returns `DomainError::Validation`, `DuplicateCode`, `CodeSpaceExhausted`,
/// or a store failure.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id()))]
pub async fn handle_create_quiz(
    command: &CreateQuiz,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    store: &dyn QuizStore,
) -> Result<Quiz, DomainError> {
    let code = match command.code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => code.to_owned(),
        _ => {
            let taken: HashSet<String> = store
                .list_quizzes()
                .await?
                .iter()
                .map(|q| normalize_code(&q.code))
                .collect();
            let mut rng_guard = rng
                .lock()
                .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
            create_code(&taken, command.code_length, &mut *rng_guard)?
        }
    };

    let quiz = Quiz::new(
        Uuid::new_v4(),
        &command.title,
        &command.description,
        &code,
        &command.category,
        clock.now(),
    )?;
    store.upsert_quiz(quiz.clone()).await?;

    info!(quiz_id = %quiz.id, code = %quiz.code, "quiz created");
    Ok(quiz)
}

/// Handles the `UpdateQuizDetails` command.
///
/// # Errors
///
/// Returns `QuizNotFound`, `QuizLocked`, `DomainError::Validation` or
/// `DuplicateCode`.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id(), quiz_id = %command.quiz_id))]
pub async fn handle_update_quiz_details(
    command: &UpdateQuizDetails,
    clock: &dyn Clock,
    store: &dyn QuizStore,
) -> Result<Quiz, DomainError> {
    let mut quiz = load(store, command.quiz_id).await?;
    quiz.update_details(
        &command.title,
        &command.description,
        &command.code,
        &command.category,
        clock.now(),
    )?;
    store.upsert_quiz(quiz.clone()).await?;

    info!("quiz details updated");
    Ok(quiz)
}

/// Handles the `PublishQuiz` command.
///
/// # Errors
///
/// Returns `QuizNotFound`, `DomainError::Validation` or a store failure.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id(), quiz_id = %command.quiz_id))]
pub async fn handle_publish_quiz(
    command: &PublishQuiz,
    clock: &dyn Clock,
    store: &dyn QuizStore,
) -> Result<Quiz, DomainError> {
    let mut quiz = load(store, command.quiz_id).await?;
    quiz.publish(clock.now())?;
    store.upsert_quiz(quiz.clone()).await?;

    info!(code = %quiz.code, "quiz published");
    Ok(quiz)
}

/// Handles the `AddQuestion` command.
///
/// # Errors
///
/// Returns `QuizNotFound`, `QuizLocked`, `UnknownQuestionType` or
/// `DomainError::Validation`.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id(), quiz_id = %command.quiz_id))]
pub async fn handle_add_question(
    command: &AddQuestion,
    clock: &dyn Clock,
    store: &dyn QuizStore,
) -> Result<Question, DomainError> {
    let mut quiz = load(store, command.quiz_id).await?;
    let question = quiz
        .add_question(Uuid::new_v4(), command.draft.clone(), clock.now())?
        .clone();
    store.upsert_quiz(quiz).await?;

    info!(question_id = %question.id, kind = %question.kind, "question added");
    Ok(question)
}

/// Handles the `EditQuestion` command.
///
/// # Errors
///
/// Returns `QuizNotFound`, `QuestionNotFound`, `QuizLocked`,
/// `UnknownQuestionType` or `DomainError::Validation`.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id(), quiz_id = %command.quiz_id))]
pub async fn handle_edit_question(
    command: &EditQuestion,
    clock: &dyn Clock,
    store: &dyn QuizStore,
) -> Result<Question, DomainError> {
    let mut quiz = load(store, command.quiz_id).await?;
    let question = quiz
        .edit_question(command.question_id, command.draft.clone(), clock.now())?
        .clone();
    store.upsert_quiz(quiz).await?;

    info!(question_id = %question.id, "question edited");
    Ok(question)
}

/// Handles the `DeleteQuestion` command and returns the removed question.
///
/// # Errors
///
/// Returns `QuizNotFound`, `QuestionNotFound` or `QuizLocked`.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id(), quiz_id = %command.quiz_id))]
pub async fn handle_delete_question(
    command: &DeleteQuestion,
    clock: &dyn Clock,
    store: &dyn QuizStore,
) -> Result<Question, DomainError> {
    let mut quiz = load(store, command.quiz_id).await?;
    let removed = quiz.delete_question(command.question_id, clock.now())?;
    store.upsert_quiz(quiz).await?;

    info!(question_id = %removed.id, "question deleted");
    Ok(removed)
}

/// Registers a participant in a published quiz.
///
/// # Errors
///
/// Returns `QuizNotFound`, `QuizNotPublished`, or `DomainError::Validation`
/// for a blank name.
pub async fn add_participant(
    quiz_id: Uuid,
    name: &str,
    email: Option<&str>,
    clock: &dyn Clock,
    store: &dyn QuizStore,
) -> Result<Participant, DomainError> {
    let quiz = load(store, quiz_id).await?;
    if !quiz.is_published() {
        return Err(Conflict::QuizNotPublished.into());
    }
    let participant = Participant::new(Uuid::new_v4(), quiz.id, name, email, clock.now())?;
    store.insert_participant(participant).await
}

/// Handles the `JoinQuiz` command: resolves the code, then registers the
/// participant.
///
/// # Errors
///
/// Returns `CodeNotFound` or the errors of [`add_participant`].
#[instrument(skip_all, fields(correlation_id = %command.correlation_id()))]
pub async fn handle_join_quiz(
    command: &JoinQuiz,
    clock: &dyn Clock,
    store: &dyn QuizStore,
) -> Result<Participant, DomainError> {
    let quiz = find_by_code(&command.code, store).await?;
    let participant =
        add_participant(quiz.id, &command.name, command.email.as_deref(), clock, store).await?;

    info!(
        quiz_id = %quiz.id,
        participant_id = %participant.id,
        join_sequence = participant.join_sequence,
        "participant joined"
    );
    Ok(participant)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use quizmaster_core::error::{Conflict, DomainError};
    use quizmaster_core::rng::DeterministicRng;
    use quizmaster_test_support::{FixedClock, MockRng, SequenceRng};
    use uuid::Uuid;

    use super::*;
    use crate::application::codes::DEFAULT_CODE_LENGTH;
    use crate::domain::aggregates::QuizStatus;
    use crate::domain::question::{CorrectAnswer, QuestionDraft};
    use crate::infra::memory::InMemoryQuizStore;

    fn create(title: &str, code: Option<&str>) -> CreateQuiz {
        CreateQuiz {
            correlation_id: Uuid::new_v4(),
            title: title.to_owned(),
            description: String::new(),
            category: "General Knowledge".to_owned(),
            code: code.map(str::to_owned),
            code_length: DEFAULT_CODE_LENGTH,
        }
    }

    fn capital_of_france() -> QuestionDraft {
        QuestionDraft {
            kind: "single_choice".into(),
            text: "What is the capital of France?".into(),
            options: vec!["London".into(), "Berlin".into(), "Paris".into(), "Madrid".into()],
            correct_answers: vec![CorrectAnswer::Index(2)],
            timer: 30,
            points: 10,
            media: None,
        }
    }

    async fn published_quiz(store: &InMemoryQuizStore) -> Quiz {
        let rng: Mutex<MockRng> = Mutex::new(MockRng);
        let rng_ref: &Mutex<dyn DeterministicRng + Send> = &rng;
        let quiz = handle_create_quiz(&create("Sample Quiz", Some("demo123")), &FixedClock::default(), rng_ref, store)
            .await
            .unwrap();
        handle_publish_quiz(
            &PublishQuiz {
                correlation_id: Uuid::new_v4(),
                quiz_id: quiz.id,
            },
            &FixedClock::default(),
            store,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_quiz_generates_code_from_rng() {
        // Arrange
        let store = InMemoryQuizStore::new();
        let rng: Mutex<SequenceRng> = Mutex::new(SequenceRng::new(vec![19, 4, 2, 7, 30, 31]));
        let rng_ref: &Mutex<dyn DeterministicRng + Send> = &rng;

        // Act
        let quiz = handle_create_quiz(&create("Tech", None), &FixedClock::default(), rng_ref, &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(quiz.code, "TECH45");
        assert_eq!(quiz.status, QuizStatus::Draft);
        assert_eq!(store.list_quizzes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_quiz_with_taken_code_fails() {
        let store = InMemoryQuizStore::new();
        published_quiz(&store).await;
        let rng: Mutex<MockRng> = Mutex::new(MockRng);
        let rng_ref: &Mutex<dyn DeterministicRng + Send> = &rng;

        let result =
            handle_create_quiz(&create("Copy", Some(" Demo123")), &FixedClock::default(), rng_ref, &store).await;

        assert!(matches!(result, Err(DomainError::DuplicateCode(_))));
    }

    #[tokio::test]
    async fn test_create_publish_then_find_by_code_returns_same_quiz() {
        // Arrange
        let store = InMemoryQuizStore::new();

        // Act
        let quiz = published_quiz(&store).await;
        let found = find_by_code("  demo123 ", &store).await.unwrap();

        // Assert
        assert_eq!(found.id, quiz.id);
        assert!(found.is_published());
    }

    #[tokio::test]
    async fn test_add_question_stores_validated_question() {
        let store = InMemoryQuizStore::new();
        let quiz = published_quiz(&store).await;

        let question = handle_add_question(
            &AddQuestion {
                correlation_id: Uuid::new_v4(),
                quiz_id: quiz.id,
                draft: capital_of_france(),
            },
            &FixedClock::default(),
            &store,
        )
        .await
        .unwrap();

        let stored = store.load_quiz(quiz.id).await.unwrap().unwrap();
        assert_eq!(stored.questions, vec![question]);
    }

    #[tokio::test]
    async fn test_add_question_to_live_quiz_is_locked() {
        // Arrange
        let store = InMemoryQuizStore::new();
        let quiz = published_quiz(&store).await;
        store.set_live(quiz.id, true).await.unwrap();

        // Act
        let result = handle_add_question(
            &AddQuestion {
                correlation_id: Uuid::new_v4(),
                quiz_id: quiz.id,
                draft: capital_of_france(),
            },
            &FixedClock::default(),
            &store,
        )
        .await;

        // Assert
        match result.unwrap_err() {
            DomainError::StateConflict(Conflict::QuizLocked) => {}
            other => panic!("expected QuizLocked, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_edit_and_delete_question() {
        let store = InMemoryQuizStore::new();
        let quiz = published_quiz(&store).await;
        let added = handle_add_question(
            &AddQuestion {
                correlation_id: Uuid::new_v4(),
                quiz_id: quiz.id,
                draft: capital_of_france(),
            },
            &FixedClock::default(),
            &store,
        )
        .await
        .unwrap();

        let mut draft = capital_of_france();
        draft.points = 20;
        let edited = handle_edit_question(
            &EditQuestion {
                correlation_id: Uuid::new_v4(),
                quiz_id: quiz.id,
                question_id: added.id,
                draft,
            },
            &FixedClock::default(),
            &store,
        )
        .await
        .unwrap();
        assert_eq!(edited.id, added.id);
        assert_eq!(edited.points, 20);

        handle_delete_question(
            &DeleteQuestion {
                correlation_id: Uuid::new_v4(),
                quiz_id: quiz.id,
                question_id: added.id,
            },
            &FixedClock::default(),
            &store,
        )
        .await
        .unwrap();
        assert!(store.load_quiz(quiz.id).await.unwrap().unwrap().questions.is_empty());
    }

    #[tokio::test]
    async fn test_join_quiz_by_code_registers_participant() {
        // Arrange
        let store = InMemoryQuizStore::new();
        let quiz = published_quiz(&store).await;
        let command = JoinQuiz {
            correlation_id: Uuid::new_v4(),
            code: " demo123".to_owned(),
            name: "Alice Johnson".to_owned(),
            email: Some("alice@example.com".to_owned()),
        };

        // Act
        let participant = handle_join_quiz(&command, &FixedClock::default(), &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(participant.quiz_id, quiz.id);
        assert_eq!(participant.join_sequence, 0);
        assert!(participant.responses.is_empty());
        assert_eq!(store.participants(quiz.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_join_unknown_code_fails() {
        let store = InMemoryQuizStore::new();
        let command = JoinQuiz {
            correlation_id: Uuid::new_v4(),
            code: "NOPE99".to_owned(),
            name: "Alice".to_owned(),
            email: None,
        };

        match handle_join_quiz(&command, &FixedClock::default(), &store)
            .await
            .unwrap_err()
        {
            DomainError::CodeNotFound(code) => assert_eq!(code, "NOPE99"),
            other => panic!("expected CodeNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_participant_to_draft_quiz_fails() {
        let store = InMemoryQuizStore::new();
        let rng: Mutex<MockRng> = Mutex::new(MockRng);
        let rng_ref: &Mutex<dyn DeterministicRng + Send> = &rng;
        let draft = handle_create_quiz(&create("Draft", None), &FixedClock::default(), rng_ref, &store)
            .await
            .unwrap();

        let result = add_participant(draft.id, "Bob", None, &FixedClock::default(), &store).await;

        assert!(matches!(
            result,
            Err(DomainError::StateConflict(Conflict::QuizNotPublished))
        ));
    }

    #[tokio::test]
    async fn test_add_participant_with_blank_name_fails() {
        let store = InMemoryQuizStore::new();
        let quiz = published_quiz(&store).await;

        let result = add_participant(quiz.id, "   ", None, &FixedClock::default(), &store).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(store.participants(quiz.id).await.unwrap().is_empty());
    }
}
