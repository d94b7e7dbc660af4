//! Quiz store abstraction.

use async_trait::async_trait;
use quizmaster_core::error::DomainError;
use uuid::Uuid;

use super::aggregates::Quiz;
use super::participant::Participant;

/// Storage for quizzes and the participants who joined them.
///
/// Participants live next to their quiz, keyed by quiz id and kept in join
/// order, so recording a response never rewrites the quiz itself.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Loads a quiz by id.
    async fn load_quiz(&self, quiz_id: Uuid) -> Result<Option<Quiz>, DomainError>;

    /// Lists every quiz in creation order.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, DomainError>;

    /// Inserts or replaces a quiz. The stored `live` flag is kept as is.
    ///
    /// Fails with `DomainError::DuplicateCode` if another quiz already uses
    /// the code (compared case-insensitively), and with `QuizLocked` if the
    /// stored quiz is live.
    async fn upsert_quiz(&self, quiz: Quiz) -> Result<(), DomainError>;

    /// Sets or clears the `live` flag of a stored quiz and returns the quiz
    /// as stored at that moment.
    ///
    /// Fails with `DomainError::QuizNotFound` if the quiz does not exist.
    async fn set_live(&self, quiz_id: Uuid, live: bool) -> Result<Quiz, DomainError>;

    /// Registers a participant, assigning its `join_sequence`.
    ///
    /// Fails with `DomainError::QuizNotFound` if the quiz does not exist.
    async fn insert_participant(&self, participant: Participant)
    -> Result<Participant, DomainError>;

    /// Loads one participant of a quiz.
    async fn load_participant(
        &self,
        quiz_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Option<Participant>, DomainError>;

    /// Replaces a stored participant.
    ///
    /// Fails with `DomainError::ParticipantNotFound` if it was never inserted.
    async fn save_participant(&self, participant: Participant) -> Result<(), DomainError>;

    /// Lists the participants of a quiz in join order.
    async fn participants(&self, quiz_id: Uuid) -> Result<Vec<Participant>, DomainError>;

    /// Total participants across all quizzes.
    async fn participant_count(&self) -> Result<usize, DomainError>;
}
