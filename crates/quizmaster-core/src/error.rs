//! Domain error types.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Coarse error classification used by callers to decide how to surface a
/// rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad authoring or submission input.
    Validation,
    /// A quiz, question, participant or code could not be resolved.
    NotFound,
    /// The operation is invalid for the current quiz or session state.
    StateConflict,
    /// A participant already answered the current question.
    DuplicateSubmission,
    /// No free quiz code could be generated; the caller may retry.
    CodeSpaceExhausted,
    /// Storage or other infrastructure failure.
    Infrastructure,
}

/// Live session states, shared so conflicts can name the offending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Quiz selected, not yet started.
    Idle,
    /// A question is being shown.
    Question,
    /// Countdown suspended by the host.
    Paused,
    /// Terminal state.
    Ended,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Question => "question",
            Self::Paused => "paused",
            Self::Ended => "ended",
        })
    }
}

/// Reasons an operation conflicts with the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Conflict {
    /// No live session exists for the quiz.
    #[error("no quiz selected for a live session")]
    NoQuizSelected,

    /// The quiz has nothing to present.
    #[error("quiz has no questions")]
    QuizHasNoQuestions,

    /// A session for the quiz is already running.
    #[error("a live session is already active for this quiz")]
    AlreadyActive,

    /// Only published quizzes can be joined or run.
    #[error("quiz is not published")]
    QuizNotPublished,

    /// Answers are only accepted while a question is shown.
    #[error("session is not accepting answers")]
    SessionNotAcceptingAnswers,

    /// The quiz is referenced by a running session and cannot be edited.
    #[error("quiz is locked by an active live session")]
    QuizLocked,

    /// A pacing operation was issued in a state that does not allow it.
    #[error("cannot {operation} a session in state {state}")]
    InvalidTransition {
        /// The rejected operation.
        operation: &'static str,
        /// The state the session was in.
        state: SessionState,
    },
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An unrecognized question type name.
    #[error("unknown question type: {0}")]
    UnknownQuestionType(String),

    /// The quiz code is already used by another quiz.
    #[error("quiz code {0} is already in use")]
    DuplicateCode(String),

    /// A quiz was not found.
    #[error("quiz not found: {0}")]
    QuizNotFound(Uuid),

    /// No published quiz matches the code.
    #[error("no published quiz with code {0}")]
    CodeNotFound(String),

    /// A question was not found in its quiz.
    #[error("question not found: {0}")]
    QuestionNotFound(Uuid),

    /// A participant was not found in its quiz.
    #[error("participant not found: {0}")]
    ParticipantNotFound(Uuid),

    /// The operation is invalid for the current state.
    #[error("state conflict: {0}")]
    StateConflict(#[from] Conflict),

    /// A second answer for the same question was rejected.
    #[error("participant {participant_id} already answered question {question_id}")]
    DuplicateSubmission {
        /// The submitting participant.
        participant_id: Uuid,
        /// The question already answered.
        question_id: Uuid,
    },

    /// Code generation gave up after the retry cap.
    #[error("could not generate a unique quiz code after {attempts} attempts")]
    CodeSpaceExhausted {
        /// Number of candidates tried.
        attempts: u32,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::UnknownQuestionType(_) | Self::DuplicateCode(_) => {
                ErrorKind::Validation
            }
            Self::QuizNotFound(_)
            | Self::CodeNotFound(_)
            | Self::QuestionNotFound(_)
            | Self::ParticipantNotFound(_) => ErrorKind::NotFound,
            Self::StateConflict(_) => ErrorKind::StateConflict,
            Self::DuplicateSubmission { .. } => ErrorKind::DuplicateSubmission,
            Self::CodeSpaceExhausted { .. } => ErrorKind::CodeSpaceExhausted,
            Self::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }

    /// Returns a stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::UnknownQuestionType(_) => "unknown_question_type",
            Self::DuplicateCode(_) => "duplicate_code",
            Self::QuizNotFound(_) => "quiz_not_found",
            Self::CodeNotFound(_) => "code_not_found",
            Self::QuestionNotFound(_) => "question_not_found",
            Self::ParticipantNotFound(_) => "participant_not_found",
            Self::StateConflict(conflict) => match conflict {
                Conflict::NoQuizSelected => "no_quiz_selected",
                Conflict::QuizHasNoQuestions => "quiz_has_no_questions",
                Conflict::AlreadyActive => "already_active",
                Conflict::QuizNotPublished => "quiz_not_published",
                Conflict::SessionNotAcceptingAnswers => "session_not_accepting_answers",
                Conflict::QuizLocked => "quiz_locked",
                Conflict::InvalidTransition { .. } => "invalid_transition",
            },
            Self::DuplicateSubmission { .. } => "duplicate_submission",
            Self::CodeSpaceExhausted { .. } => "code_space_exhausted",
            Self::Infrastructure(_) => "infrastructure_error",
        }
    }

    /// Shorthand for a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }
}
