//! Commands for the live context.

use quizmaster_catalog::domain::answer::Answer;
use quizmaster_core::command::Command;
use uuid::Uuid;

/// Command to select a published quiz for a live session.
#[derive(Debug, Clone)]
pub struct SelectQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz the session runs.
    pub quiz_id: Uuid,
}

impl Command for SelectQuiz {
    fn command_type(&self) -> &'static str {
        "live.select_quiz"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to show the first question.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz the session runs.
    pub quiz_id: Uuid,
}

impl Command for StartSession {
    fn command_type(&self) -> &'static str {
        "live.start_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to move to the next question, ending after the last.
#[derive(Debug, Clone)]
pub struct AdvanceQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz the session runs.
    pub quiz_id: Uuid,
}

impl Command for AdvanceQuestion {
    fn command_type(&self) -> &'static str {
        "live.advance_question"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to pause the countdown.
#[derive(Debug, Clone)]
pub struct PauseSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz the session runs.
    pub quiz_id: Uuid,
}

impl Command for PauseSession {
    fn command_type(&self) -> &'static str {
        "live.pause_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to resume the countdown.
#[derive(Debug, Clone)]
pub struct ResumeSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz the session runs.
    pub quiz_id: Uuid,
}

impl Command for ResumeSession {
    fn command_type(&self) -> &'static str {
        "live.resume_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to end the session immediately.
#[derive(Debug, Clone)]
pub struct EndSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz the session runs.
    pub quiz_id: Uuid,
}

impl Command for EndSession {
    fn command_type(&self) -> &'static str {
        "live.end_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to record a participant's answer to the current question.
#[derive(Debug, Clone)]
pub struct SubmitAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz the session runs.
    pub quiz_id: Uuid,
    /// The answering participant.
    pub participant_id: Uuid,
    /// The answer; `None` for a blank submission.
    pub answer: Option<Answer>,
}

impl Command for SubmitAnswer {
    fn command_type(&self) -> &'static str {
        "live.submit_answer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
