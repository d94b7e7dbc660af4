//! Commands for the catalog context.

use quizmaster_core::command::Command;
use uuid::Uuid;

use super::question::QuestionDraft;

/// Command to create a draft quiz.
#[derive(Debug, Clone)]
pub struct CreateQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Quiz title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Explicit join code; generated when absent.
    pub code: Option<String>,
    /// Length of a generated code.
    pub code_length: usize,
}

impl Command for CreateQuiz {
    fn command_type(&self) -> &'static str {
        "catalog.create_quiz"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to replace a quiz's title, description, code and category.
#[derive(Debug, Clone)]
pub struct UpdateQuizDetails {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz to update.
    pub quiz_id: Uuid,
    /// New title.
    pub title: String,
    /// New description.
    pub description: String,
    /// New join code.
    pub code: String,
    /// New category.
    pub category: String,
}

impl Command for UpdateQuizDetails {
    fn command_type(&self) -> &'static str {
        "catalog.update_quiz_details"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to publish a quiz.
#[derive(Debug, Clone)]
pub struct PublishQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz to publish.
    pub quiz_id: Uuid,
}

impl Command for PublishQuiz {
    fn command_type(&self) -> &'static str {
        "catalog.publish_quiz"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to append a question to a quiz.
#[derive(Debug, Clone)]
pub struct AddQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The target quiz.
    pub quiz_id: Uuid,
    /// The authored question.
    pub draft: QuestionDraft,
}

impl Command for AddQuestion {
    fn command_type(&self) -> &'static str {
        "catalog.add_question"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to replace a question in place.
#[derive(Debug, Clone)]
pub struct EditQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The target quiz.
    pub quiz_id: Uuid,
    /// The question to replace.
    pub question_id: Uuid,
    /// The authored replacement.
    pub draft: QuestionDraft,
}

impl Command for EditQuestion {
    fn command_type(&self) -> &'static str {
        "catalog.edit_question"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to remove a question.
#[derive(Debug, Clone)]
pub struct DeleteQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The target quiz.
    pub quiz_id: Uuid,
    /// The question to remove.
    pub question_id: Uuid,
}

impl Command for DeleteQuestion {
    fn command_type(&self) -> &'static str {
        "catalog.delete_question"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to join a published quiz by its code.
#[derive(Debug, Clone)]
pub struct JoinQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The join code, any case.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional contact email.
    pub email: Option<String>,
}

impl Command for JoinQuiz {
    fn command_type(&self) -> &'static str {
        "catalog.join_quiz"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
