//! Aggregate roots for the catalog context.

use chrono::{DateTime, Utc};
use quizmaster_core::error::{Conflict, DomainError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::question::{Question, QuestionDraft};

/// Authoring status of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizStatus {
    /// Being authored; not joinable.
    Draft,
    /// Joinable and selectable for live sessions.
    Published,
}

/// Normalizes a quiz code for storage and lookup.
#[must_use]
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn checked_code(raw: &str) -> Result<String, DomainError> {
    let code = normalize_code(raw);
    if code.is_empty() {
        return Err(DomainError::validation("quiz code must not be empty"));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DomainError::validation(
            "quiz code may only contain letters and digits",
        ));
    }
    Ok(code)
}

fn checked_title(raw: &str) -> Result<String, DomainError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(DomainError::validation("quiz title must not be empty"));
    }
    Ok(title.to_owned())
}

/// The aggregate root for a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Join code, upper-cased.
    pub code: String,
    /// Category label.
    pub category: String,
    /// Authoring status.
    pub status: QuizStatus,
    /// Questions in presentation order.
    pub questions: Vec<Question>,
    /// Set while a live session for this quiz is running.
    pub live: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    /// Creates a draft quiz with no questions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a blank title or a malformed code.
    pub fn new(
        id: Uuid,
        title: &str,
        description: &str,
        code: &str,
        category: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            title: checked_title(title)?,
            description: description.trim().to_owned(),
            code: checked_code(code)?,
            category: category.trim().to_owned(),
            status: QuizStatus::Draft,
            questions: Vec::new(),
            live: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether the quiz can be joined and run.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == QuizStatus::Published
    }

    fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.live {
            return Err(Conflict::QuizLocked.into());
        }
        Ok(())
    }

    /// Replaces title, description, code and category.
    ///
    /// # Errors
    ///
    /// Returns `QuizLocked` while live, or `DomainError::Validation`.
    pub fn update_details(
        &mut self,
        title: &str,
        description: &str,
        code: &str,
        category: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.ensure_editable()?;
        let title = checked_title(title)?;
        let code = checked_code(code)?;
        self.title = title;
        self.description = description.trim().to_owned();
        self.code = code;
        self.category = category.trim().to_owned();
        self.updated_at = now;
        Ok(())
    }

    /// Marks the quiz as published. Publishing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the stored title or code is blank.
    pub fn publish(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        checked_title(&self.title)?;
        checked_code(&self.code)?;
        if self.status != QuizStatus::Published {
            self.status = QuizStatus::Published;
            self.updated_at = now;
        }
        Ok(())
    }

    /// Validates a draft and appends it as a new question.
    ///
    /// # Errors
    ///
    /// Returns `QuizLocked` while live, or the validation error.
    pub fn add_question(
        &mut self,
        question_id: Uuid,
        draft: QuestionDraft,
        now: DateTime<Utc>,
    ) -> Result<&Question, DomainError> {
        self.ensure_editable()?;
        let question = Question::from_draft(question_id, draft)?;
        self.questions.push(question);
        self.updated_at = now;
        Ok(&self.questions[self.questions.len() - 1])
    }

    /// Replaces a question in place, keeping its id and position.
    ///
    /// # Errors
    ///
    /// Returns `QuizLocked`, `QuestionNotFound`, or the validation error.
    pub fn edit_question(
        &mut self,
        question_id: Uuid,
        draft: QuestionDraft,
        now: DateTime<Utc>,
    ) -> Result<&Question, DomainError> {
        self.ensure_editable()?;
        let position = self.position_of(question_id)?;
        self.questions[position] = Question::from_draft(question_id, draft)?;
        self.updated_at = now;
        Ok(&self.questions[position])
    }

    /// Removes a question.
    ///
    /// # Errors
    ///
    /// Returns `QuizLocked` or `QuestionNotFound`.
    pub fn delete_question(
        &mut self,
        question_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Question, DomainError> {
        self.ensure_editable()?;
        let position = self.position_of(question_id)?;
        let removed = self.questions.remove(position);
        self.updated_at = now;
        Ok(removed)
    }

    fn position_of(&self, question_id: Uuid) -> Result<usize, DomainError> {
        self.questions
            .iter()
            .position(|q| q.id == question_id)
            .ok_or(DomainError::QuestionNotFound(question_id))
    }

    /// Looks up a question by id.
    #[must_use]
    pub fn question(&self, question_id: Uuid) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Questions that contribute points and correctness, in order.
    pub fn gradable_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.is_gradable())
    }

    /// Sum of points over all questions.
    #[must_use]
    pub fn max_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }
}
