//! Grading rules per question type.

use quizmaster_catalog::domain::answer::Answer;
use quizmaster_catalog::domain::question::{AnswerKey, Question, QuestionType};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Result of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreOutcome {
    /// Whether the answer matched the key.
    pub correct: bool,
    /// Points awarded: the question's points when correct, otherwise 0.
    pub points_awarded: u32,
}

impl ScoreOutcome {
    fn graded(correct: bool, question: &Question) -> Self {
        Self {
            correct,
            points_awarded: if correct { question.points } else { 0 },
        }
    }
}

/// Reasons an answer cannot be graded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// No answer, or an empty one, for a gradable question.
    #[error("no answer given for question {question_id}")]
    MissingAnswer {
        /// The question being graded.
        question_id: Uuid,
    },

    /// The answer variant does not fit the question type.
    #[error("answer does not fit a {expected} question ({question_id})")]
    AnswerShapeMismatch {
        /// The question being graded.
        question_id: Uuid,
        /// The question's type.
        expected: QuestionType,
    },
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Grades `submitted` against the question's answer key.
///
/// Instruction slides accept anything, including no answer, and score as
/// correct with 0 points. Out-of-range option indices are simply wrong.
///
/// # Errors
///
/// Returns `ScoringError::MissingAnswer` for an absent or blank answer to a
/// gradable question, and `ScoringError::AnswerShapeMismatch` when the
/// answer variant does not fit the type.
pub fn score(question: &Question, submitted: Option<&Answer>) -> Result<ScoreOutcome, ScoringError> {
    if !question.is_gradable() {
        return Ok(ScoreOutcome {
            correct: true,
            points_awarded: 0,
        });
    }

    let answer = submitted
        .filter(|a| !a.is_blank())
        .ok_or(ScoringError::MissingAnswer {
            question_id: question.id,
        })?;

    let correct = match (question.kind, &question.answer_key, answer) {
        (QuestionType::SingleChoice, AnswerKey::Choices(key), Answer::Choice(index)) => {
            key.contains(index)
        }
        (QuestionType::MultipleChoice, AnswerKey::Choices(key), Answer::Choices(indices)) => {
            key == indices
        }
        (QuestionType::TrueFalse, AnswerKey::TrueFalse(key), Answer::Boolean(value)) => {
            key == value
        }
        (QuestionType::TextInput, AnswerKey::Text(accepted), Answer::Text(text)) => {
            let text = normalize(text);
            accepted.iter().any(|a| normalize(a) == text)
        }
        _ => {
            return Err(ScoringError::AnswerShapeMismatch {
                question_id: question.id,
                expected: question.kind,
            });
        }
    };

    Ok(ScoreOutcome::graded(correct, question))
}
