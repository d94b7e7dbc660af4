//! Submitted answers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::question::{AnswerKey, Question, QuestionType};

/// An answer as submitted by a participant. The expected variant depends on
/// the question type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// One option index (`single_choice`).
    Choice(usize),
    /// A set of option indices (`multiple_choice`).
    Choices(BTreeSet<usize>),
    /// A boolean (`true_false`).
    Boolean(bool),
    /// Free text (`text_input`).
    Text(String),
    /// Acknowledgment of an instruction slide.
    Acknowledge,
}

impl Answer {
    /// Whether the answer carries no usable content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Choices(set) => set.is_empty(),
            Self::Text(text) => text.trim().is_empty(),
            Self::Choice(_) | Self::Boolean(_) | Self::Acknowledge => false,
        }
    }

    /// Builds the answer a participant would give by following the stored key.
    ///
    /// Returns `None` only when the key does not fit the question type, which
    /// validation rules out for stored questions.
    #[must_use]
    pub fn from_key(question: &Question) -> Option<Self> {
        match (question.kind, &question.answer_key) {
            (QuestionType::SingleChoice, AnswerKey::Choices(set)) => {
                set.iter().next().copied().map(Self::Choice)
            }
            (QuestionType::MultipleChoice, AnswerKey::Choices(set)) => {
                Some(Self::Choices(set.clone()))
            }
            (QuestionType::TrueFalse, AnswerKey::TrueFalse(value)) => Some(Self::Boolean(*value)),
            (QuestionType::TextInput, AnswerKey::Text(accepted)) => {
                accepted.first().cloned().map(Self::Text)
            }
            (QuestionType::InstructionSlide, _) => Some(Self::Acknowledge),
            _ => None,
        }
    }

    /// Renders the answer for reports, resolving option indices to labels.
    #[must_use]
    pub fn describe(&self, question: &Question) -> String {
        let label = |i: usize| {
            question
                .options
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("#{i}"))
        };
        match self {
            Self::Choice(i) => label(*i),
            Self::Choices(set) => set.iter().map(|i| label(*i)).collect::<Vec<_>>().join(", "),
            Self::Boolean(true) => "True".to_owned(),
            Self::Boolean(false) => "False".to_owned(),
            Self::Text(text) => text.trim().to_owned(),
            Self::Acknowledge => "Acknowledged".to_owned(),
        }
    }
}
