//! Question definitions and per-type rules.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use quizmaster_core::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default countdown applied when an authoring form leaves the timer empty.
pub const DEFAULT_TIMER_SECONDS: u32 = 30;

/// Default points applied when an authoring form leaves points empty.
pub const DEFAULT_POINTS: u32 = 10;

/// The supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Exactly one correct option.
    SingleChoice,
    /// One or more correct options, graded as a set.
    MultipleChoice,
    /// A single boolean answer.
    TrueFalse,
    /// Free text compared against accepted strings.
    TextInput,
    /// Non-graded pacing slide.
    InstructionSlide,
}

/// Structural rules attached to a question type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeRules {
    /// Whether the question carries an option list.
    pub has_options: bool,
    /// Whether more than one option may be correct.
    pub allows_multiple_correct: bool,
    /// Whether the question contributes points and correctness.
    pub is_gradable: bool,
}

impl QuestionType {
    /// Every supported type, in authoring menu order.
    pub const ALL: [Self; 5] = [
        Self::SingleChoice,
        Self::MultipleChoice,
        Self::TrueFalse,
        Self::TextInput,
        Self::InstructionSlide,
    ];

    /// Returns the wire name of the type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleChoice => "single_choice",
            Self::MultipleChoice => "multiple_choice",
            Self::TrueFalse => "true_false",
            Self::TextInput => "text_input",
            Self::InstructionSlide => "instruction_slide",
        }
    }

    /// Returns the structural rules for this type.
    #[must_use]
    pub fn rules(self) -> TypeRules {
        match self {
            Self::SingleChoice => TypeRules {
                has_options: true,
                allows_multiple_correct: false,
                is_gradable: true,
            },
            Self::MultipleChoice => TypeRules {
                has_options: true,
                allows_multiple_correct: true,
                is_gradable: true,
            },
            Self::TrueFalse | Self::TextInput => TypeRules {
                has_options: false,
                allows_multiple_correct: false,
                is_gradable: true,
            },
            Self::InstructionSlide => TypeRules {
                has_options: false,
                allows_multiple_correct: false,
                is_gradable: false,
            },
        }
    }

    /// Shorthand for `rules().is_gradable`.
    #[must_use]
    pub fn is_gradable(self) -> bool {
        self.rules().is_gradable
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| DomainError::UnknownQuestionType(s.to_owned()))
    }
}

/// Looks up the rules for a type given by name.
///
/// # Errors
///
/// Returns `DomainError::UnknownQuestionType` for unrecognized names.
pub fn type_rules(name: &str) -> Result<TypeRules, DomainError> {
    name.parse::<QuestionType>().map(QuestionType::rules)
}

/// Opaque reference to media shown alongside a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(pub String);

/// One entry of an authored answer key, before it is checked against the
/// question type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    /// Option index.
    Index(usize),
    /// True/false value.
    Bool(bool),
    /// Accepted text.
    Text(String),
}

/// Validated answer key stored on a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerKey {
    /// Correct option indices.
    Choices(BTreeSet<usize>),
    /// The correct boolean.
    TrueFalse(bool),
    /// Accepted strings, compared trimmed and case-folded.
    Text(Vec<String>),
    /// Instruction slides carry no key.
    Ungraded,
}

/// Authoring input for a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDraft {
    /// Question type name, e.g. `single_choice`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Prompt shown to participants.
    pub text: String,
    /// Options for option-bearing types.
    #[serde(default)]
    pub options: Vec<String>,
    /// Answer key entries (indices, a boolean, or accepted strings).
    #[serde(default)]
    pub correct_answers: Vec<CorrectAnswer>,
    /// Countdown in seconds.
    #[serde(default = "default_timer")]
    pub timer: u32,
    /// Points for a correct answer.
    #[serde(default = "default_points")]
    pub points: u32,
    /// Optional media reference.
    #[serde(default)]
    pub media: Option<MediaRef>,
}

fn default_timer() -> u32 {
    DEFAULT_TIMER_SECONDS
}

fn default_points() -> u32 {
    DEFAULT_POINTS
}

/// A validated question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question identifier, stable across edits.
    pub id: Uuid,
    /// Question type.
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Prompt shown to participants.
    pub text: String,
    /// Options (empty for types without options).
    pub options: Vec<String>,
    /// Answer key.
    pub answer_key: AnswerKey,
    /// Countdown in seconds, always positive.
    pub timer_seconds: u32,
    /// Points for a correct answer; 0 for non-gradable types.
    pub points: u32,
    /// Optional media reference.
    pub media: Option<MediaRef>,
}

/// Participant-facing projection of a question, without the answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantQuestion {
    /// Question identifier.
    pub id: Uuid,
    /// Question type.
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Prompt.
    pub text: String,
    /// Options (empty for types without options).
    pub options: Vec<String>,
    /// Countdown in seconds.
    pub timer_seconds: u32,
    /// Points at stake.
    pub points: u32,
    /// Optional media reference.
    pub media: Option<MediaRef>,
}

struct Checked {
    kind: QuestionType,
    text: String,
    options: Vec<String>,
    answer_key: AnswerKey,
    points: u32,
}

fn check(draft: &QuestionDraft) -> Result<Checked, DomainError> {
    let kind: QuestionType = draft.kind.parse()?;
    let rules = kind.rules();

    let text = draft.text.trim();
    if text.is_empty() {
        return Err(DomainError::validation("question text must not be empty"));
    }
    if draft.timer == 0 {
        return Err(DomainError::validation(
            "timer must be a positive number of seconds",
        ));
    }

    // `kept[i]` is the position of draft option `i` once blanks are dropped.
    let mut options = Vec::new();
    let mut kept = Vec::new();
    if rules.has_options {
        for option in &draft.options {
            let option = option.trim();
            if option.is_empty() {
                kept.push(None);
            } else {
                kept.push(Some(options.len()));
                options.push(option.to_owned());
            }
        }
    }

    let answer_key = match kind {
        QuestionType::SingleChoice | QuestionType::MultipleChoice => {
            if options.len() < 2 {
                return Err(DomainError::validation(
                    "at least 2 non-empty options are required",
                ));
            }
            let mut indices = BTreeSet::new();
            for entry in &draft.correct_answers {
                match entry {
                    CorrectAnswer::Index(i) => match kept.get(*i) {
                        Some(Some(position)) => {
                            indices.insert(*position);
                        }
                        Some(None) => {
                            return Err(DomainError::validation(format!(
                                "correct answer index {i} points at a blank option"
                            )));
                        }
                        None => {
                            return Err(DomainError::validation(format!(
                                "correct answer index {i} is out of range"
                            )));
                        }
                    },
                    _ => {
                        return Err(DomainError::validation(
                            "correct answers must be option indices",
                        ));
                    }
                }
            }
            if indices.is_empty() {
                return Err(DomainError::validation(
                    "at least one correct answer must be selected",
                ));
            }
            if !rules.allows_multiple_correct && indices.len() > 1 {
                return Err(DomainError::validation(
                    "single choice questions take exactly one correct answer",
                ));
            }
            AnswerKey::Choices(indices)
        }
        QuestionType::TrueFalse => match draft.correct_answers.as_slice() {
            [CorrectAnswer::Bool(value)] => AnswerKey::TrueFalse(*value),
            _ => {
                return Err(DomainError::validation(
                    "true/false questions take exactly one boolean answer",
                ));
            }
        },
        QuestionType::TextInput => {
            let mut accepted = Vec::new();
            for entry in &draft.correct_answers {
                let CorrectAnswer::Text(value) = entry else {
                    return Err(DomainError::validation(
                        "text input answers must be strings",
                    ));
                };
                let value = value.trim();
                if !value.is_empty() {
                    accepted.push(value.to_owned());
                }
            }
            if accepted.is_empty() {
                return Err(DomainError::validation(
                    "text input questions need at least one accepted answer",
                ));
            }
            AnswerKey::Text(accepted)
        }
        QuestionType::InstructionSlide => {
            if !draft.correct_answers.is_empty() {
                return Err(DomainError::validation(
                    "instruction slides take no correct answers",
                ));
            }
            AnswerKey::Ungraded
        }
    };

    let points = if rules.is_gradable { draft.points } else { 0 };

    Ok(Checked {
        kind,
        text: text.to_owned(),
        options,
        answer_key,
        points,
    })
}

/// Checks a draft against its type rules without building a question.
///
/// # Errors
///
/// Returns `DomainError::UnknownQuestionType` or `DomainError::Validation`.
pub fn validate(draft: &QuestionDraft) -> Result<(), DomainError> {
    check(draft).map(|_| ())
}

impl Question {
    /// Builds a validated question from an authoring draft.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownQuestionType` or `DomainError::Validation`.
    pub fn from_draft(id: Uuid, draft: QuestionDraft) -> Result<Self, DomainError> {
        let checked = check(&draft)?;
        Ok(Self {
            id,
            kind: checked.kind,
            text: checked.text,
            options: checked.options,
            answer_key: checked.answer_key,
            timer_seconds: draft.timer,
            points: checked.points,
            media: draft.media,
        })
    }

    /// Whether this question contributes points and correctness.
    #[must_use]
    pub fn is_gradable(&self) -> bool {
        self.kind.is_gradable()
    }

    /// Returns the participant-facing projection without the answer key.
    #[must_use]
    pub fn redacted(&self) -> ParticipantQuestion {
        ParticipantQuestion {
            id: self.id,
            kind: self.kind,
            text: self.text.clone(),
            options: self.options.clone(),
            timer_seconds: self.timer_seconds,
            points: self.points,
            media: self.media.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(kind: &str) -> QuestionDraft {
        QuestionDraft {
            kind: kind.to_owned(),
            text: "What is the capital of France?".to_owned(),
            options: Vec::new(),
            correct_answers: Vec::new(),
            timer: 30,
            points: 10,
            media: None,
        }
    }

    #[test]
    fn test_type_rules_lookup_by_name() {
        let rules = type_rules("multiple_choice").unwrap();
        assert!(rules.has_options);
        assert!(rules.allows_multiple_correct);
        assert!(rules.is_gradable);

        let slide = type_rules("instruction_slide").unwrap();
        assert!(!slide.is_gradable);
    }

    #[test]
    fn test_type_rules_rejects_unknown_type() {
        match type_rules("essay") {
            Err(DomainError::UnknownQuestionType(name)) => assert_eq!(name, "essay"),
            other => panic!("expected UnknownQuestionType, got {other:?}"),
        }
    }

    #[test]
    fn test_single_choice_builds_key_and_trims_blank_options() {
        let mut d = draft("single_choice");
        d.options = vec![
            "London".into(),
            "  ".into(),
            "Berlin".into(),
            "Paris".into(),
        ];
        d.correct_answers = vec![CorrectAnswer::Index(2)];

        let q = Question::from_draft(Uuid::new_v4(), d).unwrap();

        assert_eq!(q.options, vec!["London", "Berlin", "Paris"]);
        assert_eq!(q.answer_key, AnswerKey::Choices(BTreeSet::from([1])));
        assert_eq!(q.options[1], "Berlin");
        assert_eq!(q.points, 10);
    }

    #[test]
    fn test_multiple_choice_key_follows_options_past_blanks() {
        let mut d = draft("multiple_choice");
        d.options = vec![
            String::new(),
            "Python".into(),
            " ".into(),
            "HTML".into(),
            "JavaScript".into(),
        ];
        d.correct_answers = vec![CorrectAnswer::Index(1), CorrectAnswer::Index(4)];

        let q = Question::from_draft(Uuid::new_v4(), d).unwrap();

        assert_eq!(q.options, vec!["Python", "HTML", "JavaScript"]);
        assert_eq!(q.answer_key, AnswerKey::Choices(BTreeSet::from([0, 2])));
    }

    #[test]
    fn test_correct_index_on_blank_option_is_rejected() {
        let mut d = draft("single_choice");
        d.options = vec!["London".into(), "  ".into(), "Paris".into()];
        d.correct_answers = vec![CorrectAnswer::Index(1)];

        match validate(&d) {
            Err(DomainError::Validation(message)) => assert!(message.contains("blank option")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_options_types_need_two_options() {
        let mut d = draft("multiple_choice");
        d.options = vec!["Only".into(), String::new()];
        d.correct_answers = vec![CorrectAnswer::Index(0)];

        assert!(matches!(validate(&d), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_options_types_need_a_correct_index_in_range() {
        let mut d = draft("single_choice");
        d.options = vec!["A".into(), "B".into()];
        assert!(validate(&d).is_err());

        d.correct_answers = vec![CorrectAnswer::Index(5)];
        assert!(validate(&d).is_err());
    }

    #[test]
    fn test_single_choice_rejects_two_correct_indices() {
        let mut d = draft("single_choice");
        d.options = vec!["A".into(), "B".into(), "C".into()];
        d.correct_answers = vec![CorrectAnswer::Index(0), CorrectAnswer::Index(1)];

        assert!(validate(&d).is_err());
    }

    #[test]
    fn test_true_false_needs_exactly_one_boolean() {
        let mut d = draft("true_false");
        assert!(validate(&d).is_err());

        d.correct_answers = vec![CorrectAnswer::Bool(false), CorrectAnswer::Bool(true)];
        assert!(validate(&d).is_err());

        d.correct_answers = vec![CorrectAnswer::Bool(false)];
        let q = Question::from_draft(Uuid::new_v4(), d).unwrap();
        assert_eq!(q.answer_key, AnswerKey::TrueFalse(false));
    }

    #[test]
    fn test_text_input_needs_non_empty_accepted_string() {
        let mut d = draft("text_input");
        d.correct_answers = vec![CorrectAnswer::Text("   ".into())];
        assert!(validate(&d).is_err());

        d.correct_answers = vec![
            CorrectAnswer::Text(" Pacific ".into()),
            CorrectAnswer::Text("Pacific Ocean".into()),
        ];
        let q = Question::from_draft(Uuid::new_v4(), d).unwrap();
        assert_eq!(
            q.answer_key,
            AnswerKey::Text(vec!["Pacific".into(), "Pacific Ocean".into()])
        );
    }

    #[test]
    fn test_instruction_slide_forces_zero_points() {
        let mut d = draft("instruction_slide");
        d.points = 25;
        let q = Question::from_draft(Uuid::new_v4(), d).unwrap();

        assert_eq!(q.points, 0);
        assert_eq!(q.answer_key, AnswerKey::Ungraded);
        assert!(!q.is_gradable());
    }

    #[test]
    fn test_zero_timer_is_rejected_for_every_type() {
        let mut d = draft("instruction_slide");
        d.timer = 0;
        assert!(validate(&d).is_err());
    }

    #[test]
    fn test_redacted_projection_has_no_answer_key() {
        let mut d = draft("single_choice");
        d.options = vec!["A".into(), "B".into()];
        d.correct_answers = vec![CorrectAnswer::Index(1)];
        let q = Question::from_draft(Uuid::new_v4(), d).unwrap();

        let json = serde_json::to_value(q.redacted()).unwrap();

        assert!(json.get("answer_key").is_none());
        assert_eq!(json["type"], "single_choice");
        assert_eq!(json["options"][1], "B");
    }

    #[test]
    fn test_draft_deserializes_mixed_answer_entries_and_defaults() {
        let d: QuestionDraft = serde_json::from_value(serde_json::json!({
            "type": "true_false",
            "text": "The Earth is flat.",
            "correct_answers": [false]
        }))
        .unwrap();

        assert_eq!(d.correct_answers, vec![CorrectAnswer::Bool(false)]);
        assert_eq!(d.timer, DEFAULT_TIMER_SECONDS);
        assert_eq!(d.points, DEFAULT_POINTS);
    }
}
