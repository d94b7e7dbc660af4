//! Participants and their recorded responses.

use chrono::{DateTime, Utc};
use quizmaster_core::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answer::Answer;

/// One scored submission. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// The answered question.
    pub question_id: Uuid,
    /// The submitted answer; `None` for blank submissions.
    pub answer: Option<Answer>,
    /// Whether the answer was correct.
    pub correct: bool,
    /// Points awarded.
    pub points: u32,
    /// Seconds from question reveal to submission.
    pub response_time: f64,
    /// Whether the question was gradable (instruction slides are not).
    pub graded: bool,
    /// When the submission was recorded.
    pub submitted_at: DateTime<Utc>,
}

/// A person who joined a quiz by code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant identifier.
    pub id: Uuid,
    /// The joined quiz.
    pub quiz_id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// When the participant joined.
    pub joined_at: DateTime<Utc>,
    /// 0-based position in the quiz's join order.
    pub join_sequence: u32,
    /// Responses in submission order.
    pub responses: Vec<Response>,
    /// Sum of awarded points.
    pub total_points: u32,
    /// Number of correct graded responses.
    pub correct_answers: u32,
    /// Mean response time over graded responses, in seconds.
    pub average_response_time: f64,
}

impl Participant {
    /// Creates a participant with an empty history.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is blank.
    pub fn new(
        id: Uuid,
        quiz_id: Uuid,
        name: &str,
        email: Option<&str>,
        joined_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("participant name must not be empty"));
        }
        let email = email.map(str::trim).filter(|e| !e.is_empty()).map(str::to_owned);

        Ok(Self {
            id,
            quiz_id,
            name: name.to_owned(),
            email,
            joined_at,
            join_sequence: 0,
            responses: Vec::new(),
            total_points: 0,
            correct_answers: 0,
            average_response_time: 0.0,
        })
    }

    /// Returns the recorded response for a question, if any.
    #[must_use]
    pub fn response_for(&self, question_id: Uuid) -> Option<&Response> {
        self.responses.iter().find(|r| r.question_id == question_id)
    }

    /// Appends a response and updates the running aggregates.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateSubmission` if the question was already
    /// answered; the participant is left unchanged.
    pub fn record(&mut self, response: Response) -> Result<(), DomainError> {
        if self.response_for(response.question_id).is_some() {
            return Err(DomainError::DuplicateSubmission {
                participant_id: self.id,
                question_id: response.question_id,
            });
        }

        self.total_points += response.points;
        if response.graded {
            if response.correct {
                self.correct_answers += 1;
            }
            let graded = self.responses.iter().filter(|r| r.graded).count() + 1;
            #[allow(clippy::cast_precision_loss)]
            let n = graded as f64;
            self.average_response_time += (response.response_time - self.average_response_time) / n;
        }
        self.responses.push(response);
        Ok(())
    }

    /// Number of graded questions this participant has answered.
    #[must_use]
    pub fn graded_responses(&self) -> usize {
        self.responses.iter().filter(|r| r.graded).count()
    }
}
