//! Domain events for the live context.

use quizmaster_catalog::domain::question::ParticipantQuestion;
use quizmaster_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::leaderboard::Standing;

/// Emitted when a question is revealed to participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionShown {
    /// The quiz being run.
    pub quiz_id: Uuid,
    /// 0-based position of the question.
    pub question_index: usize,
    /// Number of questions in the quiz.
    pub question_count: usize,
    /// The question without its answer key.
    pub question: ParticipantQuestion,
    /// Seconds on the countdown.
    pub time_remaining: u32,
}

/// Emitted when the countdown of the current question reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeExpired {
    /// The quiz being run.
    pub quiz_id: Uuid,
    /// The question whose time ran out.
    pub question_id: Uuid,
    /// 0-based position of the question.
    pub question_index: usize,
}

/// Emitted when the host pauses the countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPaused {
    /// The quiz being run.
    pub quiz_id: Uuid,
    /// 0-based position of the current question.
    pub question_index: usize,
    /// Seconds preserved on the countdown.
    pub time_remaining: u32,
}

/// Emitted when the host resumes the countdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResumed {
    /// The quiz being run.
    pub quiz_id: Uuid,
    /// 0-based position of the current question.
    pub question_index: usize,
    /// Seconds left on the countdown.
    pub time_remaining: u32,
}

/// Emitted once when a session ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnded {
    /// The quiz that was run.
    pub quiz_id: Uuid,
    /// Final standings.
    pub leaderboard: Vec<Standing>,
}

/// Event payload variants for the live context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LiveEventKind {
    /// A question was revealed.
    QuestionShown(QuestionShown),
    /// The countdown reached zero.
    TimeExpired(TimeExpired),
    /// The countdown was paused.
    SessionPaused(SessionPaused),
    /// The countdown was resumed.
    SessionResumed(SessionResumed),
    /// The session ended.
    SessionEnded(SessionEnded),
}

/// Domain event envelope for the live context.
#[derive(Debug, Clone)]
pub struct LiveEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: LiveEventKind,
}

impl LiveEvent {
    pub(crate) fn type_name(kind: &LiveEventKind) -> &'static str {
        match kind {
            LiveEventKind::QuestionShown(_) => "live.question_shown",
            LiveEventKind::TimeExpired(_) => "live.time_expired",
            LiveEventKind::SessionPaused(_) => "live.session_paused",
            LiveEventKind::SessionResumed(_) => "live.session_resumed",
            LiveEventKind::SessionEnded(_) => "live.session_ended",
        }
    }
}

impl DomainEvent for LiveEvent {
    fn event_type(&self) -> &'static str {
        Self::type_name(&self.kind)
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("LiveEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
