//! Aggregate roots for the live context.

use chrono::{DateTime, Utc};
use quizmaster_catalog::domain::aggregates::Quiz;
use quizmaster_catalog::domain::question::Question;
use quizmaster_core::aggregate::AggregateRoot;
use quizmaster_core::clock::Clock;
use quizmaster_core::error::{Conflict, DomainError, SessionState};
use quizmaster_core::event::EventMetadata;
use uuid::Uuid;

use super::events::{
    LiveEvent, LiveEventKind, QuestionShown, SessionEnded, SessionPaused, SessionResumed,
    TimeExpired,
};
use super::leaderboard::Standing;

/// What `advance` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The question at this index is now shown.
    Showing(usize),
    /// The last question was already shown; the session must be finalized.
    Exhausted,
}

/// What one countdown tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Seconds left after the tick.
    Running(u32),
    /// The countdown just reached zero.
    Expired,
    /// Nothing to count: not showing a question, or already expired.
    Idle,
}

/// The aggregate root for one live run of a quiz.
///
/// Questions are captured when the session is created; the quiz is locked
/// against edits for as long as the session runs.
#[derive(Debug)]
pub struct LiveSession {
    /// The quiz being run; also the aggregate id.
    pub quiz_id: Uuid,
    /// Join code shown to the audience.
    pub code: String,
    /// Quiz title.
    pub title: String,
    pub(crate) questions: Vec<Question>,
    pub(crate) state: SessionState,
    pub(crate) current_index: usize,
    pub(crate) time_remaining: u32,
    pub(crate) expired: bool,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) ended_at: Option<DateTime<Utc>>,
    pub(crate) final_standings: Option<Vec<Standing>>,
    version: i64,
    uncommitted_events: Vec<LiveEvent>,
}

impl LiveSession {
    /// Creates an idle session for a published quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizNotPublished` for a draft quiz.
    pub fn new(quiz: &Quiz) -> Result<Self, DomainError> {
        if !quiz.is_published() {
            return Err(Conflict::QuizNotPublished.into());
        }
        Ok(Self {
            quiz_id: quiz.id,
            code: quiz.code.clone(),
            title: quiz.title.clone(),
            questions: quiz.questions.clone(),
            state: SessionState::Idle,
            current_index: 0,
            time_remaining: 0,
            expired: false,
            started_at: None,
            ended_at: None,
            final_standings: None,
            version: 0,
            uncommitted_events: Vec::new(),
        })
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 0-based index of the current question.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Seconds left on the countdown.
    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Whether the countdown of the current question reached zero.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Number of questions in the run.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// When the first question was shown.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When the session ended.
    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Standings stored at finalization.
    #[must_use]
    pub fn final_standings(&self) -> Option<&[Standing]> {
        self.final_standings.as_deref()
    }

    /// Whether the session is still running (not idle, not ended).
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Question | SessionState::Paused)
    }

    /// The question being shown or paused on.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_active() {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    /// Seconds elapsed since the current question was revealed.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.current_question().map_or(0.0, |q| {
            f64::from(q.timer_seconds.saturating_sub(self.time_remaining))
        })
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn raise(&mut self, kind: LiveEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = LiveEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: LiveEvent::type_name(&kind).to_owned(),
                aggregate_id: self.quiz_id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }

    fn invalid(&self, operation: &'static str) -> DomainError {
        Conflict::InvalidTransition {
            operation,
            state: self.state,
        }
        .into()
    }

    fn show(&mut self, index: usize, correlation_id: Uuid, clock: &dyn Clock) {
        let question = &self.questions[index];
        let kind = LiveEventKind::QuestionShown(QuestionShown {
            quiz_id: self.quiz_id,
            question_index: index,
            question_count: self.questions.len(),
            question: question.redacted(),
            time_remaining: question.timer_seconds,
        });
        self.time_remaining = question.timer_seconds;
        self.current_index = index;
        self.expired = false;
        self.state = SessionState::Question;
        self.raise(kind, correlation_id, clock);
    }

    /// Shows the first question.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyActive` while running, `QuizHasNoQuestions` for an
    /// empty quiz (the session stays idle), or `InvalidTransition` once ended.
    pub fn start(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        match self.state {
            SessionState::Idle => {}
            SessionState::Question | SessionState::Paused => {
                return Err(Conflict::AlreadyActive.into());
            }
            SessionState::Ended => return Err(self.invalid("start")),
        }
        if self.questions.is_empty() {
            return Err(Conflict::QuizHasNoQuestions.into());
        }
        self.started_at = Some(clock.now());
        self.show(0, correlation_id, clock);
        Ok(())
    }

    /// Moves to the next question.
    ///
    /// Returns `AdvanceOutcome::Exhausted` without changing anything when the
    /// last question is current; the caller then finalizes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless a question is shown or paused.
    pub fn advance(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<AdvanceOutcome, DomainError> {
        if !self.is_active() {
            return Err(self.invalid("advance"));
        }
        let next = self.current_index + 1;
        if next >= self.questions.len() {
            return Ok(AdvanceOutcome::Exhausted);
        }
        self.show(next, correlation_id, clock);
        Ok(AdvanceOutcome::Showing(next))
    }

    /// Suspends the countdown, keeping the time remaining.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless a question is shown.
    pub fn pause(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.state != SessionState::Question {
            return Err(self.invalid("pause"));
        }
        self.state = SessionState::Paused;
        let kind = LiveEventKind::SessionPaused(SessionPaused {
            quiz_id: self.quiz_id,
            question_index: self.current_index,
            time_remaining: self.time_remaining,
        });
        self.raise(kind, correlation_id, clock);
        Ok(())
    }

    /// Restarts the countdown from the preserved time.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless paused.
    pub fn resume(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.state != SessionState::Paused {
            return Err(self.invalid("resume"));
        }
        self.state = SessionState::Question;
        let kind = LiveEventKind::SessionResumed(SessionResumed {
            quiz_id: self.quiz_id,
            question_index: self.current_index,
            time_remaining: self.time_remaining,
        });
        self.raise(kind, correlation_id, clock);
        Ok(())
    }

    /// Whether the countdown should be running.
    #[must_use]
    pub fn needs_countdown(&self) -> bool {
        self.state == SessionState::Question && !self.expired && self.time_remaining > 0
    }

    /// Counts down one second. Reaching zero latches `expired`; the state and
    /// index never change here.
    pub fn tick(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> TickOutcome {
        if !self.needs_countdown() {
            return TickOutcome::Idle;
        }
        self.time_remaining -= 1;
        if self.time_remaining > 0 {
            return TickOutcome::Running(self.time_remaining);
        }
        self.expired = true;
        let question_id = self.questions[self.current_index].id;
        let kind = LiveEventKind::TimeExpired(TimeExpired {
            quiz_id: self.quiz_id,
            question_id,
            question_index: self.current_index,
        });
        self.raise(kind, correlation_id, clock);
        TickOutcome::Expired
    }

    /// Ends the session with the given standings. Returns `false` if it had
    /// already ended, in which case nothing changes.
    pub fn finalize(
        &mut self,
        standings: Vec<Standing>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> bool {
        if self.state == SessionState::Ended {
            return false;
        }
        self.state = SessionState::Ended;
        self.ended_at = Some(clock.now());
        self.final_standings = Some(standings.clone());
        let kind = LiveEventKind::SessionEnded(SessionEnded {
            quiz_id: self.quiz_id,
            leaderboard: standings,
        });
        self.raise(kind, correlation_id, clock);
        true
    }
}

impl AggregateRoot for LiveSession {
    type Event = LiveEvent;

    fn aggregate_id(&self) -> Uuid {
        self.quiz_id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    #[allow(clippy::cast_possible_wrap)]
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        self.version += self.uncommitted_events.len() as i64;
        std::mem::take(&mut self.uncommitted_events)
    }
}
