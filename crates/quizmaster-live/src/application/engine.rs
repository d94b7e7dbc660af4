//! The live session engine.
//!
//! Holds one session per quiz behind a per-quiz async mutex. Every pacing
//! operation, submission and countdown tick for a quiz runs under that
//! mutex, so participant read-modify-write never loses updates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::time::Duration;

use quizmaster_catalog::domain::aggregates::Quiz;
use quizmaster_catalog::domain::participant::Response;
use quizmaster_catalog::domain::repository::QuizStore;
use quizmaster_core::aggregate::AggregateRoot;
use quizmaster_core::clock::Clock;
use quizmaster_core::command::Command;
use quizmaster_core::error::{Conflict, DomainError, SessionState};
use quizmaster_core::event::DomainEvent;
use quizmaster_core::publisher::EventPublisher;
use quizmaster_scoring::{ScoreOutcome, ScoringError, score};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::application::query_handlers::{LiveQuestion, SessionSnapshot};
use crate::application::timer::{Countdown, TickContext};
use crate::domain::aggregates::{AdvanceOutcome, LiveSession};
use crate::domain::commands::{
    AdvanceQuestion, EndSession, PauseSession, ResumeSession, SelectQuiz, StartSession,
    SubmitAnswer,
};
use crate::domain::leaderboard::rank;

/// Default duration of one countdown second.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Engine tuning.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Wall-clock duration of one countdown second.
    pub tick: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { tick: DEFAULT_TICK }
    }
}

/// A session together with its countdown task.
#[derive(Debug)]
pub(crate) struct SessionSlot {
    pub(crate) session: LiveSession,
    pub(crate) countdown: Countdown,
}

/// Drains the session's raised events into the publisher.
pub(crate) fn publish_pending(session: &mut LiveSession, publisher: &dyn EventPublisher) {
    for event in session.take_uncommitted_events() {
        publisher.publish(event.to_envelope());
    }
}

type Slot = Arc<Mutex<SessionSlot>>;

/// Runs live sessions: pacing, countdowns, answer collection and
/// finalization.
pub struct LiveSessionEngine {
    store: Arc<dyn QuizStore>,
    clock: Arc<dyn Clock>,
    publisher: Arc<dyn EventPublisher>,
    config: EngineConfig,
    sessions: StdMutex<HashMap<Uuid, Slot>>,
}

impl std::fmt::Debug for LiveSessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSessionEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LiveSessionEngine {
    /// Creates an engine with no sessions.
    #[must_use]
    pub fn new(
        store: Arc<dyn QuizStore>,
        clock: Arc<dyn Clock>,
        publisher: Arc<dyn EventPublisher>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            clock,
            publisher,
            config,
            sessions: StdMutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Slot>>, DomainError> {
        self.sessions
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("session map poisoned: {e}")))
    }

    async fn load_quiz(&self, quiz_id: Uuid) -> Result<Quiz, DomainError> {
        self.store
            .load_quiz(quiz_id)
            .await?
            .ok_or(DomainError::QuizNotFound(quiz_id))
    }

    /// Locks the session of a quiz.
    async fn lock(&self, quiz_id: Uuid) -> Result<OwnedMutexGuard<SessionSlot>, DomainError> {
        let slot = self
            .sessions()?
            .get(&quiz_id)
            .cloned()
            .ok_or(Conflict::NoQuizSelected)?;
        Ok(slot.lock_owned().await)
    }

    /// Locks the session of a quiz, creating an idle one when none exists.
    async fn lock_or_create(
        &self,
        quiz: &Quiz,
    ) -> Result<OwnedMutexGuard<SessionSlot>, DomainError> {
        let slot = {
            let mut sessions = self.sessions()?;
            match sessions.get(&quiz.id) {
                Some(slot) => Arc::clone(slot),
                None => {
                    let slot = Arc::new(Mutex::new(SessionSlot {
                        session: LiveSession::new(quiz)?,
                        countdown: Countdown::default(),
                    }));
                    sessions.insert(quiz.id, Arc::clone(&slot));
                    slot
                }
            }
        };
        Ok(slot.lock_owned().await)
    }

    fn arm_countdown(&self, slot: &mut OwnedMutexGuard<SessionSlot>, correlation_id: Uuid) {
        let ctx = TickContext {
            tick: self.config.tick,
            correlation_id,
            clock: Arc::clone(&self.clock),
            publisher: Arc::clone(&self.publisher),
        };
        let handle = Arc::clone(OwnedMutexGuard::mutex(slot));
        slot.countdown.arm(&handle, ctx);
    }

    async fn participant_count(&self, quiz_id: Uuid) -> Result<usize, DomainError> {
        Ok(self.store.participants(quiz_id).await?.len())
    }

    async fn snapshot_of(&self, session: &LiveSession) -> Result<SessionSnapshot, DomainError> {
        Ok(SessionSnapshot {
            quiz_id: session.quiz_id,
            code: session.code.clone(),
            title: session.title.clone(),
            state: session.state(),
            current_question_index: session.current_index(),
            question_count: session.question_count(),
            time_remaining: session.time_remaining(),
            expired: session.is_expired(),
            participant_count: self.participant_count(session.quiz_id).await?,
            current_question: session.current_question().cloned(),
            started_at: session.started_at(),
            ended_at: session.ended_at(),
            leaderboard: session.final_standings().map(<[_]>::to_vec),
        })
    }

    /// Ranks the participants, clears the quiz's live flag and ends the
    /// session. A no-op on an ended session.
    async fn finalize(
        &self,
        slot: &mut OwnedMutexGuard<SessionSlot>,
        correlation_id: Uuid,
    ) -> Result<(), DomainError> {
        if slot.session.state() == SessionState::Ended {
            return Ok(());
        }
        let quiz_id = slot.session.quiz_id;
        let participants = self.store.participants(quiz_id).await?;
        let standings = rank(&participants);
        self.store.set_live(quiz_id, false).await?;

        slot.countdown.stop();
        slot.session
            .finalize(standings, correlation_id, self.clock.as_ref());
        publish_pending(&mut slot.session, self.publisher.as_ref());

        info!(%quiz_id, participants = participants.len(), "session ended");
        Ok(())
    }

    /// Selects a published quiz, creating an idle session the host can show
    /// before starting. Replaces an idle or ended session.
    ///
    /// # Errors
    ///
    /// Returns `QuizNotFound`, `QuizNotPublished` or `AlreadyActive`.
    #[instrument(skip(self, command), fields(correlation_id = %command.correlation_id(), quiz_id = %command.quiz_id))]
    pub async fn select(&self, command: &SelectQuiz) -> Result<SessionSnapshot, DomainError> {
        let quiz = self.load_quiz(command.quiz_id).await?;
        let fresh = LiveSession::new(&quiz)?;
        let mut slot = self.lock_or_create(&quiz).await?;
        if slot.session.is_active() {
            return Err(Conflict::AlreadyActive.into());
        }
        slot.countdown.stop();
        slot.session = fresh;

        info!("quiz selected");
        self.snapshot_of(&slot.session).await
    }

    /// Shows the first question of a published quiz and locks the quiz
    /// against edits.
    ///
    /// # Errors
    ///
    /// Returns `QuizNotFound`, `QuizNotPublished`, `AlreadyActive`, or
    /// `QuizHasNoQuestions` (the session is left idle).
    #[instrument(skip(self, command), fields(correlation_id = %command.correlation_id(), quiz_id = %command.quiz_id))]
    pub async fn start(&self, command: &StartSession) -> Result<SessionSnapshot, DomainError> {
        let quiz = self.load_quiz(command.quiz_id).await?;
        LiveSession::new(&quiz)?;
        let mut slot = self.lock_or_create(&quiz).await?;
        if slot.session.is_active() {
            return Err(Conflict::AlreadyActive.into());
        }
        slot.countdown.stop();

        // The session runs the questions stored when the quiz was locked.
        let locked = self.store.set_live(quiz.id, true).await?;
        let started = LiveSession::new(&locked).and_then(|mut next| {
            next.start(command.correlation_id, self.clock.as_ref())
                .map(|()| next)
        });
        let next = match started {
            Ok(next) => next,
            Err(e) => {
                self.store.set_live(quiz.id, false).await?;
                slot.session = LiveSession::new(&locked)?;
                warn!(error = %e, "session start rejected");
                return Err(e);
            }
        };

        slot.session = next;
        publish_pending(&mut slot.session, self.publisher.as_ref());
        self.arm_countdown(&mut slot, command.correlation_id);

        info!(question_count = slot.session.question_count(), "session started");
        self.snapshot_of(&slot.session).await
    }

    /// Moves to the next question, or ends the session after the last one.
    ///
    /// # Errors
    ///
    /// Returns `NoQuizSelected` or `InvalidTransition`.
    #[instrument(skip(self, command), fields(correlation_id = %command.correlation_id(), quiz_id = %command.quiz_id))]
    pub async fn advance(&self, command: &AdvanceQuestion) -> Result<SessionSnapshot, DomainError> {
        let mut slot = self.lock(command.quiz_id).await?;
        match slot.session.advance(command.correlation_id, self.clock.as_ref())? {
            AdvanceOutcome::Showing(index) => {
                publish_pending(&mut slot.session, self.publisher.as_ref());
                self.arm_countdown(&mut slot, command.correlation_id);
                info!(question_index = index, "question shown");
            }
            AdvanceOutcome::Exhausted => {
                self.finalize(&mut slot, command.correlation_id).await?;
            }
        }
        self.snapshot_of(&slot.session).await
    }

    /// Pauses the countdown.
    ///
    /// # Errors
    ///
    /// Returns `NoQuizSelected` or `InvalidTransition`.
    #[instrument(skip(self, command), fields(correlation_id = %command.correlation_id(), quiz_id = %command.quiz_id))]
    pub async fn pause(&self, command: &PauseSession) -> Result<SessionSnapshot, DomainError> {
        let mut slot = self.lock(command.quiz_id).await?;
        slot.session.pause(command.correlation_id, self.clock.as_ref())?;
        slot.countdown.stop();
        publish_pending(&mut slot.session, self.publisher.as_ref());

        info!(time_remaining = slot.session.time_remaining(), "session paused");
        self.snapshot_of(&slot.session).await
    }

    /// Resumes the countdown from the preserved time.
    ///
    /// # Errors
    ///
    /// Returns `NoQuizSelected` or `InvalidTransition`.
    #[instrument(skip(self, command), fields(correlation_id = %command.correlation_id(), quiz_id = %command.quiz_id))]
    pub async fn resume(&self, command: &ResumeSession) -> Result<SessionSnapshot, DomainError> {
        let mut slot = self.lock(command.quiz_id).await?;
        slot.session.resume(command.correlation_id, self.clock.as_ref())?;
        publish_pending(&mut slot.session, self.publisher.as_ref());
        if slot.session.needs_countdown() {
            self.arm_countdown(&mut slot, command.correlation_id);
        }

        info!(time_remaining = slot.session.time_remaining(), "session resumed");
        self.snapshot_of(&slot.session).await
    }

    /// Ends the session from any state. Ending twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `NoQuizSelected` or a store failure.
    #[instrument(skip(self, command), fields(correlation_id = %command.correlation_id(), quiz_id = %command.quiz_id))]
    pub async fn end(&self, command: &EndSession) -> Result<SessionSnapshot, DomainError> {
        let mut slot = self.lock(command.quiz_id).await?;
        self.finalize(&mut slot, command.correlation_id).await?;
        self.snapshot_of(&slot.session).await
    }

    /// Scores and records a participant's answer to the current question.
    ///
    /// A blank answer to a gradable question is recorded as incorrect with no
    /// answer. Answers after time is up are accepted while the question is
    /// still shown.
    ///
    /// # Errors
    ///
    /// Returns `NoQuizSelected`, `SessionNotAcceptingAnswers`,
    /// `ParticipantNotFound`, `DuplicateSubmission`, or
    /// `DomainError::Validation` for an answer that does not fit the type.
    #[instrument(
        skip(self, command),
        fields(
            correlation_id = %command.correlation_id(),
            quiz_id = %command.quiz_id,
            participant_id = %command.participant_id
        )
    )]
    pub async fn submit_response(&self, command: &SubmitAnswer) -> Result<Response, DomainError> {
        let slot = self.lock(command.quiz_id).await?;
        if slot.session.state() != SessionState::Question {
            warn!(state = %slot.session.state(), "submission outside an open question");
            return Err(Conflict::SessionNotAcceptingAnswers.into());
        }
        let Some(question) = slot.session.current_question().cloned() else {
            return Err(Conflict::SessionNotAcceptingAnswers.into());
        };

        let mut participant = self
            .store
            .load_participant(command.quiz_id, command.participant_id)
            .await?
            .ok_or(DomainError::ParticipantNotFound(command.participant_id))?;
        if participant.response_for(question.id).is_some() {
            warn!(question_id = %question.id, "duplicate submission");
            return Err(DomainError::DuplicateSubmission {
                participant_id: participant.id,
                question_id: question.id,
            });
        }

        let (outcome, answer) = match score(&question, command.answer.as_ref()) {
            Ok(outcome) => (outcome, command.answer.clone()),
            Err(ScoringError::MissingAnswer { .. }) => (
                ScoreOutcome {
                    correct: false,
                    points_awarded: 0,
                },
                None,
            ),
            Err(e @ ScoringError::AnswerShapeMismatch { .. }) => {
                warn!(error = %e, "answer rejected");
                return Err(DomainError::validation(e.to_string()));
            }
        };

        let response = Response {
            question_id: question.id,
            answer,
            correct: outcome.correct,
            points: outcome.points_awarded,
            response_time: slot.session.elapsed_seconds(),
            graded: question.is_gradable(),
            submitted_at: self.clock.now(),
        };
        participant.record(response.clone())?;
        self.store.save_participant(participant).await?;

        info!(
            question_id = %question.id,
            correct = response.correct,
            points = response.points,
            response_time = response.response_time,
            "response recorded"
        );
        Ok(response)
    }

    /// Host view of the session of a quiz.
    ///
    /// # Errors
    ///
    /// Returns `NoQuizSelected` if no session exists.
    pub async fn snapshot(&self, quiz_id: Uuid) -> Result<SessionSnapshot, DomainError> {
        let slot = self.lock(quiz_id).await?;
        self.snapshot_of(&slot.session).await
    }

    /// Participant view of the current question, without the answer key.
    ///
    /// # Errors
    ///
    /// Returns `NoQuizSelected` if no session exists.
    pub async fn current_question_for_participants(
        &self,
        quiz_id: Uuid,
    ) -> Result<LiveQuestion, DomainError> {
        let slot = self.lock(quiz_id).await?;
        let session = &slot.session;
        Ok(LiveQuestion {
            quiz_id,
            state: session.state(),
            question_index: session.current_index(),
            question_count: session.question_count(),
            time_remaining: session.time_remaining(),
            expired: session.is_expired(),
            question: session.current_question().map(|q| q.redacted()),
        })
    }

    /// Number of sessions showing or paused on a question.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the session map is poisoned.
    pub async fn active_session_count(&self) -> Result<usize, DomainError> {
        let slots: Vec<Slot> = self.sessions()?.values().cloned().collect();
        let mut active = 0;
        for slot in slots {
            if slot.lock().await.session.is_active() {
                active += 1;
            }
        }
        Ok(active)
    }
}
