//! In-process quiz store.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use quizmaster_core::error::{Conflict, DomainError};
use uuid::Uuid;

use crate::domain::aggregates::{Quiz, normalize_code};
use crate::domain::participant::Participant;
use crate::domain::repository::QuizStore;

#[derive(Debug, Default)]
struct Inner {
    quizzes: HashMap<Uuid, Quiz>,
    order: Vec<Uuid>,
    participants: HashMap<Uuid, Vec<Participant>>,
}

/// `QuizStore` kept in memory behind a read/write lock.
#[derive(Debug, Default)]
pub struct InMemoryQuizStore {
    inner: RwLock<Inner>,
}

impl InMemoryQuizStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, DomainError> {
        self.inner
            .read()
            .map_err(|e| DomainError::Infrastructure(format!("quiz store lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, DomainError> {
        self.inner
            .write()
            .map_err(|e| DomainError::Infrastructure(format!("quiz store lock poisoned: {e}")))
    }
}

#[async_trait]
impl QuizStore for InMemoryQuizStore {
    async fn load_quiz(&self, quiz_id: Uuid) -> Result<Option<Quiz>, DomainError> {
        Ok(self.read()?.quizzes.get(&quiz_id).cloned())
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, DomainError> {
        let inner = self.read()?;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.quizzes.get(id).cloned())
            .collect())
    }

    async fn upsert_quiz(&self, mut quiz: Quiz) -> Result<(), DomainError> {
        let mut inner = self.write()?;
        if let Some(stored) = inner.quizzes.get(&quiz.id) {
            if stored.live {
                return Err(Conflict::QuizLocked.into());
            }
        }
        quiz.live = false;
        let code = normalize_code(&quiz.code);
        if inner
            .quizzes
            .values()
            .any(|other| other.id != quiz.id && normalize_code(&other.code) == code)
        {
            return Err(DomainError::DuplicateCode(code));
        }
        if !inner.quizzes.contains_key(&quiz.id) {
            inner.order.push(quiz.id);
        }
        inner.quizzes.insert(quiz.id, quiz);
        Ok(())
    }

    async fn set_live(&self, quiz_id: Uuid, live: bool) -> Result<Quiz, DomainError> {
        let mut inner = self.write()?;
        let quiz = inner
            .quizzes
            .get_mut(&quiz_id)
            .ok_or(DomainError::QuizNotFound(quiz_id))?;
        quiz.live = live;
        Ok(quiz.clone())
    }

    async fn insert_participant(
        &self,
        mut participant: Participant,
    ) -> Result<Participant, DomainError> {
        let mut inner = self.write()?;
        if !inner.quizzes.contains_key(&participant.quiz_id) {
            return Err(DomainError::QuizNotFound(participant.quiz_id));
        }
        let joined = inner.participants.entry(participant.quiz_id).or_default();
        participant.join_sequence = u32::try_from(joined.len())
            .map_err(|_| DomainError::Infrastructure("participant count overflow".to_owned()))?;
        joined.push(participant.clone());
        Ok(participant)
    }

    async fn load_participant(
        &self,
        quiz_id: Uuid,
        participant_id: Uuid,
    ) -> Result<Option<Participant>, DomainError> {
        Ok(self
            .read()?
            .participants
            .get(&quiz_id)
            .and_then(|list| list.iter().find(|p| p.id == participant_id))
            .cloned())
    }

    async fn save_participant(&self, participant: Participant) -> Result<(), DomainError> {
        let mut inner = self.write()?;
        let slot = inner
            .participants
            .get_mut(&participant.quiz_id)
            .and_then(|list| list.iter_mut().find(|p| p.id == participant.id))
            .ok_or(DomainError::ParticipantNotFound(participant.id))?;
        *slot = participant;
        Ok(())
    }

    async fn participants(&self, quiz_id: Uuid) -> Result<Vec<Participant>, DomainError> {
        Ok(self
            .read()?
            .participants
            .get(&quiz_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn participant_count(&self) -> Result<usize, DomainError> {
        Ok(self.read()?.participants.values().map(Vec::len).sum())
    }
}
