//! Shared application state.

use std::sync::{Arc, Mutex};

use quizmaster_catalog::domain::repository::QuizStore;
use quizmaster_core::clock::Clock;
use quizmaster_core::publisher::EventPublisher;
use quizmaster_core::rng::DeterministicRng;
use quizmaster_live::application::engine::{EngineConfig, LiveSessionEngine};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for timestamps.
    pub clock: Arc<dyn Clock>,
    /// RNG for quiz code generation.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Quiz and participant store.
    pub store: Arc<dyn QuizStore>,
    /// Live session engine.
    pub engine: Arc<LiveSessionEngine>,
    /// Length of generated quiz codes.
    pub code_length: usize,
}

impl AppState {
    /// Create new application state with an engine over `store`.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        store: Arc<dyn QuizStore>,
        publisher: Arc<dyn EventPublisher>,
        engine_config: EngineConfig,
        code_length: usize,
    ) -> Self {
        let engine = Arc::new(LiveSessionEngine::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            publisher,
            engine_config,
        ));
        Self {
            clock,
            rng,
            store,
            engine,
            code_length,
        }
    }
}
