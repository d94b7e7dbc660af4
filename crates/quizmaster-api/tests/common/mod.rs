//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use quizmaster_catalog::domain::aggregates::Quiz;
use quizmaster_catalog::domain::participant::Participant;
use quizmaster_catalog::domain::repository::QuizStore;
use quizmaster_catalog::infra::memory::InMemoryQuizStore;
use quizmaster_core::clock::Clock;
use quizmaster_core::error::DomainError;
use quizmaster_core::publisher::EventPublisher;
use quizmaster_core::rng::DeterministicRng;
use quizmaster_live::application::engine::EngineConfig;
use quizmaster_test_support::{FixedClock, RecordingPublisher, SequenceRng};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use quizmaster_api::routes;
use quizmaster_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Long enough that no countdown expires during a test.
const TEST_TICK: Duration = Duration::from_secs(600);

/// Build the full app router over a fresh in-memory store. Uses the same
/// route structure as `main.rs`.
pub fn build_test_app() -> Router {
    build_test_app_with(SequenceRng::new(vec![]), Arc::new(InMemoryQuizStore::new())).0
}

/// Build the app with a custom RNG and store, returning the publisher so
/// tests can inspect emitted events.
pub fn build_test_app_with(
    rng: SequenceRng,
    store: Arc<dyn QuizStore>,
) -> (Router, Arc<RecordingPublisher>) {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let publisher = Arc::new(RecordingPublisher::new());
    let app_state = AppState::new(
        fixed_clock(),
        rng,
        store,
        Arc::clone(&publisher) as Arc<dyn EventPublisher>,
        EngineConfig { tick: TEST_TICK },
        6,
    );
    (routes::router().with_state(app_state), publisher)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, json_request("POST", uri, body)).await
}

/// Send a POST request without a body.
pub async fn post_empty(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, json_request("PUT", uri, body)).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Question ids of the `DEMO123` sample quiz.
pub struct DemoQuiz {
    pub quiz_id: Uuid,
    pub slide: Uuid,
    pub france: Uuid,
    pub languages: Uuid,
    pub flat_earth: Uuid,
}

/// Creates and publishes the `DEMO123` sample quiz: an instruction slide,
/// the capital of France, programming languages, and a true/false question.
pub async fn create_demo_quiz(app: &Router) -> DemoQuiz {
    let (status, quiz) = post_json(
        app,
        "/api/v1/quizzes",
        &serde_json::json!({
            "title": "Sample Quiz",
            "description": "A quick general knowledge warm-up",
            "category": "General",
            "code": "DEMO123"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let quiz_id: Uuid = serde_json::from_value(quiz["id"].clone()).unwrap();

    let mut ids = Vec::new();
    for draft in [
        serde_json::json!({
            "type": "instruction_slide",
            "text": "Welcome! Answer as fast as you can.",
            "timer": 10
        }),
        serde_json::json!({
            "type": "single_choice",
            "text": "What is the capital of France?",
            "options": ["London", "Berlin", "Paris", "Madrid"],
            "correct_answers": [2],
            "timer": 30,
            "points": 10
        }),
        serde_json::json!({
            "type": "multiple_choice",
            "text": "Which of these are programming languages?",
            "options": ["Python", "HTML", "JavaScript", "CSS"],
            "correct_answers": [0, 2],
            "timer": 45,
            "points": 15
        }),
        serde_json::json!({
            "type": "true_false",
            "text": "The Earth is flat.",
            "correct_answers": [false],
            "timer": 20,
            "points": 5
        }),
    ] {
        let (status, question) =
            post_json(app, &format!("/api/v1/quizzes/{quiz_id}/questions"), &draft).await;
        assert_eq!(status, StatusCode::CREATED, "{question}");
        ids.push(serde_json::from_value(question["id"].clone()).unwrap());
    }

    let (status, _) = post_empty(app, &format!("/api/v1/quizzes/{quiz_id}/publish")).await;
    assert_eq!(status, StatusCode::OK);

    DemoQuiz {
        quiz_id,
        slide: ids[0],
        france: ids[1],
        languages: ids[2],
        flat_earth: ids[3],
    }
}

/// Joins the quiz with code `code` and returns the participant id.
pub async fn join(app: &Router, code: &str, name: &str) -> Uuid {
    let (status, participant) = post_json(
        app,
        "/api/v1/join",
        &serde_json::json!({ "code": code, "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{participant}");
    serde_json::from_value(participant["id"].clone()).unwrap()
}

/// A store whose every operation fails.
pub struct FailingQuizStore;

fn unavailable() -> DomainError {
    DomainError::Infrastructure("store unavailable".to_owned())
}

#[async_trait]
impl QuizStore for FailingQuizStore {
    async fn load_quiz(&self, _quiz_id: Uuid) -> Result<Option<Quiz>, DomainError> {
        Err(unavailable())
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, DomainError> {
        Err(unavailable())
    }

    async fn upsert_quiz(&self, _quiz: Quiz) -> Result<(), DomainError> {
        Err(unavailable())
    }

    async fn set_live(&self, _quiz_id: Uuid, _live: bool) -> Result<Quiz, DomainError> {
        Err(unavailable())
    }

    async fn insert_participant(
        &self,
        _participant: Participant,
    ) -> Result<Participant, DomainError> {
        Err(unavailable())
    }

    async fn load_participant(
        &self,
        _quiz_id: Uuid,
        _participant_id: Uuid,
    ) -> Result<Option<Participant>, DomainError> {
        Err(unavailable())
    }

    async fn save_participant(&self, _participant: Participant) -> Result<(), DomainError> {
        Err(unavailable())
    }

    async fn participants(&self, _quiz_id: Uuid) -> Result<Vec<Participant>, DomainError> {
        Err(unavailable())
    }

    async fn participant_count(&self) -> Result<usize, DomainError> {
        Err(unavailable())
    }
}
