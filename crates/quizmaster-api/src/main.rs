//! QuizMaster API server entry point.

use std::error::Error;
use std::sync::{Arc, Mutex};

use quizmaster_api::config::ApiConfig;
use quizmaster_api::routes;
use quizmaster_api::state::AppState;
use quizmaster_api::telemetry;
use quizmaster_catalog::infra::memory::InMemoryQuizStore;
use quizmaster_core::clock::SystemClock;
use quizmaster_core::rng::{DeterministicRng, SystemRng};
use quizmaster_live::application::engine::EngineConfig;
use quizmaster_live::application::publisher::BroadcastPublisher;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ApiConfig::from_env()?;
    let provider = telemetry::init_tracing(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting QuizMaster API server");

    let publisher = BroadcastPublisher::new(config.event_channel_capacity);
    spawn_event_log(&publisher);

    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(SystemRng::new()));
    let app_state = AppState::new(
        Arc::new(SystemClock),
        rng,
        Arc::new(InMemoryQuizStore::new()),
        Arc::new(publisher),
        EngineConfig { tick: config.tick },
        config.code_length,
    );

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    telemetry::shutdown_tracing(provider);
    Ok(())
}

/// Logs every published live event until the channel closes.
fn spawn_event_log(publisher: &BroadcastPublisher) {
    let mut events = publisher.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::info!(
                    event_type = %event.event_type,
                    aggregate_id = %event.aggregate_id,
                    correlation_id = %event.correlation_id,
                    "live event"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event log lagged");
                }
                Err(RecvError::Closed) => return,
            }
        }
    });
}
