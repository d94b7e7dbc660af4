//! Per-question countdown task.

use std::sync::{Arc, Weak};
use std::time::Duration;

use quizmaster_core::clock::Clock;
use quizmaster_core::publisher::EventPublisher;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::engine::{SessionSlot, publish_pending};
use crate::domain::aggregates::TickOutcome;

/// What a countdown task needs besides the slot it ticks.
#[derive(Clone)]
pub(crate) struct TickContext {
    pub(crate) tick: Duration,
    pub(crate) correlation_id: Uuid,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) publisher: Arc<dyn EventPublisher>,
}

/// Handle on the countdown task of one session.
///
/// Every `arm` or `stop` bumps the epoch; a task whose epoch is stale exits
/// on its next tick without touching the session.
#[derive(Debug, Default)]
pub(crate) struct Countdown {
    epoch: u64,
    handle: Option<JoinHandle<()>>,
}

impl Countdown {
    /// Stops the running task, if any.
    pub(crate) fn stop(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Replaces any running task with a fresh one ticking `slot`.
    pub(crate) fn arm(&mut self, slot: &Arc<Mutex<SessionSlot>>, ctx: TickContext) {
        self.stop();
        let epoch = self.epoch;
        let slot = Arc::downgrade(slot);
        self.handle = Some(tokio::spawn(run(slot, epoch, ctx)));
    }

    pub(crate) fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(slot: Weak<Mutex<SessionSlot>>, epoch: u64, ctx: TickContext) {
    loop {
        tokio::time::sleep(ctx.tick).await;

        let Some(slot) = slot.upgrade() else {
            return;
        };
        let mut guard = slot.lock().await;
        if !guard.countdown.is_current(epoch) {
            return;
        }

        let outcome = guard.session.tick(ctx.correlation_id, ctx.clock.as_ref());
        publish_pending(&mut guard.session, ctx.publisher.as_ref());

        match outcome {
            TickOutcome::Running(remaining) => {
                debug!(quiz_id = %guard.session.quiz_id, remaining, "countdown tick");
            }
            TickOutcome::Expired => {
                info!(
                    quiz_id = %guard.session.quiz_id,
                    question_index = guard.session.current_index(),
                    "time up"
                );
                return;
            }
            TickOutcome::Idle => return,
        }
    }
}
