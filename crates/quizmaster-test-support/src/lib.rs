//! Shared test mocks and utilities for the QuizMaster live quiz engine.

mod clock;
mod publisher;
mod rng;

pub use clock::{FixedClock, fixed_now};
pub use publisher::RecordingPublisher;
pub use rng::{MockRng, SequenceRng};
