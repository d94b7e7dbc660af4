//! QuizMaster — Scoring Engine.
//!
//! Pure grading of a submitted answer against a question's answer key.

pub mod domain;

pub use domain::scoring::{ScoreOutcome, ScoringError, score};
