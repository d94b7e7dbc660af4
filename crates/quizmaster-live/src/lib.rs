//! QuizMaster — Live Session Engine.
//!
//! Responsible for pacing a published quiz in front of an audience: question
//! reveal, countdown, answer collection, and the final leaderboard and
//! results projections.

pub mod application;
pub mod domain;
