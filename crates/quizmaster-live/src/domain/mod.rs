//! Domain layer for the live context.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod leaderboard;
pub mod results;
