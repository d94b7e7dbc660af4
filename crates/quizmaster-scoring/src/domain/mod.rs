//! Domain layer for the scoring context.

pub mod scoring;
