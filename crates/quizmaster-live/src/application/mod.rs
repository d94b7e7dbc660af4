//! Application layer for the live context.

pub mod engine;
pub mod publisher;
pub mod query_handlers;
mod timer;
