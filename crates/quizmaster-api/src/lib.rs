//! QuizMaster live quiz engine — HTTP API.
//!
//! Axum routes over the question catalog, the quiz repository and the live
//! session engine. The binary in `main.rs` wires configuration, tracing and
//! the in-memory store; tests build the same router with deterministic
//! collaborators.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
