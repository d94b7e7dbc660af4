//! QuizMaster Core — shared domain abstractions.
//!
//! This crate defines the traits and types every quiz context depends on:
//! time and randomness sources, commands, outbound events and the error
//! taxonomy. It contains no storage or transport code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod publisher;
pub mod rng;
