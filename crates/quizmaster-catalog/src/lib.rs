//! QuizMaster — Question Catalog and Quiz Repository.
//!
//! Responsible for question type rules and validation, quiz authoring,
//! quiz codes, and participant registration.

pub mod application;
pub mod domain;
pub mod infra;
