//! Domain layer for the catalog context.

pub mod aggregates;
pub mod answer;
pub mod commands;
pub mod participant;
pub mod question;
pub mod repository;
