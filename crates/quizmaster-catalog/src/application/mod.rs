//! Application layer for the catalog context.

pub mod codes;
pub mod command_handlers;
pub mod query_handlers;
