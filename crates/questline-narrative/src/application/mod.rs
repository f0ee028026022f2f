//! Application layer: handlers the host adapter calls.

pub mod command_handlers;
pub mod query_handlers;
