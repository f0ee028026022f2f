//! Shared domain abstractions for Questline.
//!
//! This crate defines the error type, clock, and event envelope that the
//! narrative engine and its host adapters depend on. It contains no
//! infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
