//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`
//! - Logs go to stderr; stdout carries protocol responses only

pub mod logging;

pub use logging::init_logging;
