//! Observability for configuration sessions.
//!
//! This crate provides:
//! - `SessionLogger` - Structured logging carrying session, store and product context
//! - `LogEntry` - A single structured record, rendered as JSON or human-readable text
//!
//! Records are dispatched through `tracing`, so the host decides where they go.

mod logging;

pub use logging::*;
