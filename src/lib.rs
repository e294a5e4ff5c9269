#![deny(missing_docs)]

//! Core library for the student records server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Store activity metrics.
pub mod metrics;
/// Student store, summarizers, and the service facade.
pub mod records;
