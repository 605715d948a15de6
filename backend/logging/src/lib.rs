//! Structured logging for PsychoScore.
//!
//! Subscriber setup (console + optional rolling NDJSON file) and secret
//! scrubbing for strings that may carry API keys.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LoggerGuard};
pub use redact::redact_sensitive_data;
