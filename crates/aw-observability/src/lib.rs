//! # aw-observability
//!
//! Structured logging for Asset Warden, built on `tracing`.

pub mod logging;

pub use logging::{init_logging, init_logging_with_config, LoggingConfig};
