//! Logging setup for envguard.
//!
//! Configuration resolution is quiet on success and reports problems through
//! `tracing`:
//!
//! | Event | Level | Fields |
//! |-------|-------|--------|
//! | field resolved | `debug` | `env.key`, `env.tag`, `outcome` |
//! | fallbacks used | `warn` | `warning_count`, `warnings` |
//! | run rejected | `error` | `error_count`, `errors` |
//! | dotenv unreadable | `warn` | `dotenv.path`, `error` |
//!
//! Applications install a subscriber once with [`init_logging`]; libraries
//! embedding envguard can skip this and let their own subscriber collect the
//! events.

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig};

#[doc(hidden)]
pub use tracing;

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
