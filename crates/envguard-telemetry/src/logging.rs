//! Structured logging for envguard.
//!
//! Resolution runs emit `tracing` events: one `debug` event per resolved
//! field, one advisory `warn` batch when fallbacks were used, and one `error`
//! batch when the run is rejected. This module wires those events to a
//! `tracing-subscriber` formatter.
//!
//! # Example
//!
//! ```rust,ignore
//! use envguard_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//!
//! tracing::info!(env.key = "PORT", "Resolving configuration");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "envguard=debug").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Whether to emit ANSI colour codes.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            file_line_info: false,
            include_target: true,
            ansi: false,
        }
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            file_line_info: true,
            include_target: true,
            ansi: true,
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Returns a copy with a different filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

/// Initializes the global logging subscriber.
///
/// Does nothing when `config.enabled` is false.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if the level directive does not
/// parse, or `TelemetryError::LoggingInit` if a global subscriber is
/// already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_ansi(false)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_ansi(config.ansi)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Creates an env filter from a directive string.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if the directive is malformed.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter(format!("{filter}: {e}")))
}

/// Standard log field names for resolution events.
pub mod fields {
    /// Environment variable name.
    pub const KEY: &str = "env.key";

    /// Semantic type tag.
    pub const TAG: &str = "env.tag";

    /// Resolution outcome (`parsed`, `fallback`, `failed`).
    pub const OUTCOME: &str = "outcome";

    /// Number of accumulated errors.
    pub const ERROR_COUNT: &str = "error_count";

    /// Number of accumulated warnings.
    pub const WARNING_COUNT: &str = "warning_count";

    /// Dotenv file path.
    pub const DOTENV_PATH: &str = "dotenv.path";
}

/// Logs the advisory batch of fallback warnings.
#[macro_export]
macro_rules! log_fallback_warnings {
    ($count:expr, $messages:expr) => {
        $crate::tracing::warn!(
            { $crate::fields::WARNING_COUNT } = $count,
            warnings = %$messages,
            "Configuration resolved with fallbacks"
        );
    };
}

/// Logs the composite failure of a resolution run.
#[macro_export]
macro_rules! log_resolution_failed {
    ($count:expr, $messages:expr) => {
        $crate::tracing::error!(
            { $crate::fields::ERROR_COUNT } = $count,
            errors = %$messages,
            "Configuration validation failed"
        );
    };
}
