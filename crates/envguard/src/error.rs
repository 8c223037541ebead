//! Error and warning types.
//!
//! Field-level problems ([`FieldError`], [`FieldWarning`]) are recorded into a
//! [`ValidationContext`](crate::ValidationContext) and never returned from a
//! single resolution. [`ConfigError`] is what a caller eventually sees.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A fatal problem with one field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Required variable is absent.
    #[error("{key} is not defined")]
    MissingRequired {
        /// Variable name.
        key: String,
    },

    /// Variable is present but does not match the type's grammar.
    #[error("{key} is not a valid {tag}: {reason}")]
    InvalidFormat {
        /// Variable name.
        key: String,
        /// Type tag the value was checked against.
        tag: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The caller-supplied fallback does not match the type's grammar.
    #[error("fallback for {key} is not a valid {tag}: {reason}")]
    InvalidFallback {
        /// Variable name.
        key: String,
        /// Type tag the fallback was checked against.
        tag: String,
        /// Why the fallback was rejected.
        reason: String,
    },

    /// No validator is registered for the tag.
    #[error("{key} uses unsupported type {tag}")]
    UnsupportedType {
        /// Variable name.
        key: String,
        /// Unknown tag.
        tag: String,
    },

    /// The resolved value cannot be converted into the requested Rust type.
    #[error("{key} resolved as {tag} cannot be read as {expected}")]
    TypeMismatch {
        /// Variable name.
        key: String,
        /// Type tag used for resolution.
        tag: String,
        /// Name of the requested Rust type.
        expected: &'static str,
    },
}

impl FieldError {
    /// Create a new missing required error.
    pub fn missing_required(key: impl Into<String>) -> Self {
        Self::MissingRequired { key: key.into() }
    }

    /// Create a new invalid format error.
    pub fn invalid_format(
        key: impl Into<String>,
        tag: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFormat {
            key: key.into(),
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid fallback error.
    pub fn invalid_fallback(
        key: impl Into<String>,
        tag: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFallback {
            key: key.into(),
            tag: tag.into(),
            reason: reason.into(),
        }
    }

    /// Create a new unsupported type error.
    pub fn unsupported_type(key: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::UnsupportedType {
            key: key.into(),
            tag: tag.into(),
        }
    }

    /// Create a new type mismatch error.
    pub fn type_mismatch(
        key: impl Into<String>,
        tag: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            tag: tag.into(),
            expected,
        }
    }

    /// Variable name the error refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::MissingRequired { key }
            | Self::InvalidFormat { key, .. }
            | Self::InvalidFallback { key, .. }
            | Self::UnsupportedType { key, .. }
            | Self::TypeMismatch { key, .. } => key,
        }
    }
}

/// Why an optional field fell back to its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackCause {
    /// The variable was not set.
    Absent,
    /// The variable was set but did not parse.
    Invalid,
}

impl fmt::Display for FallbackCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("is not defined"),
            Self::Invalid => f.write_str("is invalid"),
        }
    }
}

/// An advisory problem with one field. Never blocks finalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldWarning {
    /// An optional field used its fallback.
    #[error("{key} {cause} for type {tag}, using default {fallback}")]
    FallbackUsed {
        /// Variable name.
        key: String,
        /// Type tag.
        tag: String,
        /// Whether the raw value was absent or invalid.
        cause: FallbackCause,
        /// Textual form of the fallback that was used.
        fallback: String,
    },
}

impl FieldWarning {
    /// Create a new fallback warning.
    pub fn fallback_used(
        key: impl Into<String>,
        tag: impl Into<String>,
        cause: FallbackCause,
        fallback: impl Into<String>,
    ) -> Self {
        Self::FallbackUsed {
            key: key.into(),
            tag: tag.into(),
            cause,
            fallback: fallback.into(),
        }
    }

    /// Variable name the warning refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::FallbackUsed { key, .. } => key,
        }
    }
}

/// Errors surfaced to the caller of envguard.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more fields failed; the resolved object was discarded.
    #[error("configuration validation failed:\n{}", join_messages(.errors))]
    Validation {
        /// Every field error, in detection order.
        errors: Vec<FieldError>,
    },

    /// A dotenv file could not be loaded.
    #[error("failed to load dotenv file {path}: {source}")]
    Dotenv {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: dotenvy::Error,
    },

    /// A type tag name is not one of the built-in tags.
    #[error("unknown type tag: {tag}")]
    UnknownType {
        /// The unrecognized tag.
        tag: String,
    },
}

impl ConfigError {
    /// Create a new composite validation error.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    /// Create a new dotenv error.
    pub fn dotenv(path: impl Into<PathBuf>, source: dotenvy::Error) -> Self {
        Self::Dotenv {
            path: path.into(),
            source,
        }
    }

    /// Create a new unknown type error.
    pub fn unknown_type(tag: impl Into<String>) -> Self {
        Self::UnknownType { tag: tag.into() }
    }

    /// Individual messages of a composite failure, in detection order.
    ///
    /// Empty for non-validation errors.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation { errors } => errors.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        }
    }

    /// Field errors of a composite failure.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation { errors } => errors,
            _ => &[],
        }
    }
}

pub(crate) fn join_messages<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
