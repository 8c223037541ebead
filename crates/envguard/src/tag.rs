//! Built-in semantic type tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The closed set of built-in semantic types.
///
/// Each tag selects one validation grammar and one native representation
/// (see [`EnvValue`](crate::EnvValue)). Tags are used wherever the resolver
/// expects a tag name, so `TypeTag::Port` and `"port"` are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Any text.
    String,
    /// Floating-point number.
    Number,
    /// Boolean from a fixed vocabulary.
    Boolean,
    /// TCP/UDP port in 1..=65535.
    Port,
    /// Absolute URL with a scheme.
    Url,
    /// IP literal or `localhost`.
    Host,
    /// Any JSON document.
    Json,
    /// E-mail address.
    Email,
    /// Whole number.
    Integer,
    /// RFC 4122 version-4 UUID.
    Uuidv4,
    /// JSON array or comma-separated list.
    Array,
}

impl TypeTag {
    /// All built-in tags.
    pub const ALL: [TypeTag; 11] = [
        TypeTag::String,
        TypeTag::Number,
        TypeTag::Boolean,
        TypeTag::Port,
        TypeTag::Url,
        TypeTag::Host,
        TypeTag::Json,
        TypeTag::Email,
        TypeTag::Integer,
        TypeTag::Uuidv4,
        TypeTag::Array,
    ];

    /// Registry name of the tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Port => "port",
            Self::Url => "url",
            Self::Host => "host",
            Self::Json => "json",
            Self::Email => "email",
            Self::Integer => "integer",
            Self::Uuidv4 => "uuidv4",
            Self::Array => "array",
        }
    }
}

impl AsRef<str> for TypeTag {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| ConfigError::unknown_type(s))
    }
}
