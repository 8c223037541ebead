//! Native values produced by validators.

use serde::Serialize;
use serde_json::Value;

/// A resolved configuration value in its native representation.
///
/// The variant is chosen by the validator that produced it. Fallbacks supplied
/// by the caller are returned verbatim, so an optional `number` field with an
/// integer fallback resolves to [`EnvValue::Integer`] when the fallback is used.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum EnvValue {
    /// Text (`string`).
    String(String),
    /// Floating-point number (`number`).
    Number(f64),
    /// Boolean (`boolean`).
    Boolean(bool),
    /// Port in 1..=65535 (`port`).
    Port(u16),
    /// URL text (`url`).
    Url(String),
    /// Host text (`host`).
    Host(String),
    /// Arbitrary JSON document (`json`).
    Json(Value),
    /// E-mail text (`email`).
    Email(String),
    /// Whole number (`integer`).
    Integer(i64),
    /// UUID text (`uuidv4`).
    Uuid(String),
    /// Ordered sequence (`array`).
    Array(Vec<Value>),
    /// No usable value; the field recorded an error.
    #[default]
    Unset,
}

impl EnvValue {
    /// Text form used to re-validate a fallback with the same grammar as raw
    /// input.
    pub fn render(&self) -> String {
        match self {
            Self::String(s) | Self::Url(s) | Self::Host(s) | Self::Email(s) | Self::Uuid(s) => {
                s.clone()
            }
            Self::Number(n) => render_number(*n),
            Self::Boolean(b) => b.to_string(),
            Self::Port(p) => p.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Json(v) => v.to_string(),
            Self::Array(items) => Value::Array(items.clone()).to_string(),
            Self::Unset => String::new(),
        }
    }

    /// Whether this is the [`EnvValue::Unset`] sentinel.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Borrow the text of any text-carrying variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Url(s) | Self::Host(s) | Self::Email(s) | Self::Uuid(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    /// Numeric view of `Number`, `Integer` and `Port`.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(i) => Some(*i as f64),
            Self::Port(p) => Some(f64::from(*p)),
            _ => None,
        }
    }

    /// Boolean view.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Whole-number view of `Integer`, `Port` and integral `Number`s.
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Port(p) => Some(i64::from(*p)),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 => {
                let truncated = *n as i64;
                (truncated as f64 == *n).then_some(truncated)
            }
            _ => None,
        }
    }

    /// Port view of `Port` and in-range `Integer`s.
    pub fn as_port(&self) -> Option<u16> {
        match self {
            Self::Port(p) => Some(*p),
            Self::Integer(i) => u16::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Convert into a JSON value. `Unset` becomes `null`.
    pub fn into_json(self) -> Value {
        match self {
            Self::String(s) | Self::Url(s) | Self::Host(s) | Self::Email(s) | Self::Uuid(s) => {
                Value::String(s)
            }
            Self::Number(n) => serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number),
            Self::Boolean(b) => Value::Bool(b),
            Self::Port(p) => Value::from(p),
            Self::Integer(i) => Value::from(i),
            Self::Json(v) => v,
            Self::Array(items) => Value::Array(items),
            Self::Unset => Value::Null,
        }
    }
}

fn render_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        n.to_string()
    }
}

impl From<&str> for EnvValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for EnvValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for EnvValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for EnvValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<u16> for EnvValue {
    fn from(value: u16) -> Self {
        Self::Port(value)
    }
}

impl From<i32> for EnvValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for EnvValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Value> for EnvValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Vec<Value>> for EnvValue {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<Vec<String>> for EnvValue {
    fn from(value: Vec<String>) -> Self {
        Self::Array(value.into_iter().map(Value::String).collect())
    }
}

/// Conversion from a resolved [`EnvValue`] into a Rust type.
///
/// Used by [`Resolver::required_as`](crate::Resolver::required_as) and
/// [`Resolver::optional_as`](crate::Resolver::optional_as).
pub trait FromEnvValue: Sized {
    /// Name reported in type mismatch errors.
    const EXPECTED: &'static str;

    /// Convert, or `None` if the variant does not fit.
    fn from_env_value(value: EnvValue) -> Option<Self>;
}

impl FromEnvValue for EnvValue {
    const EXPECTED: &'static str = "value";

    fn from_env_value(value: EnvValue) -> Option<Self> {
        Some(value)
    }
}

impl FromEnvValue for String {
    const EXPECTED: &'static str = "string";

    fn from_env_value(value: EnvValue) -> Option<Self> {
        match value {
            EnvValue::String(s)
            | EnvValue::Url(s)
            | EnvValue::Host(s)
            | EnvValue::Email(s)
            | EnvValue::Uuid(s) => Some(s),
            _ => None,
        }
    }
}

impl FromEnvValue for f64 {
    const EXPECTED: &'static str = "f64";

    fn from_env_value(value: EnvValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FromEnvValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_env_value(value: EnvValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromEnvValue for u16 {
    const EXPECTED: &'static str = "u16";

    fn from_env_value(value: EnvValue) -> Option<Self> {
        value.as_port()
    }
}

impl FromEnvValue for i64 {
    const EXPECTED: &'static str = "i64";

    fn from_env_value(value: EnvValue) -> Option<Self> {
        value.as_i64()
    }
}

impl FromEnvValue for Value {
    const EXPECTED: &'static str = "json";

    fn from_env_value(value: EnvValue) -> Option<Self> {
        if value.is_unset() {
            return None;
        }
        Some(value.into_json())
    }
}

impl FromEnvValue for Vec<Value> {
    const EXPECTED: &'static str = "array";

    fn from_env_value(value: EnvValue) -> Option<Self> {
        match value {
            EnvValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl FromEnvValue for Vec<String> {
    const EXPECTED: &'static str = "array of strings";

    fn from_env_value(value: EnvValue) -> Option<Self> {
        match value {
            EnvValue::Array(items) => Some(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl<T: FromEnvValue> FromEnvValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_env_value(value: EnvValue) -> Option<Self> {
        if value.is_unset() {
            return Some(None);
        }
        T::from_env_value(value).map(Some)
    }
}
