//! Required/optional resolution and the escalation policy.
//!
//! | call | raw | fallback | result | recorded |
//! |------|-----|----------|--------|----------|
//! | `required` | valid | - | parsed | nothing |
//! | `required` | invalid | - | `Unset` | error |
//! | `required` | absent | - | parse of `""` or `Unset` | error, plus a second error if `""` is invalid |
//! | `optional` | valid | any | parsed | nothing |
//! | `optional` | invalid/absent | valid | fallback | warning |
//! | `optional` | invalid/absent | invalid or `Unset` | fallback | error |

use envguard_telemetry::fields;
use tracing::debug;

use crate::{
    EnvSource, EnvValue, FallbackCause, FieldError, FieldWarning, FromEnvValue,
    ValidationContext, ValidatorRegistry,
};

/// Resolves fields against an environment, recording problems into a
/// [`ValidationContext`].
///
/// Individual calls never fail; they always return a value and leave the
/// decision to abort to [`Evaluation::finalize`](crate::Evaluation::finalize).
///
/// # Example
///
/// ```
/// use envguard::{MapEnv, Resolver, TypeTag, ValidatorRegistry};
///
/// let env = MapEnv::new().set("PORT", "3000");
/// let registry = ValidatorRegistry::builtin();
/// let mut resolver = Resolver::new(&env, &registry);
///
/// let port: u16 = resolver.required_as(TypeTag::Port, "PORT");
/// let debug: bool = resolver.optional_as(TypeTag::Boolean, "DEBUG", false);
///
/// assert_eq!(port, 3000);
/// assert!(!debug);
/// assert_eq!(resolver.warnings().len(), 1);
/// assert!(resolver.errors().is_empty());
/// ```
pub struct Resolver<'a> {
    source: &'a dyn EnvSource,
    registry: &'a ValidatorRegistry,
    context: ValidationContext,
}

impl<'a> Resolver<'a> {
    /// A resolver with a fresh context.
    pub fn new(source: &'a dyn EnvSource, registry: &'a ValidatorRegistry) -> Self {
        Self {
            source,
            registry,
            context: ValidationContext::new(),
        }
    }

    /// Resolve a field that must be present and valid.
    ///
    /// An absent variable records "not defined" and the empty string is then
    /// validated like any other raw value, so for most types a missing
    /// required field yields two errors.
    pub fn required(&mut self, tag: impl AsRef<str>, key: &str) -> EnvValue {
        let tag = tag.as_ref();
        let registry = self.registry;
        let Some(validator) = registry.get(tag) else {
            self.context.push_error(FieldError::unsupported_type(key, tag));
            log_outcome(key, tag, "failed");
            return EnvValue::Unset;
        };

        let raw = self.source.var(key).unwrap_or_else(|| {
            self.context.push_error(FieldError::missing_required(key));
            String::new()
        });

        match validator.parse(&raw) {
            Ok(value) => {
                log_outcome(key, tag, "parsed");
                value
            }
            Err(reason) => {
                self.context
                    .push_error(FieldError::invalid_format(key, tag, reason));
                log_outcome(key, tag, "failed");
                EnvValue::Unset
            }
        }
    }

    /// Resolve a field that falls back to `fallback` when absent or invalid.
    ///
    /// The fallback is checked with the same grammar as raw input. A valid
    /// fallback records a warning; an invalid one records an error. Either
    /// way the fallback is returned as given.
    pub fn optional(
        &mut self,
        tag: impl AsRef<str>,
        key: &str,
        fallback: impl Into<EnvValue>,
    ) -> EnvValue {
        let tag = tag.as_ref();
        let fallback = fallback.into();
        let registry = self.registry;
        let Some(validator) = registry.get(tag) else {
            self.context.push_error(FieldError::unsupported_type(key, tag));
            log_outcome(key, tag, "failed");
            return fallback;
        };

        let cause = match self.source.var(key) {
            Some(raw) => match validator.parse(&raw) {
                Ok(value) => {
                    log_outcome(key, tag, "parsed");
                    return value;
                }
                Err(_) => FallbackCause::Invalid,
            },
            None => FallbackCause::Absent,
        };

        if fallback.is_unset() {
            self.context.push_error(FieldError::invalid_fallback(
                key,
                tag,
                "no fallback value given",
            ));
            log_outcome(key, tag, "failed");
            return fallback;
        }

        let rendered = fallback.render();
        match validator.parse(&rendered) {
            Ok(_) => {
                self.context
                    .push_warning(FieldWarning::fallback_used(key, tag, cause, rendered));
                log_outcome(key, tag, "fallback");
            }
            Err(reason) => {
                self.context
                    .push_error(FieldError::invalid_fallback(key, tag, reason));
                log_outcome(key, tag, "failed");
            }
        }
        fallback
    }

    /// [`Resolver::required`], converted into `T`.
    ///
    /// A failed field yields `T::default()`. A value that does not fit `T`
    /// records a type mismatch error, unless the field already failed.
    pub fn required_as<T>(&mut self, tag: impl AsRef<str>, key: &str) -> T
    where
        T: FromEnvValue + Default,
    {
        let tag = tag.as_ref();
        let recorded = self.context.error_details().len();
        let value = self.required(tag, key);
        self.convert(value, tag, key, recorded)
    }

    /// [`Resolver::optional`], converted into `T`.
    pub fn optional_as<T>(
        &mut self,
        tag: impl AsRef<str>,
        key: &str,
        fallback: impl Into<EnvValue>,
    ) -> T
    where
        T: FromEnvValue + Default,
    {
        let tag = tag.as_ref();
        let recorded = self.context.error_details().len();
        let value = self.optional(tag, key, fallback);
        self.convert(value, tag, key, recorded)
    }

    fn convert<T>(&mut self, value: EnvValue, tag: &str, key: &str, recorded: usize) -> T
    where
        T: FromEnvValue + Default,
    {
        let failed = self.context.error_details().len() > recorded;
        match T::from_env_value(value) {
            Some(converted) => converted,
            // One error per field.
            None if failed => T::default(),
            None => {
                self.context
                    .push_error(FieldError::type_mismatch(key, tag, T::EXPECTED));
                T::default()
            }
        }
    }

    /// Error messages recorded so far.
    pub fn errors(&self) -> Vec<String> {
        self.context.errors()
    }

    /// Warning messages recorded so far.
    pub fn warnings(&self) -> Vec<String> {
        self.context.warnings()
    }

    /// The context being filled.
    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Consume the resolver, returning its context.
    pub fn into_context(self) -> ValidationContext {
        self.context
    }
}

fn log_outcome(key: &str, tag: &str, outcome: &'static str) {
    debug!(
        { fields::KEY } = key,
        { fields::TAG } = tag,
        { fields::OUTCOME } = outcome,
        "resolved field"
    );
}
