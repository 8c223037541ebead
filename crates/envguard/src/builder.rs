//! Declaration driver and finalization.

use std::fmt;
use std::sync::Arc;

use crate::error::join_messages;
use crate::validators::Validator;
use crate::{
    ConfigError, DotenvEnv, DotenvOptions, EnvSource, FieldError, FieldWarning, ProcessEnv,
    Resolver, ValidationContext, ValidatorRegistry,
};

/// Runs a declaration closure against an environment and commits the result
/// only if every field resolved cleanly.
///
/// # Example
///
/// ```
/// use envguard::{ConfigBuilder, MapEnv, TypeTag};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct AppConfig {
///     port: u16,
///     debug: bool,
/// }
///
/// let env = MapEnv::new().set("PORT", "3000").set("DEBUG", "true");
/// let config = ConfigBuilder::from_source(env)
///     .build(|r| AppConfig {
///         port: r.required_as(TypeTag::Port, "PORT"),
///         debug: r.optional_as(TypeTag::Boolean, "DEBUG", false),
///     })
///     .unwrap();
///
/// assert_eq!(config.get(), AppConfig { port: 3000, debug: true });
/// assert!(config.warnings().is_empty());
/// ```
pub struct ConfigBuilder {
    source: Box<dyn EnvSource>,
    registry: Arc<ValidatorRegistry>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// A builder reading the process environment with the built-in
    /// validators.
    pub fn new() -> Self {
        Self::from_source(ProcessEnv)
    }

    /// A builder reading `source` with the built-in validators.
    pub fn from_source<S>(source: S) -> Self
    where
        S: EnvSource + 'static,
    {
        Self {
            source: Box::new(source),
            registry: Arc::new(ValidatorRegistry::builtin()),
        }
    }

    /// Replace the validator registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<ValidatorRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Add (or replace) one validator.
    #[must_use]
    pub fn with_validator<V>(mut self, tag: impl AsRef<str>, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        Arc::make_mut(&mut self.registry).register(tag, validator);
        self
    }

    /// Layer a dotenv file over the current source.
    ///
    /// A file that cannot be loaded is logged and ignored; absent variables
    /// are then simply absent.
    #[must_use]
    pub fn with_dotenv(mut self, options: &DotenvOptions) -> Self {
        self.source = Box::new(DotenvEnv::load_or_base(self.source, options));
        self
    }

    /// Layer a dotenv file over the current source, failing if it cannot be
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if the file is missing or malformed.
    pub fn with_required_dotenv(mut self, options: &DotenvOptions) -> Result<Self, ConfigError> {
        self.source = Box::new(DotenvEnv::load(self.source, options)?);
        Ok(self)
    }

    /// The registry in use.
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Run `declare` once and keep its result together with the recorded
    /// errors and warnings, without finalizing.
    pub fn evaluate<T, F>(&self, declare: F) -> Evaluation<T>
    where
        F: FnOnce(&mut Resolver<'_>) -> T,
    {
        let mut resolver = Resolver::new(&*self.source, &self.registry);
        let value = declare(&mut resolver);
        Evaluation {
            value,
            context: resolver.into_context(),
        }
    }

    /// Run `declare` once and finalize.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` carrying every field error if any
    /// field failed. The declared object is discarded in that case.
    pub fn build<T, F>(&self, declare: F) -> Result<Config<T>, ConfigError>
    where
        F: FnOnce(&mut Resolver<'_>) -> T,
    {
        self.evaluate(declare).finalize()
    }
}

impl fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Outcome of one declaration run, before finalization.
///
/// The declared object is only reachable through [`Evaluation::finalize`].
#[derive(Debug)]
pub struct Evaluation<T> {
    value: T,
    context: ValidationContext,
}

impl<T> Evaluation<T> {
    /// Error messages, in detection order.
    pub fn errors(&self) -> Vec<String> {
        self.context.errors()
    }

    /// Warning messages, in detection order.
    pub fn warnings(&self) -> Vec<String> {
        self.context.warnings()
    }

    /// Recorded errors.
    pub fn error_details(&self) -> &[FieldError] {
        self.context.error_details()
    }

    /// Recorded warnings.
    pub fn warning_details(&self) -> &[FieldWarning] {
        self.context.warning_details()
    }

    /// Whether finalization would succeed.
    pub fn is_valid(&self) -> bool {
        !self.context.has_errors()
    }

    /// Commit the object if no errors were recorded.
    ///
    /// Warnings are logged as one advisory batch. Errors are logged as one
    /// batch and returned as a single composite failure.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field failed.
    pub fn finalize(self) -> Result<Config<T>, ConfigError> {
        let (errors, warnings) = self.context.into_parts();

        if !warnings.is_empty() {
            envguard_telemetry::log_fallback_warnings!(warnings.len(), join_messages(&warnings));
        }

        if !errors.is_empty() {
            envguard_telemetry::log_resolution_failed!(errors.len(), join_messages(&errors));
            return Err(ConfigError::validation(errors));
        }

        Ok(Config {
            value: self.value,
            warnings,
        })
    }
}

/// A committed configuration.
///
/// [`Config::get`] hands out a fresh copy on every call, so callers cannot
/// mutate the stored object.
#[derive(Debug, Clone)]
pub struct Config<T> {
    value: T,
    warnings: Vec<FieldWarning>,
}

impl<T: Clone> Config<T> {
    /// A deep copy of the configuration.
    pub fn get(&self) -> T {
        self.value.clone()
    }
}

impl<T> Config<T> {
    /// Advisory messages recorded while resolving.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Advisory warnings recorded while resolving.
    pub fn warning_details(&self) -> &[FieldWarning] {
        &self.warnings
    }
}

/// Resolve against the process environment, with `.env` layered underneath
/// when present.
///
/// # Errors
///
/// Returns `ConfigError::Validation` if any field failed.
pub fn init<T, F>(declare: F) -> Result<Config<T>, ConfigError>
where
    F: FnOnce(&mut Resolver<'_>) -> T,
{
    ConfigBuilder::new()
        .with_dotenv(&DotenvOptions::default())
        .build(declare)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EnvValue, MapEnv, TypeTag};

    #[derive(Debug, Clone, PartialEq)]
    struct Server {
        port: u16,
        debug: bool,
    }

    #[test]
    fn test_build_success() {
        let env = MapEnv::new().set("PORT", "3000").set("DEBUG", "true");
        let config = ConfigBuilder::from_source(env)
            .build(|r| Server {
                port: r.required_as(TypeTag::Port, "PORT"),
                debug: r.optional_as(TypeTag::Boolean, "DEBUG", false),
            })
            .unwrap();

        assert_eq!(config.get(), Server { port: 3000, debug: true });
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn test_build_failure_discards_object() {
        let result = ConfigBuilder::from_source(MapEnv::new()).build(|r| Server {
            port: r.required_as(TypeTag::Port, "PORT"),
            debug: false,
        });

        let err = result.unwrap_err();
        let messages = err.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.contains("PORT")));
    }

    #[test]
    fn test_warnings_do_not_block() {
        let config = ConfigBuilder::from_source(MapEnv::new())
            .build(|r| r.optional_as::<u16>(TypeTag::Port, "PORT", 8080_u16))
            .unwrap();

        assert_eq!(config.get(), 8080);
        assert_eq!(config.warnings().len(), 1);
        assert_eq!(config.warning_details()[0].key(), "PORT");
    }

    #[test]
    fn test_get_returns_independent_copies() {
        let env = MapEnv::new().set("HOSTS", "a,b");
        let config = ConfigBuilder::from_source(env)
            .build(|r| r.required_as::<Vec<String>>(TypeTag::Array, "HOSTS"))
            .unwrap();

        let mut first = config.get();
        first.push("c".to_string());
        assert_eq!(config.get(), vec!["a", "b"]);
    }

    #[test]
    fn test_evaluate_exposes_messages() {
        let env = MapEnv::new().set("RATIO", "abc");
        let evaluation = ConfigBuilder::from_source(env).evaluate(|r| {
            (
                r.optional(TypeTag::Number, "RATIO", 0.5),
                r.required(TypeTag::Host, "HOST"),
            )
        });

        assert!(!evaluation.is_valid());
        assert_eq!(evaluation.warnings().len(), 1);
        assert_eq!(evaluation.errors().len(), 2);
        assert_eq!(evaluation.error_details()[0].key(), "HOST");
        assert_eq!(evaluation.warning_details()[0].key(), "RATIO");
        assert!(evaluation.finalize().is_err());
    }

    #[test]
    fn test_declaration_runs_once() {
        let mut calls = 0;
        let _ = ConfigBuilder::from_source(MapEnv::new()).build(|_| {
            calls += 1;
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_with_validator() {
        let env = MapEnv::new().set("MODE", "fast");
        let builder = ConfigBuilder::from_source(env).with_validator(
            "mode",
            |raw: &str| -> Result<EnvValue, String> {
                match raw {
                    "fast" | "safe" => Ok(EnvValue::String(raw.to_string())),
                    _ => Err(format!("unknown mode {raw}")),
                }
            },
        );

        assert!(builder.registry().contains("mode"));
        assert!(builder.registry().contains(TypeTag::Port));
        let config = builder.build(|r| r.required_as::<String>("mode", "MODE")).unwrap();
        assert_eq!(config.get(), "fast");
    }

    #[test]
    fn test_with_registry_without_builtins() {
        let registry = Arc::new(ValidatorRegistry::empty());
        let env = MapEnv::new().set("PORT", "80");
        let err = ConfigBuilder::from_source(env)
            .with_registry(registry)
            .build(|r| r.required(TypeTag::Port, "PORT"))
            .unwrap_err();

        assert_eq!(err.messages(), vec!["PORT uses unsupported type port"]);
    }

    #[test]
    fn test_with_dotenv_missing_file_is_ignored() {
        let env = MapEnv::new().set("PORT", "80");
        let config = ConfigBuilder::from_source(env)
            .with_dotenv(&DotenvOptions::new("/nonexistent/.env"))
            .build(|r| r.required_as::<u16>(TypeTag::Port, "PORT"))
            .unwrap();

        assert_eq!(config.get(), 80);
    }

    #[test]
    fn test_with_required_dotenv_missing_file_errors() {
        let result = ConfigBuilder::from_source(MapEnv::new())
            .with_required_dotenv(&DotenvOptions::new("/nonexistent/.env"));
        assert!(matches!(result, Err(ConfigError::Dotenv { .. })));
    }

    #[test]
    fn test_rebuild_is_independent() {
        let builder = ConfigBuilder::from_source(MapEnv::new());
        let first = builder.evaluate(|r| r.required(TypeTag::Port, "PORT"));
        let second = builder.evaluate(|r| r.optional(TypeTag::Port, "PORT", 80_u16));

        assert_eq!(first.errors().len(), 2);
        assert!(second.errors().is_empty());
        assert_eq!(second.warnings().len(), 1);
    }
}
