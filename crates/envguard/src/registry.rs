//! Tag-to-validator registry.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::validators::{
    ArrayValidator, BooleanValidator, EmailValidator, HostValidator, IntegerValidator,
    JsonValidator, NumberValidator, PortValidator, StringValidator, UrlValidator,
    Uuidv4Validator, Validator,
};
use crate::TypeTag;

/// Maps tag names to validators.
///
/// Lookups by an unknown name return `None`; the
/// [`Resolver`](crate::Resolver) turns that into a field error, so individual
/// validators never see a tag they do not handle.
///
/// # Example
///
/// ```
/// use envguard::{EnvValue, TypeTag, ValidatorRegistry};
///
/// let mut registry = ValidatorRegistry::builtin();
/// registry.register("even", |raw: &str| -> Result<EnvValue, String> {
///     match raw.parse::<i64>() {
///         Ok(n) if n % 2 == 0 => Ok(EnvValue::Integer(n)),
///         _ => Err(format!("{raw} is not even")),
///     }
/// });
///
/// assert!(registry.contains(TypeTag::Port));
/// assert!(registry.get("even").is_some());
/// ```
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: IndexMap<String, Arc<dyn Validator>>,
}

impl ValidatorRegistry {
    /// A registry with no validators.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the eleven built-in validators.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for tag in TypeTag::ALL {
            registry
                .validators
                .insert(tag.as_str().to_string(), builtin_validator(tag));
        }
        registry
    }

    /// Register (or replace) the validator for a tag name.
    pub fn register<V>(&mut self, tag: impl AsRef<str>, validator: V) -> &mut Self
    where
        V: Validator + 'static,
    {
        self.validators
            .insert(tag.as_ref().to_string(), Arc::new(validator));
        self
    }

    /// Register a validator and return the registry, for chaining.
    #[must_use]
    pub fn with<V>(mut self, tag: impl AsRef<str>, validator: V) -> Self
    where
        V: Validator + 'static,
    {
        self.register(tag, validator);
        self
    }

    /// Look up the validator for a tag name.
    pub fn get(&self, tag: impl AsRef<str>) -> Option<&dyn Validator> {
        self.validators.get(tag.as_ref()).map(|validator| &**validator)
    }

    /// Whether a tag name is registered.
    pub fn contains(&self, tag: impl AsRef<str>) -> bool {
        self.validators.contains_key(tag.as_ref())
    }

    /// Registered tag names, in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }

    /// Number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("tags", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn builtin_validator(tag: TypeTag) -> Arc<dyn Validator> {
    match tag {
        TypeTag::String => Arc::new(StringValidator),
        TypeTag::Number => Arc::new(NumberValidator),
        TypeTag::Boolean => Arc::new(BooleanValidator),
        TypeTag::Port => Arc::new(PortValidator),
        TypeTag::Url => Arc::new(UrlValidator),
        TypeTag::Host => Arc::new(HostValidator),
        TypeTag::Json => Arc::new(JsonValidator),
        TypeTag::Email => Arc::new(EmailValidator),
        TypeTag::Integer => Arc::new(IntegerValidator),
        TypeTag::Uuidv4 => Arc::new(Uuidv4Validator),
        TypeTag::Array => Arc::new(ArrayValidator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnvValue;

    #[test]
    fn test_builtin_has_all_tags() {
        let registry = ValidatorRegistry::builtin();
        assert_eq!(registry.len(), 11);
        for tag in TypeTag::ALL {
            assert!(registry.contains(tag), "missing {tag}");
        }
        assert_eq!(registry.tags().next(), Some("string"));
    }

    #[test]
    fn test_unknown_tag_is_not_found() {
        let registry = ValidatorRegistry::builtin();
        assert!(registry.get("duration").is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = ValidatorRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.get(TypeTag::String).is_none());
    }

    #[test]
    fn test_register_custom_validator() {
        let registry = ValidatorRegistry::empty().with("upper", |raw: &str| -> Result<EnvValue, String> {
            Ok(EnvValue::String(raw.to_uppercase()))
        });

        let validator = registry.get("upper").unwrap();
        assert_eq!(validator.parse("abc").unwrap(), EnvValue::String("ABC".into()));
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = ValidatorRegistry::builtin();
        registry.register(TypeTag::String, |_: &str| -> Result<EnvValue, String> {
            Err("strings disabled".to_string())
        });

        assert_eq!(registry.len(), 11);
        assert!(registry.get("string").unwrap().parse("x").is_err());
    }

    #[test]
    fn test_debug_lists_tags() {
        let registry = ValidatorRegistry::empty().with("port", PortValidator);
        assert!(format!("{registry:?}").contains("port"));
    }
}
