//! Sources of raw variable values.
//!
//! The resolver never reads ambient process state directly; it is handed an
//! [`EnvSource`]. Tests use [`MapEnv`], applications use [`ProcessEnv`].

use std::collections::{BTreeMap, HashMap};
use std::env;

/// Read-only mapping from variable name to raw text.
pub trait EnvSource {
    /// Raw value of `key`, or `None` when the variable is absent.
    fn var(&self, key: &str) -> Option<String>;
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

impl<S: EnvSource + ?Sized> EnvSource for Box<S> {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// The environment of the current process.
///
/// Variables whose value is not valid unicode are treated as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Adapts a lookup closure into an [`EnvSource`].
///
/// ```
/// use envguard::{EnvSource, FnEnv};
///
/// let env = FnEnv(|key: &str| (key == "PORT").then(|| "8080".to_string()));
/// assert_eq!(env.var("PORT").as_deref(), Some("8080"));
/// assert_eq!(env.var("HOST"), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnEnv<F>(pub F);

impl<F> EnvSource for FnEnv<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }
}

/// In-memory environment, built fluently.
///
/// ```
/// use envguard::{EnvSource, MapEnv};
///
/// let env = MapEnv::new().set("PORT", "3000").set("DEBUG", "true");
/// assert_eq!(env.var("PORT").as_deref(), Some("3000"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    /// An empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, returning the environment for chaining.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a variable in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Remove a variable.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables are set.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
