//! Dotenv overlay, loaded before resolution begins.
//!
//! Unlike `dotenvy::dotenv()`, nothing is written into the process
//! environment: the file's variables are kept in a [`DotenvEnv`] layered over
//! a base [`EnvSource`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use envguard_telemetry::fields;
use tracing::{debug, warn};

use crate::{ConfigError, EnvSource};

/// Options for loading a dotenv file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotenvOptions {
    /// File to read.
    pub path: PathBuf,
    /// Whether file values win over variables already set in the base
    /// source.
    pub override_existing: bool,
}

impl Default for DotenvOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".env"),
            override_existing: false,
        }
    }
}

impl DotenvOptions {
    /// Options reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Let file values override the base source.
    #[must_use]
    pub fn override_existing(mut self, enabled: bool) -> Self {
        self.override_existing = enabled;
        self
    }
}

/// A base [`EnvSource`] with the contents of a dotenv file layered on top.
#[derive(Debug, Clone)]
pub struct DotenvEnv<S> {
    base: S,
    file_vars: HashMap<String, String>,
    override_existing: bool,
}

impl<S: EnvSource> DotenvEnv<S> {
    /// Read the dotenv file described by `options`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if the file is missing, unreadable or
    /// malformed.
    pub fn load(base: S, options: &DotenvOptions) -> Result<Self, ConfigError> {
        let file_vars = read_file(&options.path)?;
        debug!(
            { fields::DOTENV_PATH } = %options.path.display(),
            count = file_vars.len(),
            "loaded dotenv file"
        );
        Ok(Self {
            base,
            file_vars,
            override_existing: options.override_existing,
        })
    }

    /// Like [`DotenvEnv::load`], but a file that cannot be loaded only logs a
    /// warning and leaves the base source unchanged.
    pub fn load_or_base(base: S, options: &DotenvOptions) -> Self {
        match read_file(&options.path) {
            Ok(file_vars) => Self {
                base,
                file_vars,
                override_existing: options.override_existing,
            },
            Err(e) => {
                warn!(
                    { fields::DOTENV_PATH } = %options.path.display(),
                    error = %e,
                    "dotenv file not loaded, continuing with base environment"
                );
                Self {
                    base,
                    file_vars: HashMap::new(),
                    override_existing: options.override_existing,
                }
            }
        }
    }

    /// Layer an already-parsed set of variables over `base`.
    pub fn from_vars(base: S, file_vars: HashMap<String, String>, override_existing: bool) -> Self {
        Self {
            base,
            file_vars,
            override_existing,
        }
    }

    /// Number of variables read from the file.
    pub fn file_len(&self) -> usize {
        self.file_vars.len()
    }
}

impl<S: EnvSource> EnvSource for DotenvEnv<S> {
    fn var(&self, key: &str) -> Option<String> {
        let from_file = || self.file_vars.get(key).cloned();
        if self.override_existing {
            from_file().or_else(|| self.base.var(key))
        } else {
            self.base.var(key).or_else(from_file)
        }
    }
}

fn read_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| ConfigError::dotenv(path, e))?;
    iter.map(|item| item.map_err(|e| ConfigError::dotenv(path, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapEnv;
    use std::io::Write;

    fn write_env(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_options() {
        let options = DotenvOptions::default();
        assert_eq!(options.path, PathBuf::from(".env"));
        assert!(!options.override_existing);
    }

    #[test]
    fn test_load_file() {
        let file = write_env("PORT=3000\n# comment\nNAME=\"quoted value\"\n");
        let env = DotenvEnv::load(MapEnv::new(), &DotenvOptions::new(file.path())).unwrap();

        assert_eq!(env.file_len(), 2);
        assert_eq!(env.var("PORT").as_deref(), Some("3000"));
        assert_eq!(env.var("NAME").as_deref(), Some("quoted value"));
        assert_eq!(env.var("MISSING"), None);
    }

    #[test]
    fn test_base_wins_by_default() {
        let file = write_env("PORT=3000\nHOST=localhost\n");
        let base = MapEnv::new().set("PORT", "8080");
        let env = DotenvEnv::load(base, &DotenvOptions::new(file.path())).unwrap();

        assert_eq!(env.var("PORT").as_deref(), Some("8080"));
        assert_eq!(env.var("HOST").as_deref(), Some("localhost"));
    }

    #[test]
    fn test_override_existing() {
        let file = write_env("PORT=3000\n");
        let base = MapEnv::new().set("PORT", "8080");
        let options = DotenvOptions::new(file.path()).override_existing(true);
        let env = DotenvEnv::load(base, &options).unwrap();

        assert_eq!(env.var("PORT").as_deref(), Some("3000"));
    }

    #[test]
    fn test_missing_file_errors() {
        let result = DotenvEnv::load(MapEnv::new(), &DotenvOptions::new("/nonexistent/.env"));
        assert!(matches!(result, Err(ConfigError::Dotenv { .. })));
    }

    #[test]
    fn test_missing_file_falls_back_to_base() {
        let base = MapEnv::new().set("PORT", "8080");
        let env = DotenvEnv::load_or_base(base, &DotenvOptions::new("/nonexistent/.env"));

        assert_eq!(env.file_len(), 0);
        assert_eq!(env.var("PORT").as_deref(), Some("8080"));
    }
}
