//! Typed, validated configuration from environment variables.
//!
//! envguard resolves a flat set of environment variables into a caller-defined
//! configuration object. Every variable is checked against a semantic type
//! (port, url, email, ...) and failures are escalated according to whether the
//! field is required:
//!
//! - **required**: an absent or invalid value is an error
//! - **optional**: an absent or invalid value falls back to a default with a
//!   warning; an invalid default is an error
//!
//! Errors are collected over the whole declaration and reported together. The
//! configuration object is handed out only when no error was recorded.
//!
//! # Example
//!
//! ```
//! use envguard::{ConfigBuilder, MapEnv, TypeTag};
//!
//! #[derive(Debug, Clone)]
//! struct AppConfig {
//!     port: u16,
//!     database_url: String,
//!     debug: bool,
//!     allowed_hosts: Vec<String>,
//! }
//!
//! let env = MapEnv::new()
//!     .set("PORT", "8080")
//!     .set("DATABASE_URL", "postgres://db:5432/app")
//!     .set("ALLOWED_HOSTS", "api.example.com,admin.example.com");
//!
//! let config = ConfigBuilder::from_source(env)
//!     .build(|r| AppConfig {
//!         port: r.required_as(TypeTag::Port, "PORT"),
//!         database_url: r.required_as(TypeTag::Url, "DATABASE_URL"),
//!         debug: r.optional_as(TypeTag::Boolean, "DEBUG", false),
//!         allowed_hosts: r.optional_as(TypeTag::Array, "ALLOWED_HOSTS", Vec::<String>::new()),
//!     })
//!     .expect("valid configuration");
//!
//! let app = config.get();
//! assert_eq!(app.port, 8080);
//! assert_eq!(app.allowed_hosts.len(), 2);
//! assert_eq!(config.warnings().len(), 1); // DEBUG fell back to false
//! ```
//!
//! # Types
//!
//! | Tag | Accepts | Value |
//! |-----|---------|-------|
//! | `string` | anything | text |
//! | `number` | float literal prefix | `f64` |
//! | `boolean` | `true/1/yes/on/enable(d)/t/y`, `false/0/no/off/disable(d)/f/n` | `bool` |
//! | `port` | integer in 1..=65535 | `u16` |
//! | `url` | absolute URL with scheme | text |
//! | `host` | IPv4/IPv6 literal or `localhost` | text |
//! | `json` | any JSON document | `serde_json::Value` |
//! | `email` | `local@domain.tld` | text |
//! | `integer` | whole number | `i64` |
//! | `uuidv4` | RFC 4122 version 4 UUID | text |
//! | `array` | JSON array, else comma-separated list | `Vec<serde_json::Value>` |
//!
//! Further types are added by registering a [`Validator`] in a
//! [`ValidatorRegistry`].
//!
//! # Dotenv files
//!
//! [`ConfigBuilder::with_dotenv`] layers a `.env` file under (or over) the
//! process environment without modifying it. A file that cannot be read is
//! logged and ignored.

#![warn(missing_docs)]

mod builder;
mod context;
mod dotenv;
mod error;
mod registry;
mod resolver;
mod source;
mod tag;
pub mod validators;
mod value;

pub use builder::{init, Config, ConfigBuilder, Evaluation};
pub use context::ValidationContext;
pub use dotenv::{DotenvEnv, DotenvOptions};
pub use error::{ConfigError, FallbackCause, FieldError, FieldWarning};
pub use registry::ValidatorRegistry;
pub use resolver::Resolver;
pub use source::{EnvSource, FnEnv, MapEnv, ProcessEnv};
pub use tag::TypeTag;
pub use validators::Validator;
pub use value::{EnvValue, FromEnvValue};
