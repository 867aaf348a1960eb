//! # tally-config
//!
//! Layered configuration for the analyzer: built-in defaults, then a JSON or
//! TOML config file, then `TALLY_*` environment variables.
//!
//! With the `logging` feature, `init_logging` installs a `tracing`
//! subscriber for binaries and tests.

pub mod config;
pub mod error;
mod level;

#[cfg(feature = "logging")]
pub mod logging;

pub use config::{AnalyzerConfig, CONFIG_FILES, ENV_PREFIX, ExtractConfig};
pub use error::{ConfigError, Result};
pub use level::LogLevel;

#[cfg(feature = "logging")]
pub use logging::{init_logging, init_logging_from_env};
