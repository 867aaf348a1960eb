//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid value for `{field}`: {message}")]
    InvalidValue { field: String, message: String },
}
