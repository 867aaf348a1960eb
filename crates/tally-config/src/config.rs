//! Analyzer settings and how they are layered.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Json, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tally_graph::{CodeLevel, DEFAULT_MAX_REEXPORT_DEPTH};
use tally_transform::TransformOptions;

use crate::LogLevel;
use crate::error::{ConfigError, Result};

/// Config files picked up from the working directory, first match wins.
pub const CONFIG_FILES: &[&str] = &["tally.json", "tally.toml"];

/// Prefix of environment overrides, e.g. `TALLY_INITIAL_ONLY=true`.
pub const ENV_PREFIX: &str = "TALLY_";

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Build context directory.
    pub root: PathBuf,
    /// Output filename template, e.g. `[name].[contenthash:8].js`, used to
    /// match hashed assets across builds.
    pub output_filename: Option<String>,
    pub code_level: CodeLevel,
    /// Identifier prefixes of bundler runtime modules.
    pub runtime_prefixes: Vec<String>,
    /// Bailout substrings filtered as expected noise.
    pub ignored_bailouts: Vec<String>,
    /// Namespace in `webpack://<namespace>/` source paths.
    pub source_namespace: Option<String>,
    pub max_reexport_depth: usize,
    pub parallel_attribution: bool,
    /// Restrict diffs to assets of initial chunks.
    pub initial_only: bool,
    pub log_level: LogLevel,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        let transform = TransformOptions::default();
        Self {
            root: PathBuf::from("."),
            output_filename: None,
            code_level: CodeLevel::Full,
            runtime_prefixes: transform.runtime_prefixes,
            ignored_bailouts: transform.ignored_bailouts,
            source_namespace: None,
            max_reexport_depth: DEFAULT_MAX_REEXPORT_DEPTH,
            parallel_attribution: true,
            initial_only: false,
            log_level: LogLevel::Info,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration.
    ///
    /// Priority: environment variables > config file > defaults. The config
    /// file is `path` when given, which must then exist, or the first of
    /// [`CONFIG_FILES`] present in the working directory. Files ending in
    /// `.toml` are read as TOML, anything else as JSON.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => CONFIG_FILES
                .iter()
                .map(Path::new)
                .find(|candidate| candidate.exists())
                .map(Path::to_path_buf),
        };
        Self::figment(file.as_deref()).extract_config()
    }

    /// The layered provider chain, exposed for callers that merge their own
    /// overrides on top.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "loading config file");
            figment = if file.extension().is_some_and(|ext| ext == "toml") {
                figment.merge(Toml::file(file))
            } else {
                figment.merge(Json::file(file))
            };
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "root".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.max_reexport_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_reexport_depth".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(template) = &self.output_filename {
            if template.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "output_filename".to_string(),
                    message: "must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Options for the stats transform.
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            root: Some(self.root.clone()),
            runtime_prefixes: self.runtime_prefixes.clone(),
            ignored_bailouts: self.ignored_bailouts.clone(),
        }
    }
}

/// Extraction plus validation for a figment holding an [`AnalyzerConfig`].
pub trait ExtractConfig {
    fn extract_config(&self) -> Result<AnalyzerConfig>;
}

impl ExtractConfig for Figment {
    fn extract_config(&self) -> Result<AnalyzerConfig> {
        let config: AnalyzerConfig = self.extract()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_reexport_depth, 16);
        assert!(config.parallel_attribution);
    }

    #[test]
    fn test_empty_root_rejected() {
        let config = AnalyzerConfig {
            root: PathBuf::new(),
            ..AnalyzerConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "root"));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = AnalyzerConfig {
            max_reexport_depth: 0,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
