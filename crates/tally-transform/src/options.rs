use std::path::PathBuf;

/// Bailout message the bundler emits for every module it declined to hoist
/// because of a neighbour; expected and not actionable.
pub const DEFAULT_IGNORED_BAILOUT: &str = "ModuleConcatenation bailout: Cannot concat with";

/// Settings for one transform run.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Build context. Falls back to the document's `context`, then `.`.
    pub root: Option<PathBuf>,
    /// Identifier prefixes of bundler runtime modules, which are skipped.
    pub runtime_prefixes: Vec<String>,
    /// Bailout substrings dropped as noise.
    pub ignored_bailouts: Vec<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            root: None,
            runtime_prefixes: vec!["webpack/runtime/".to_string(), "rspack/runtime/".to_string()],
            ignored_bailouts: vec![DEFAULT_IGNORED_BAILOUT.to_string()],
        }
    }
}

impl TransformOptions {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn is_runtime_identifier(&self, identifier: &str) -> bool {
        self.runtime_prefixes
            .iter()
            .any(|prefix| identifier.starts_with(prefix.as_str()))
    }

    pub fn is_ignored_bailout(&self, reason: &str) -> bool {
        self.ignored_bailouts
            .iter()
            .any(|pattern| reason.contains(pattern.as_str()))
    }
}
