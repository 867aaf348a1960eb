//! Source-map `sources` entries to module file paths.
//!
//! Entries come in several shapes:
//!
//! - loader chains: `babel-loader!./src/a.js?x` (last file-like segment wins)
//! - `file:///abs/src/a.js`
//! - namespaced virtual paths: `webpack://<namespace>/./src/a.js`
//! - plain relative paths, resolved against `sourceRoot`, the map's directory
//!   or the build root, in that order

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

/// Where the map that lists a source lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapContext {
    /// The map's declared `sourceRoot`.
    pub source_root: Option<String>,
    /// Directory containing the map file.
    pub map_dir: Option<PathBuf>,
}

/// Stateless resolution rules for one build.
#[derive(Debug, Clone)]
pub struct SourcePathResolver {
    root: PathBuf,
    namespace: Option<String>,
}

impl SourcePathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            namespace: None,
        }
    }

    /// Namespace expected after `webpack://`. Without one, any first path
    /// component after the scheme is treated as the build's namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = (!namespace.is_empty()).then_some(namespace);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve one `sources` entry. `None` means the entry is not a file
    /// (bundler bootstrap, runtime helpers, builtin loaders).
    pub fn resolve(&self, source: &str, context: &MapContext) -> Option<PathBuf> {
        let source = source.trim();
        if source.is_empty() {
            return None;
        }
        if let Some(rest) = source.strip_prefix("file://") {
            let body = strip_query(last_file_segment(rest)?);
            return self.resolve_plain(body, context);
        }
        if let Some((_, rest)) = split_scheme(source) {
            return self.resolve_namespaced(rest, context);
        }
        let body = strip_query(last_file_segment(source)?);
        self.resolve_plain(body, context)
    }

    fn resolve_namespaced(&self, rest: &str, context: &MapContext) -> Option<PathBuf> {
        let in_namespace = match &self.namespace {
            Some(namespace) => rest
                .strip_prefix(namespace.as_str())
                .and_then(|r| r.strip_prefix('/')),
            None => Some(rest.split_once('/').map_or("", |(_, path)| path)),
        };
        match in_namespace {
            Some(path) => {
                let body = strip_query(last_file_segment(path)?);
                if is_bundler_internal(body) {
                    return None;
                }
                let body = body.trim_start_matches('/');
                if body.is_empty() {
                    return None;
                }
                Some(path_clean::clean(self.root.join(body)))
            }
            None => {
                let path = rest.split_once('/').map_or(rest, |(_, path)| path);
                let body = strip_query(last_file_segment(path)?);
                if is_bundler_internal(body) {
                    return None;
                }
                let base = context.map_dir.as_deref().unwrap_or(&self.root);
                Some(path_clean::clean(base.join(body.trim_start_matches('/'))))
            }
        }
    }

    fn resolve_plain(&self, body: &str, context: &MapContext) -> Option<PathBuf> {
        if body.is_empty() {
            return None;
        }
        let path = Path::new(body);
        if path.is_absolute() {
            return Some(path_clean::clean(path));
        }
        let base_dir = context.map_dir.as_deref().unwrap_or(&self.root);
        let base = match context
            .source_root
            .as_deref()
            .filter(|root| !root.is_empty() && !root.contains("://"))
        {
            Some(source_root) => base_dir.join(source_root),
            None => base_dir.to_path_buf(),
        };
        Some(path_clean::clean(base.join(path)))
    }
}

/// Per-map cache in front of a [`SourcePathResolver`].
///
/// Maps list thousands of mappings over a few hundred sources, so each
/// distinct entry is resolved once.
#[derive(Debug)]
pub struct ResolvedPaths<'a> {
    resolver: &'a SourcePathResolver,
    context: MapContext,
    cache: FxHashMap<String, Option<PathBuf>>,
}

impl<'a> ResolvedPaths<'a> {
    pub fn new(resolver: &'a SourcePathResolver, context: MapContext) -> Self {
        Self {
            resolver,
            context,
            cache: FxHashMap::default(),
        }
    }

    pub fn resolve(&mut self, source: &str) -> Option<&Path> {
        if !self.cache.contains_key(source) {
            let resolved = self.resolver.resolve(source, &self.context);
            self.cache.insert(source.to_string(), resolved);
        }
        self.cache.get(source).and_then(|path| path.as_deref())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

fn split_scheme(source: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = source.split_once("://")?;
    let valid = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some((scheme, rest))
}

/// The last segment of a loader chain that names a file.
fn last_file_segment(source: &str) -> Option<&str> {
    if !source.contains(['!', '|']) {
        return (!source.is_empty()).then_some(source);
    }
    source
        .split(['!', '|'])
        .rev()
        .map(str::trim)
        .find(|segment| looks_like_file(segment))
}

fn looks_like_file(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('\0')
        && !segment.starts_with("builtin:")
        && segment.contains(['/', '\\', '.'])
}

fn strip_query(source: &str) -> &str {
    source.split_once('?').map_or(source, |(head, _)| head)
}

fn is_bundler_internal(body: &str) -> bool {
    let body = body.trim_start_matches('/');
    body.starts_with("webpack/") || body.starts_with("(webpack)")
}
