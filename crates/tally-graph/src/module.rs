use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::ids::{ChunkId, DependencyId, ModuleId};

/// Whether a module is a plain file or a scope-hoisted container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    #[default]
    Normal,
    /// Several files merged into one scope by the bundler.
    Concatenation,
}

/// Size figures in bytes. Zero means "not known yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSize {
    pub source_size: u64,
    pub transformed_size: u64,
    pub parsed_size: u64,
    /// Gzip size of the parsed (bundled) code, when it could be computed.
    #[serde(default)]
    pub gzip_size: Option<u64>,
}

/// The three texts a module can carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSource {
    /// Original source as written by the user.
    #[serde(default)]
    pub source: String,
    /// Source after loaders ran.
    #[serde(default)]
    pub transformed: String,
    /// Code as it appears inside the emitted bundle.
    #[serde(default)]
    pub parsed: String,
}

/// Extra flags the bundler reports about a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMeta {
    #[serde(default)]
    pub is_orphan: bool,
    #[serde(default)]
    pub depth: Option<u32>,
}

/// Package metadata attached to a module ahead of package resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageData {
    pub name: String,
    pub version: String,
    pub root: PathBuf,
}

/// One bundler-resolved file, or a concatenation of several.
///
/// Relationship fields hold ids into the owning [`ModuleGraph`](crate::ModuleGraph).
/// The original source and source-map flag are private because they feed the
/// memoized [`Module::is_prefer_source`] and must invalidate it when changed.
#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    /// Id the bundler prints into the emitted code (`__webpack_modules__` keys).
    pub render_id: Option<String>,
    /// Stable external identifier assigned by the bundler.
    pub identifier: String,
    pub path: PathBuf,
    pub is_entry: bool,
    pub kind: ModuleKind,
    pub layer: Option<String>,
    pub size: ModuleSize,
    pub bailout_reasons: Vec<String>,
    /// Issuer identifiers as reported by the bundler, outermost first.
    pub issuer_identifiers: Vec<String>,
    /// Issuer path resolved to graph ids.
    pub issuer_path: Vec<ModuleId>,
    /// Outgoing edges owned by this module.
    pub dependencies: Vec<DependencyId>,
    /// Modules that depend on this one.
    pub imported: Vec<ModuleId>,
    pub chunks: Vec<ChunkId>,
    /// Members, for a concatenation module.
    pub modules: Vec<ModuleId>,
    /// The concatenation this module was hoisted into.
    pub root_module: Option<ModuleId>,
    /// Every concatenation that lists this module as a member.
    pub concatenation_modules: Vec<ModuleId>,
    pub meta: ModuleMeta,
    pub package_data: Option<PackageData>,
    source: ModuleSource,
    has_source_map: bool,
    prefer_source: OnceCell<bool>,
}

impl Module {
    /// Create a new module builder with sensible defaults.
    pub fn builder(
        id: ModuleId,
        identifier: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> ModuleBuilder {
        ModuleBuilder {
            module: Self {
                id,
                render_id: None,
                identifier: identifier.into(),
                path: path.into(),
                is_entry: false,
                kind: ModuleKind::Normal,
                layer: None,
                size: ModuleSize::default(),
                bailout_reasons: Vec::new(),
                issuer_identifiers: Vec::new(),
                issuer_path: Vec::new(),
                dependencies: Vec::new(),
                imported: Vec::new(),
                chunks: Vec::new(),
                modules: Vec::new(),
                root_module: None,
                concatenation_modules: Vec::new(),
                meta: ModuleMeta::default(),
                package_data: None,
                source: ModuleSource::default(),
                has_source_map: false,
                prefer_source: OnceCell::new(),
            },
        }
    }

    pub fn is_concatenation(&self) -> bool {
        self.kind == ModuleKind::Concatenation
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &ModuleSource {
        &self.source
    }

    pub fn has_source_map(&self) -> bool {
        self.has_source_map
    }

    /// True when the original source is the authoritative text to display.
    ///
    /// Computed on first read and cached until the original source or the
    /// source-map flag changes.
    pub fn is_prefer_source(&self) -> bool {
        *self
            .prefer_source
            .get_or_init(|| !self.source.source.is_empty() && self.has_source_map)
    }

    /// Replace the original source text.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source.source = source.into();
        self.prefer_source = OnceCell::new();
    }

    pub fn set_transformed_source(&mut self, transformed: impl Into<String>) {
        self.source.transformed = transformed.into();
    }

    pub fn set_has_source_map(&mut self, has_source_map: bool) {
        if self.has_source_map != has_source_map {
            self.has_source_map = has_source_map;
            self.prefer_source = OnceCell::new();
        }
    }

    /// Fill the parsed code and size if they are still unset.
    ///
    /// Returns `false` when the module already carries a parsed size, which is
    /// what keeps repeated attribution passes from double counting.
    pub fn fill_parsed(&mut self, parsed: String, gzip_size: Option<u64>) -> bool {
        if self.size.parsed_size > 0 {
            return false;
        }
        self.size.parsed_size = parsed.len() as u64;
        self.size.gzip_size = gzip_size;
        self.source.parsed = parsed;
        true
    }

    /// Set the source size if it is still unknown.
    pub fn fill_source_size(&mut self, size: u64) -> bool {
        if self.size.source_size > 0 || size == 0 {
            return false;
        }
        self.size.source_size = size;
        true
    }

    pub fn fill_transformed_size(&mut self, size: u64) -> bool {
        if self.size.transformed_size > 0 || size == 0 {
            return false;
        }
        self.size.transformed_size = size;
        true
    }

    /// Add a chunk membership, ignoring duplicates.
    pub fn add_chunk(&mut self, chunk: ChunkId) -> bool {
        push_unique(&mut self.chunks, chunk)
    }

    pub fn add_bailout_reason(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        if !self.bailout_reasons.contains(&reason) {
            self.bailout_reasons.push(reason);
        }
    }

    /// Restore private state verbatim (used by deserialization).
    pub(crate) fn restore_source(
        &mut self,
        source: ModuleSource,
        has_source_map: bool,
        prefer_source: bool,
    ) {
        self.source = source;
        self.has_source_map = has_source_map;
        self.prefer_source = OnceCell::with_value(prefer_source);
    }
}

/// Builder for `Module` to avoid long argument lists in constructors.
pub struct ModuleBuilder {
    module: Module,
}

impl ModuleBuilder {
    pub fn kind(mut self, kind: ModuleKind) -> Self {
        self.module.kind = kind;
        self
    }

    pub fn entry(mut self, is_entry: bool) -> Self {
        self.module.is_entry = is_entry;
        self
    }

    pub fn layer(mut self, layer: Option<String>) -> Self {
        self.module.layer = layer;
        self
    }

    pub fn render_id(mut self, render_id: Option<String>) -> Self {
        self.module.render_id = render_id;
        self
    }

    pub fn source_size(mut self, size: u64) -> Self {
        self.module.size.source_size = size;
        self
    }

    pub fn transformed_size(mut self, size: u64) -> Self {
        self.module.size.transformed_size = size;
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.module.source.source = source.into();
        self
    }

    pub fn bailout_reasons(mut self, reasons: Vec<String>) -> Self {
        self.module.bailout_reasons = reasons;
        self
    }

    pub fn issuer_identifiers(mut self, issuers: Vec<String>) -> Self {
        self.module.issuer_identifiers = issuers;
        self
    }

    pub fn meta(mut self, meta: ModuleMeta) -> Self {
        self.module.meta = meta;
        self
    }

    pub fn package_data(mut self, package_data: Option<PackageData>) -> Self {
        self.module.package_data = package_data;
        self
    }

    pub fn build(self) -> Module {
        self.module
    }
}

pub(crate) fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if items.contains(&item) {
        false
    } else {
        items.push(item);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> Module {
        Module::builder(ModuleId::new(1), "./a.js", "/app/a.js").build()
    }

    #[test]
    fn test_prefer_source_requires_source_and_map() {
        let mut m = module();
        assert!(!m.is_prefer_source());

        m.set_source("export const a = 1;");
        assert!(!m.is_prefer_source());

        m.set_has_source_map(true);
        assert!(m.is_prefer_source());
    }

    #[test]
    fn test_prefer_source_invalidated_on_source_change() {
        let mut m = module();
        m.set_has_source_map(true);
        m.set_source("x");
        assert!(m.is_prefer_source());

        m.set_source("");
        assert!(!m.is_prefer_source());
    }

    #[test]
    fn test_fill_parsed_only_once() {
        let mut m = module();
        assert!(m.fill_parsed("abc".to_string(), Some(23)));
        assert!(!m.fill_parsed("abcdef".to_string(), None));
        assert_eq!(m.size.parsed_size, 3);
        assert_eq!(m.source().parsed, "abc");
        assert_eq!(m.size.gzip_size, Some(23));
    }

    #[test]
    fn test_fill_size_keeps_first_figure() {
        let mut m = module();
        assert!(!m.fill_source_size(0));
        assert!(m.fill_source_size(68));
        assert!(!m.fill_source_size(90));
        assert_eq!(m.size.source_size, 68);
    }

    #[test]
    fn test_add_chunk_dedupes() {
        let mut m = module();
        assert!(m.add_chunk(ChunkId::new(1)));
        assert!(!m.add_chunk(ChunkId::new(1)));
        assert_eq!(m.chunks.len(), 1);
    }
}
