//! Conversion between live graphs and wire records.

mod data;

pub use data::{BuildGraphData, ModuleData};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::module::{Module, ModuleSource};

/// How much code text survives serialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeLevel {
    /// Original, transformed and parsed code plus asset contents.
    #[default]
    Full,
    /// Everything except original source text.
    NoOriginalSource,
    /// Parsed code only; no original/transformed text and no asset contents.
    NoSourceAndAssets,
    /// No code text at all.
    NoCode,
}

impl CodeLevel {
    pub fn keeps_original_source(self) -> bool {
        self == Self::Full
    }

    pub fn keeps_transformed_source(self) -> bool {
        matches!(self, Self::Full | Self::NoOriginalSource)
    }

    pub fn keeps_parsed_source(self) -> bool {
        self != Self::NoCode
    }

    pub fn keeps_asset_content(self) -> bool {
        matches!(self, Self::Full | Self::NoOriginalSource)
    }
}

impl fmt::Display for CodeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Full => "full",
            Self::NoOriginalSource => "no-original-source",
            Self::NoSourceAndAssets => "no-source-and-assets",
            Self::NoCode => "no-code",
        };
        f.write_str(s)
    }
}

impl FromStr for CodeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "no-original-source" => Ok(Self::NoOriginalSource),
            "no-source-and-assets" => Ok(Self::NoSourceAndAssets),
            "no-code" => Ok(Self::NoCode),
            _ => Err(format!(
                "Invalid code level: {}. Expected: full, no-original-source, no-source-and-assets, no-code",
                s
            )),
        }
    }
}

pub(crate) fn module_to_data(module: &Module, level: CodeLevel) -> ModuleData {
    let source = module.source();
    let source = ModuleSource {
        source: if level.keeps_original_source() {
            source.source.clone()
        } else {
            String::new()
        },
        transformed: if level.keeps_transformed_source() {
            source.transformed.clone()
        } else {
            String::new()
        },
        parsed: if level.keeps_parsed_source() {
            source.parsed.clone()
        } else {
            String::new()
        },
    };
    ModuleData {
        id: module.id,
        render_id: module.render_id.clone(),
        identifier: module.identifier.clone(),
        path: module.path.to_string_lossy().into_owned(),
        is_prefer_source: module.is_prefer_source(),
        has_source_map: module.has_source_map(),
        is_entry: module.is_entry,
        kind: module.kind,
        layer: module.layer.clone(),
        size: module.size.clone(),
        source,
        bailout_reasons: module.bailout_reasons.clone(),
        issuer_identifiers: module.issuer_identifiers.clone(),
        issuer_path: module.issuer_path.clone(),
        dependencies: module.dependencies.clone(),
        imported: module.imported.clone(),
        chunks: module.chunks.clone(),
        modules: module.modules.clone(),
        root_module: module.root_module,
        concatenation_modules: module.concatenation_modules.clone(),
        meta: module.meta.clone(),
        package_data: module.package_data.clone(),
    }
}

pub(crate) fn module_from_data(data: ModuleData) -> Module {
    let mut module = Module::builder(data.id, data.identifier, data.path)
        .kind(data.kind)
        .entry(data.is_entry)
        .layer(data.layer)
        .render_id(data.render_id)
        .bailout_reasons(data.bailout_reasons)
        .issuer_identifiers(data.issuer_identifiers)
        .meta(data.meta)
        .package_data(data.package_data)
        .build();
    module.size = data.size;
    module.issuer_path = data.issuer_path;
    module.dependencies = data.dependencies;
    module.imported = data.imported;
    module.chunks = data.chunks;
    module.modules = data.modules;
    module.root_module = data.root_module;
    module.concatenation_modules = data.concatenation_modules;
    module.restore_source(data.source, data.has_source_map, data.is_prefer_source);
    module
}
