//! Serde model of a bundler statistics document.
//!
//! Every field is optional: collectors differ in what they emit and the
//! transform treats anything missing as "not reported".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Module and chunk ids are numbers in production builds and strings in
/// development builds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatsId {
    Number(u64),
    Text(String),
}

impl fmt::Display for StatsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for StatsId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u64> for StatsId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

/// Root statistics document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsCompilation {
    #[serde(default)]
    pub modules: Vec<StatsModule>,
    #[serde(default)]
    pub chunks: Vec<StatsChunk>,
    #[serde(default)]
    pub assets: Vec<StatsAsset>,
    #[serde(default)]
    pub entrypoints: BTreeMap<String, StatsEntrypoint>,
    /// Build context directory, when the collector reports it.
    pub context: Option<String>,
    pub output_path: Option<String>,
    pub hash: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsModule {
    pub identifier: Option<String>,
    pub id: Option<StatsId>,
    pub name: Option<String>,
    pub name_for_condition: Option<String>,
    pub module_type: Option<String>,
    #[serde(default)]
    pub size: u64,
    pub layer: Option<String>,
    #[serde(default)]
    pub issuer_path: Vec<StatsIssuer>,
    #[serde(default)]
    pub reasons: Vec<StatsReason>,
    /// Scope-hoisted members of a concatenated module.
    #[serde(default)]
    pub modules: Vec<StatsModule>,
    #[serde(default)]
    pub optimization_bailout: Vec<String>,
    #[serde(default)]
    pub chunks: Vec<StatsId>,
    pub provided_exports: Option<Vec<String>>,
    pub used_exports: Option<UsedExports>,
    #[serde(default)]
    pub orphan: bool,
    pub depth: Option<u32>,
    /// Module code after loaders ran.
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsIssuer {
    pub identifier: Option<String>,
    pub name: Option<String>,
    pub id: Option<StatsId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReason {
    pub module_identifier: Option<String>,
    pub module_id: Option<StatsId>,
    pub module_name: Option<String>,
    pub user_request: Option<String>,
    /// Location string such as `"3:0-27"`.
    pub loc: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// `usedExports` is `true`/`false` when usage is all-or-nothing, otherwise the
/// list of used names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UsedExports {
    All(bool),
    Names(Vec<String>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsChunk {
    pub id: Option<StatsId>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub initial: bool,
    #[serde(default)]
    pub entry: bool,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub auxiliary_files: Vec<String>,
    /// Member modules, possibly repeating top-level entries.
    #[serde(default)]
    pub modules: Vec<StatsModule>,
    #[serde(default)]
    pub parents: Vec<StatsId>,
    #[serde(default)]
    pub children: Vec<StatsId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsAsset {
    /// Empty when the collector omitted it; such assets are skipped.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub chunks: Vec<StatsId>,
    /// Grouping placeholders carry a type such as `"assets by status"`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub content: Option<String>,
}

impl StatsAsset {
    pub fn is_placeholder(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.starts_with("assets by") || kind.starts_with("hidden assets"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsEntrypoint {
    pub name: Option<String>,
    #[serde(default)]
    pub chunks: Vec<StatsId>,
    #[serde(default)]
    pub assets: Vec<StatsEntrypointAsset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatsEntrypointAsset {
    Named { name: String },
    Path(String),
}

impl StatsEntrypointAsset {
    pub fn name(&self) -> &str {
        match self {
            Self::Named { name } => name,
            Self::Path(path) => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_accept_numbers_and_strings() {
        let chunk: StatsChunk = serde_json::from_str(r#"{"id": 179, "parents": ["main"]}"#).unwrap();
        assert_eq!(chunk.id.unwrap().to_string(), "179");
        assert_eq!(chunk.parents[0].to_string(), "main");
    }

    #[test]
    fn test_used_exports_shapes() {
        let m: StatsModule = serde_json::from_str(r#"{"usedExports": true}"#).unwrap();
        assert_eq!(m.used_exports, Some(UsedExports::All(true)));
        let m: StatsModule = serde_json::from_str(r#"{"usedExports": ["a", "b"]}"#).unwrap();
        assert_eq!(
            m.used_exports,
            Some(UsedExports::Names(vec!["a".into(), "b".into()]))
        );
        let m: StatsModule = serde_json::from_str(r#"{"usedExports": null}"#).unwrap();
        assert_eq!(m.used_exports, None);
    }

    #[test]
    fn test_placeholder_assets() {
        let asset: StatsAsset =
            serde_json::from_str(r#"{"name": "x", "type": "assets by status"}"#).unwrap();
        assert!(asset.is_placeholder());
        let asset: StatsAsset = serde_json::from_str(r#"{"name": "main.js", "type": "asset"}"#).unwrap();
        assert!(!asset.is_placeholder());
    }

    #[test]
    fn test_entrypoint_asset_shapes() {
        let ep: StatsEntrypoint =
            serde_json::from_str(r#"{"assets": ["main.js", {"name": "main.css", "size": 3}]}"#)
                .unwrap();
        let names: Vec<_> = ep.assets.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["main.js", "main.css"]);
    }
}
