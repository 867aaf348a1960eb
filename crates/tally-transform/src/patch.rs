//! Incremental updates to an already built graph.

use serde::{Deserialize, Serialize};
use tally_graph::BuildGraph;

/// Late data for a built graph, keyed by external identifiers and asset paths.
///
/// Bundlers with a native statistics path report render ids, module sources
/// and asset contents after the main document. Unknown keys are ignored and
/// applying the same patch twice changes nothing the second time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphPatch {
    /// `(identifier, render id)` pairs.
    #[serde(default)]
    pub module_ids: Vec<(String, String)>,
    /// `(identifier, original source)` pairs.
    #[serde(default)]
    pub sources: Vec<(String, String)>,
    /// `(asset path, content)` pairs.
    #[serde(default)]
    pub asset_contents: Vec<(String, String)>,
}

impl GraphPatch {
    pub fn is_empty(&self) -> bool {
        self.module_ids.is_empty() && self.sources.is_empty() && self.asset_contents.is_empty()
    }

    /// Apply the patch and return how many fields changed.
    pub fn apply(&self, graph: &mut BuildGraph) -> usize {
        let mut changed = 0;
        let mg = &mut graph.module_graph;

        for (identifier, render_id) in &self.module_ids {
            match mg.module_id_by_identifier(identifier) {
                Some(id) => changed += usize::from(mg.set_render_id(id, render_id.as_str())),
                None => tracing::debug!(%identifier, "patch references unknown module"),
            }
        }

        for (identifier, source) in &self.sources {
            let Some(module) = mg
                .module_id_by_identifier(identifier)
                .and_then(|id| mg.module_mut(id))
            else {
                tracing::debug!(%identifier, "patch references unknown module");
                continue;
            };
            if module.source().source != *source {
                module.set_source(source.as_str());
                module.fill_source_size(source.len() as u64);
                changed += 1;
            }
        }

        for (path, content) in &self.asset_contents {
            let Some(asset) = graph
                .chunk_graph
                .asset_id_by_path(path)
                .and_then(|id| graph.chunk_graph.asset_mut(id))
            else {
                tracing::debug!(%path, "patch references unknown asset");
                continue;
            };
            if asset.content.as_deref() != Some(content.as_str()) {
                asset.content = Some(content.clone());
                asset.gzip_size = None;
                if asset.size == 0 {
                    asset.size = content.len() as u64;
                }
                changed += 1;
            }
        }

        tracing::debug!(changed, "graph patch applied");
        changed
    }
}
