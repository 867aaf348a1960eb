//! Per-module parsed size and code for a whole build.
//!
//! Each script asset is handled by exactly one strategy: its source map when
//! one is available and usable, otherwise a structural scan of the bundle.
//! Both strategies only fill modules whose parsed size is still unset.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tally_graph::collections::FxIndexMap;
use tally_graph::{AssetId, BuildGraph, ModuleId, gzip_size};

use crate::map::{AssetSlices, parse_map, slice_asset};
use crate::provider::{SourceMapFile, SourceMapProvider};
use crate::resolve::{MapContext, ResolvedPaths, SourcePathResolver};
use crate::scan::scan_bundle;

const SCRIPT_EXTENSIONS: &[&str] = &["js", "mjs", "cjs"];

/// Settings for one attribution run.
#[derive(Debug, Clone)]
pub struct AttributionOptions {
    /// Namespace in `webpack://<namespace>/` source paths.
    pub namespace: Option<String>,
    /// Slice assets on the rayon pool.
    pub parallel: bool,
}

impl Default for AttributionOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            parallel: true,
        }
    }
}

/// Counters describing one attribution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributionReport {
    /// Assets sliced by their source map.
    pub assets_mapped: usize,
    /// Assets handled by the bundle scan.
    pub assets_scanned: usize,
    /// Script assets without captured content.
    pub assets_without_code: usize,
    /// Maps that failed to parse or had no mappings.
    pub invalid_maps: usize,
    pub modules_attributed: usize,
    pub modules_scanned: usize,
    /// Attributed sources that matched no module.
    pub sources_unmatched: usize,
}

/// A script asset and the map fetched for it.
#[derive(Debug, Clone)]
pub struct MapInput {
    pub asset: AssetId,
    pub map: SourceMapFile,
}

/// Fetch maps through `provider` and attribute every script asset.
pub async fn attribute<P: SourceMapProvider + ?Sized>(
    graph: &mut BuildGraph,
    provider: &P,
    options: &AttributionOptions,
) -> AttributionReport {
    let mut report = AttributionReport::default();
    let assets: Vec<(AssetId, String)> = graph
        .chunk_graph
        .assets()
        .filter(|asset| is_script(asset.extension().as_deref()))
        .map(|asset| (asset.id, asset.path.clone()))
        .collect();

    let mut inputs = Vec::new();
    let mut unmapped = Vec::new();
    for (id, path) in assets {
        let Some(content) = graph
            .chunk_graph
            .asset(id)
            .and_then(|asset| asset.content.as_deref())
        else {
            report.assets_without_code += 1;
            continue;
        };
        match provider.source_map(&path, content).await {
            Ok(Some(map)) => inputs.push(MapInput { asset: id, map }),
            Ok(None) => unmapped.push(id),
            Err(err) => {
                tracing::warn!(asset = %path, error = %err, "source map could not be read");
                unmapped.push(id);
            }
        }
    }

    let mapped = attribute_maps(graph, &inputs, options);
    report.assets_mapped = mapped.assets_mapped;
    report.invalid_maps = mapped.invalid_maps;
    report.modules_attributed = mapped.modules_attributed;
    report.sources_unmatched = mapped.sources_unmatched;
    unmapped.extend(mapped.rejected);

    let scanned = scan_assets(graph, &unmapped, &mapped.covered);
    report.assets_scanned = scanned.assets;
    report.modules_scanned = scanned.modules;

    tracing::info!(
        mapped = report.assets_mapped,
        scanned = report.assets_scanned,
        modules = report.modules_attributed + report.modules_scanned,
        "attribution finished"
    );
    report
}

/// Outcome of the map driven strategy.
#[derive(Debug, Default)]
pub struct MappedOutcome {
    pub assets_mapped: usize,
    pub invalid_maps: usize,
    pub modules_attributed: usize,
    pub sources_unmatched: usize,
    /// Modules whose source was attributed by some map, filled or not.
    pub covered: FxHashSet<ModuleId>,
    /// Assets whose map was unusable, for the fallback scan.
    pub rejected: Vec<AssetId>,
}

/// Slice every asset by its map and fill the modules it attributes.
///
/// Assets are sliced independently (in parallel when enabled) and merged in
/// input order. A source attributed by an earlier asset is skipped in later
/// ones, so a module shared between assets is counted once.
pub fn attribute_maps(
    graph: &mut BuildGraph,
    inputs: &[MapInput],
    options: &AttributionOptions,
) -> MappedOutcome {
    let span = tracing::debug_span!("attribution", assets = inputs.len());
    let _guard = span.enter();

    let mut resolver = SourcePathResolver::new(graph.root.clone());
    if let Some(namespace) = &options.namespace {
        resolver = resolver.with_namespace(namespace.as_str());
    }

    let sliced: Vec<(AssetId, Option<AssetSlices>)> = {
        let chunk_graph = &graph.chunk_graph;
        let job = |input: &MapInput| {
            let content = chunk_graph
                .asset(input.asset)
                .and_then(|asset| asset.content.as_deref())
                .unwrap_or_default();
            (input.asset, slice_input(content, input, &resolver))
        };
        if options.parallel {
            inputs.par_iter().map(job).collect()
        } else {
            inputs.iter().map(job).collect()
        }
    };

    let mut outcome = MappedOutcome::default();
    let mut merged: FxIndexMap<PathBuf, String> = FxIndexMap::default();
    let mut contents: FxHashMap<PathBuf, String> = FxHashMap::default();
    for (asset, slices) in sliced {
        let Some(slices) = slices else {
            outcome.invalid_maps += 1;
            outcome.rejected.push(asset);
            continue;
        };
        outcome.assets_mapped += 1;
        for (path, text) in slices.slices {
            if !merged.contains_key(&path) {
                merged.insert(path, text);
            }
        }
        for (path, content) in slices.sources_content {
            contents.entry(path).or_insert(content);
        }
    }

    for (path, text) in merged {
        let ids = graph.module_graph.module_ids_by_path(&path).to_vec();
        if ids.is_empty() {
            outcome.sources_unmatched += 1;
            continue;
        }
        let gzip = gzip_size(text.as_bytes());
        for id in ids {
            let Some(module) = graph.module_graph.module_mut(id) else {
                continue;
            };
            if module.is_concatenation() {
                continue;
            }
            outcome.covered.insert(id);
            if module.fill_parsed(text.clone(), gzip) {
                outcome.modules_attributed += 1;
            }
            module.set_has_source_map(true);
            if module.source().source.is_empty() {
                if let Some(content) = contents.get(&path) {
                    module.set_source(content.as_str());
                    module.fill_source_size(content.len() as u64);
                }
            }
        }
    }
    outcome
}

fn slice_input(
    content: &str,
    input: &MapInput,
    resolver: &SourcePathResolver,
) -> Option<AssetSlices> {
    let map = match parse_map(&input.map.json) {
        Ok(map) => map,
        Err(err) => {
            tracing::warn!(asset = ?input.asset, error = %err, "unusable source map");
            return None;
        }
    };
    let context = MapContext {
        source_root: map.get_source_root().map(str::to_string),
        map_dir: input
            .map
            .path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf),
    };
    let mut paths = ResolvedPaths::new(resolver, context);
    let slices = slice_asset(content, &map, &mut paths);
    tracing::trace!(
        asset = ?input.asset,
        mappings = slices.mappings,
        sources = paths.len(),
        "asset sliced"
    );
    Some(slices)
}

/// Outcome of the fallback scan.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanOutcome {
    pub assets: usize,
    pub modules: usize,
}

/// Fill modules from the bundle text of `assets`, skipping `covered` ones.
pub fn scan_assets(
    graph: &mut BuildGraph,
    assets: &[AssetId],
    covered: &FxHashSet<ModuleId>,
) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    if assets.is_empty() {
        return outcome;
    }
    let span = tracing::debug_span!("bundle_scan", assets = assets.len());
    let _guard = span.enter();

    for asset in assets {
        let found = {
            let Some(code) = graph
                .chunk_graph
                .asset(*asset)
                .and_then(|a| a.content.as_deref())
            else {
                continue;
            };
            let known: FxHashSet<&str> = graph
                .module_graph
                .modules()
                .filter(|m| {
                    !covered.contains(&m.id) && m.size.parsed_size == 0 && !m.is_concatenation()
                })
                .filter_map(|m| m.render_id.as_deref())
                .collect();
            scan_bundle(code, &known)
                .into_iter()
                .map(|(render_id, range)| (render_id, code[range].to_string()))
                .collect::<Vec<_>>()
        };
        outcome.assets += 1;
        for (render_id, code) in found {
            let Some(id) = graph.module_graph.module_id_by_render_id(&render_id) else {
                continue;
            };
            let gzip = gzip_size(code.as_bytes());
            if let Some(module) = graph.module_graph.module_mut(id) {
                if module.fill_parsed(code, gzip) {
                    outcome.modules += 1;
                }
            }
        }
    }
    outcome
}

fn is_script(extension: Option<&str>) -> bool {
    extension.is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext))
}
