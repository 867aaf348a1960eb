//! Tests for map driven attribution and the bundle scan fallback.

use std::path::Path;

use tally_graph::{AssetId, BuildGraph, Module, ModuleId};
use tally_sourcemap::{
    AttributionOptions, InMemoryProvider, MapInput, SourceMapFile, attribute, attribute_maps,
};

fn add_module(graph: &mut BuildGraph, identifier: &str, path: &str, render_id: &str) -> ModuleId {
    let id = graph.module_graph.next_module_id();
    graph.module_graph.add_module(
        Module::builder(id, identifier, path)
            .render_id(Some(render_id.to_string()))
            .build(),
    )
}

fn add_asset(graph: &mut BuildGraph, path: &str, content: &str) -> AssetId {
    let id = graph.chunk_graph.ensure_asset(path, content.len() as u64);
    graph.chunk_graph.asset_mut(id).unwrap().content = Some(content.to_string());
    id
}

fn input(asset: AssetId, json: &str) -> MapInput {
    MapInput {
        asset,
        map: SourceMapFile {
            json: json.to_string(),
            path: Some("/app/dist/bundle.js.map".into()),
        },
    }
}

const SINGLE: &str = r#"{"version":3,"sources":["../a.js"],"names":[],"mappings":"AAAA"}"#;

#[test]
fn single_mapping_attributes_the_whole_line() {
    let mut graph = BuildGraph::new("/app");
    let a = add_module(&mut graph, "a", "/app/a.js", "a");
    let asset = add_asset(&mut graph, "bundle.js", "export const a=1;\n");

    let outcome = attribute_maps(&mut graph, &[input(asset, SINGLE)], &AttributionOptions::default());
    assert_eq!(outcome.modules_attributed, 1);

    let module = graph.module_graph.module(a).unwrap();
    assert_eq!(module.size.parsed_size, 18);
    assert_eq!(module.source().parsed.trim_end(), "export const a=1;");
    assert!(module.size.gzip_size.is_some());
    assert!(module.has_source_map());
}

#[test]
fn attribution_runs_once_per_module() {
    let mut graph = BuildGraph::new("/app");
    let a = add_module(&mut graph, "a", "/app/a.js", "a");
    let asset = add_asset(&mut graph, "bundle.js", "export const a=1;\n");
    let inputs = [input(asset, SINGLE)];

    attribute_maps(&mut graph, &inputs, &AttributionOptions::default());
    let second = attribute_maps(&mut graph, &inputs, &AttributionOptions::default());

    assert_eq!(second.modules_attributed, 0);
    assert_eq!(graph.module_graph.module(a).unwrap().size.parsed_size, 18);
}

#[test]
fn shared_source_is_counted_from_the_first_asset() {
    let mut graph = BuildGraph::new("/app");
    let shared = add_module(&mut graph, "shared", "/app/shared.js", "s");
    let first = add_asset(&mut graph, "a.js", "var s=1;\n");
    let second = add_asset(&mut graph, "b.js", "var s=1;var t=2;\n");
    let map = r#"{"version":3,"sources":["../shared.js"],"names":[],"mappings":"AAAA"}"#;

    let options = AttributionOptions {
        parallel: false,
        ..AttributionOptions::default()
    };
    let outcome = attribute_maps(&mut graph, &[input(first, map), input(second, map)], &options);

    assert_eq!(outcome.assets_mapped, 2);
    assert_eq!(graph.module_graph.module(shared).unwrap().source().parsed, "var s=1;\n");
}

#[test]
fn sources_content_fills_empty_original_source() {
    let mut graph = BuildGraph::new("/app");
    let a = add_module(&mut graph, "a", "/app/a.js", "a");
    let asset = add_asset(&mut graph, "bundle.js", "const a=1;\n");
    let map = r#"{"version":3,"sources":["../a.js"],"sourcesContent":["export const a = 1;\n"],"names":[],"mappings":"AAAA"}"#;

    attribute_maps(&mut graph, &[input(asset, map)], &AttributionOptions::default());

    let module = graph.module_graph.module(a).unwrap();
    assert_eq!(module.source().source, "export const a = 1;\n");
    assert!(module.is_prefer_source());
}

#[test]
fn every_layer_of_a_file_is_filled() {
    let mut graph = BuildGraph::new("/app");
    let client = add_module(&mut graph, "(client)/a", "/app/a.js", "1");
    let server = add_module(&mut graph, "(server)/a", "/app/a.js", "2");
    let asset = add_asset(&mut graph, "bundle.js", "export const a=1;\n");

    attribute_maps(&mut graph, &[input(asset, SINGLE)], &AttributionOptions::default());

    for id in [client, server] {
        assert_eq!(graph.module_graph.module(id).unwrap().size.parsed_size, 18);
    }
}

#[test]
fn unmatched_sources_are_counted() {
    let mut graph = BuildGraph::new("/app");
    let asset = add_asset(&mut graph, "bundle.js", "export const a=1;\n");
    let outcome = attribute_maps(&mut graph, &[input(asset, SINGLE)], &AttributionOptions::default());
    assert_eq!(outcome.sources_unmatched, 1);
    assert!(graph.module_graph.module_ids_by_path(Path::new("/app/a.js")).is_empty());
}

#[tokio::test]
async fn invalid_map_falls_back_to_bundle_scan() {
    let mut graph = BuildGraph::new("/app");
    let a = add_module(&mut graph, "/app/src/a.js", "/app/src/a.js", "./src/a.js");
    add_asset(
        &mut graph,
        "main.js",
        r#"var __webpack_modules__ = {"./src/a.js": (module) => { module.exports = 1; }};"#,
    );
    let provider = InMemoryProvider::new().with_map("main.js", "not json");

    let report = attribute(&mut graph, &provider, &AttributionOptions::default()).await;

    assert_eq!(report.invalid_maps, 1);
    assert_eq!(report.assets_scanned, 1);
    assert_eq!(report.modules_scanned, 1);
    let module = graph.module_graph.module(a).unwrap();
    assert_eq!(module.source().parsed, "(module) => { module.exports = 1; }");
    assert!(!module.has_source_map());
}

#[tokio::test]
async fn provider_maps_and_skips_non_scripts() {
    let mut graph = BuildGraph::new("/app");
    let a = add_module(&mut graph, "a", "/app/a.js", "a");
    add_asset(&mut graph, "bundle.js", "export const a=1;\n");
    add_asset(&mut graph, "style.css", "body{}");
    graph.chunk_graph.ensure_asset("lazy.js", 10);
    let provider = InMemoryProvider::new().with_map("bundle.js", SINGLE.replace("../", ""));

    let report = attribute(&mut graph, &provider, &AttributionOptions::default()).await;

    assert_eq!(report.assets_mapped, 1);
    assert_eq!(report.assets_without_code, 1);
    assert_eq!(report.modules_attributed, 1);
    assert_eq!(graph.module_graph.module(a).unwrap().size.parsed_size, 18);
}
