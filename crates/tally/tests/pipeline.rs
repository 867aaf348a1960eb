//! End-to-end runs of the analysis pipeline.

use std::sync::Arc;

use tally::{
    Analyzer, AnalyzerConfig, AssetStatus, BuildGraph, CodeLevel, Direction, Error,
    InMemoryProvider,
};
use tally_graph::test_utils::MemoryRuntime;

const STATS: &str = r#"{
    "context": "/app",
    "modules": [
        {"identifier": "/app/a.js", "id": "a", "name": "./a.js", "size": 68, "chunks": ["main"], "depth": 0},
        {"identifier": "/app/node_modules/lodash/index.js", "id": 1, "name": "./node_modules/lodash/index.js", "size": 40, "chunks": ["main"],
         "reasons": [{"moduleIdentifier": "/app/a.js", "type": "harmony import specifier", "userRequest": "lodash"}]},
        {"identifier": "/app/node_modules/legacy/node_modules/lodash/index.js", "id": 2, "name": "./node_modules/legacy/node_modules/lodash/index.js", "size": 30, "chunks": ["main"]}
    ],
    "chunks": [{"id": "main", "names": ["main"], "initial": true, "entry": true, "files": ["bundle.js"]}],
    "assets": [{"name": "bundle.js", "size": 18, "chunks": ["main"], "content": "export const a=1;\n"}],
    "entrypoints": {"main": {"chunks": ["main"], "assets": [{"name": "bundle.js"}]}}
}"#;

const MAP: &str = r#"{"version":3,"sources":["a.js"],"names":[],"mappings":"AAAA"}"#;

fn runtime() -> Arc<MemoryRuntime> {
    Arc::new(
        MemoryRuntime::new()
            .with_file("/app/package.json", r#"{"name":"app","version":"1.0.0"}"#)
            .with_file(
                "/app/node_modules/lodash/package.json",
                r#"{"name":"lodash","version":"4.17.21"}"#,
            )
            .with_file(
                "/app/node_modules/legacy/node_modules/lodash/package.json",
                r#"{"name":"lodash","version":"3.10.1"}"#,
            ),
    )
}

fn analyzer(config: AnalyzerConfig) -> Analyzer {
    Analyzer::new(config)
        .runtime(runtime())
        .source_maps(Arc::new(InMemoryProvider::new().with_map("bundle.js", MAP)))
}

fn config() -> AnalyzerConfig {
    AnalyzerConfig {
        root: "/app".into(),
        ..AnalyzerConfig::default()
    }
}

#[tokio::test]
async fn single_mapping_attributes_whole_asset() {
    let analysis = analyzer(config()).analyze_str(STATS).await.unwrap();

    let module = analysis.graph.module_graph.module_by_render_id("a").unwrap();
    assert_eq!(module.size.source_size, 68);
    assert_eq!(module.size.parsed_size, 18);
    assert_eq!(module.source().parsed, "export const a=1;\n");
    assert!(module.size.gzip_size.is_some());
    assert_eq!(analysis.attribution.assets_mapped, 1);
    assert_eq!(analysis.transform.modules_added, 3);
}

#[tokio::test]
async fn packages_resolved_and_duplicates_reported() {
    let analysis = analyzer(config()).analyze_str(STATS).await.unwrap();

    let statistics = analysis.statistics();
    assert_eq!(statistics.packages, 3);
    assert_eq!(statistics.package_dependencies, 1);

    let duplicates = analysis.duplicate_packages();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].name, "lodash");
    assert_eq!(duplicates[0].versions.len(), 2);
    // every module sits in the single "main" chunk
    assert!(analysis.graph.package_graph.packages().all(|p| p.duplicates.is_empty()));
}

const SPLIT: &str = r#"{
    "context": "/app",
    "modules": [
        {"identifier": "/app/node_modules/lodash/map.js", "id": 1, "name": "./node_modules/lodash/map.js", "size": 10, "chunks": ["main"]},
        {"identifier": "/app/node_modules/lodash/get.js", "id": 2, "name": "./node_modules/lodash/get.js", "size": 12, "chunks": ["vendor"]}
    ],
    "chunks": [
        {"id": "main", "names": ["main"], "initial": true, "files": ["main.js"]},
        {"id": "vendor", "names": ["vendor"], "files": ["vendor.js"]}
    ],
    "assets": []
}"#;

#[tokio::test]
async fn package_split_across_chunks_is_flagged_once() {
    let analysis = analyzer(config()).analyze_str(SPLIT).await.unwrap();

    let lodash = analysis
        .graph
        .package_graph
        .packages()
        .find(|package| package.name == "lodash")
        .unwrap();
    assert_eq!(lodash.duplicates.len(), 1);
    assert_eq!(lodash.duplicates[0].chunks, vec!["main", "vendor"]);
    assert_eq!(lodash.duplicates[0].modules.len(), 2);
    assert!(analysis.duplicate_packages().is_empty());

    let restored = BuildGraph::from_json(&analysis.to_json().unwrap()).unwrap();
    let restored_lodash = restored
        .package_graph
        .packages()
        .find(|package| package.name == "lodash")
        .unwrap();
    assert_eq!(restored_lodash.duplicates, lodash.duplicates);
}

#[tokio::test]
async fn serialized_graph_round_trips() {
    let mut config = config();
    config.code_level = CodeLevel::NoSourceAndAssets;
    let analysis = analyzer(config).analyze_str(STATS).await.unwrap();

    let json = analysis.to_json().unwrap();
    let restored = BuildGraph::from_json(&json).unwrap();
    assert_eq!(restored.statistics(), analysis.statistics());
    assert!(restored.chunk_graph.assets().all(|asset| asset.content.is_none()));

    let bytes = analysis.to_bytes().unwrap();
    let restored = BuildGraph::from_bytes(&bytes).unwrap();
    assert_eq!(restored.to_data(CodeLevel::NoSourceAndAssets), analysis.to_data());
}

#[tokio::test]
async fn diff_between_analyses() {
    let mut config = config();
    config.output_filename = Some("[name].[contenthash:8].js".to_string());
    let analyzer = analyzer(config);
    let baseline = analyzer.analyze_str(STATS).await.unwrap();
    let current = analyzer
        .analyze_str(&STATS.replace(r#""size": 18"#, r#""size": 27"#))
        .await
        .unwrap();

    let same = analyzer.diff(&baseline.graph, &baseline.graph).unwrap();
    assert!(same.categories.iter().all(|c| c.direction == Direction::Equal && c.percent == 0.0));

    let summary = analyzer.diff_data(&baseline.to_data(), &current.to_data()).unwrap();
    let total = summary.total().unwrap();
    assert_eq!(total.direction, Direction::Up);
    assert_eq!(total.percent, 50.0);
    assert_eq!(summary.asset("bundle.js").unwrap().status, AssetStatus::Changed);
}

#[tokio::test]
async fn invalid_config_is_rejected() {
    let mut config = config();
    config.max_reexport_depth = 0;
    let err = analyzer(config).analyze_str(STATS).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn missing_document_is_an_error() {
    let err = analyzer(config()).analyze_str("  ").await.unwrap_err();
    assert!(matches!(err, Error::Transform(_)));
}

#[tokio::test]
async fn maps_are_read_from_the_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("dist")).unwrap();
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("package.json"), r#"{"name":"app","version":"0.1.0"}"#).unwrap();
    std::fs::write(
        root.join("dist/main.js.map"),
        r#"{"version":3,"sources":["../src/a.js"],"names":[],"mappings":"AAAA"}"#,
    )
    .unwrap();

    let stats = serde_json::json!({
        "outputPath": root.join("dist"),
        "modules": [{"identifier": "a", "id": "a", "name": "./src/a.js", "size": 20, "chunks": [0]}],
        "chunks": [{"id": 0, "names": ["main"], "initial": true, "files": ["main.js"]}],
        "assets": [{"name": "main.js", "size": 11, "chunks": [0], "content": "var a = 1;\n"}]
    });
    let config = AnalyzerConfig {
        root: root.to_path_buf(),
        ..AnalyzerConfig::default()
    };

    let analysis = Analyzer::new(config)
        .analyze_str(&stats.to_string())
        .await
        .unwrap();

    assert_eq!(analysis.attribution.assets_mapped, 1);
    let module = analysis.graph.module_graph.module_by_render_id("a").unwrap();
    assert_eq!(module.size.parsed_size, 11);
    assert_eq!(analysis.statistics().packages, 1);
}
