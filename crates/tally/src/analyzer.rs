//! The analysis pipeline.
//!
//! Phases run in order on one graph: transform, package graph, source
//! attribution. Diffs compare two finished graphs.

use std::path::PathBuf;
use std::sync::Arc;

use tally_config::AnalyzerConfig;
use tally_diff::{DefaultNormalizer, DiffOptions, DiffSummary};
use tally_graph::{BuildGraph, BuildGraphData, PackageGraphBuilder, Runtime};
use tally_sourcemap::{AttributionOptions, OutputDirProvider, SourceMapProvider, attribute};
use tally_transform::{StatsCompilation, parse_stats, transform};
use tracing::Instrument;

use crate::analysis::Analysis;
use crate::Result;

/// Runs the pipeline with one configuration.
///
/// ```rust,no_run
/// use tally::{Analyzer, AnalyzerConfig};
///
/// # async fn example() -> tally::Result<()> {
/// let stats = std::fs::read_to_string("stats.json").unwrap();
/// let analysis = Analyzer::new(AnalyzerConfig::load(None)?)
///     .output_dir("dist")
///     .analyze_str(&stats)
///     .await?;
///
/// println!("{} modules", analysis.statistics().modules);
/// # Ok(())
/// # }
/// ```
pub struct Analyzer {
    config: AnalyzerConfig,
    runtime: Option<Arc<dyn Runtime>>,
    source_maps: Option<Arc<dyn SourceMapProvider>>,
    output_dir: Option<PathBuf>,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            runtime: None,
            source_maps: None,
            output_dir: None,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// File access for manifests and source maps. Defaults to the native
    /// filesystem where one exists.
    pub fn runtime(mut self, runtime: Arc<dyn Runtime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Where source maps come from. Defaults to `<asset>.map` files in the
    /// output directory.
    pub fn source_maps(mut self, provider: Arc<dyn SourceMapProvider>) -> Self {
        self.source_maps = Some(provider);
        self
    }

    /// Directory holding the emitted assets. Defaults to the document's
    /// `outputPath`, then the build root.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Parse a statistics document and analyze it.
    pub async fn analyze_str(&self, json: &str) -> Result<Analysis> {
        let stats = parse_stats(json)?;
        self.analyze(&stats).await
    }

    pub async fn analyze(&self, stats: &StatsCompilation) -> Result<Analysis> {
        self.config.validate()?;
        let runtime = self.get_runtime()?;

        let mut graph = BuildGraph::new(&self.config.root);
        graph
            .module_graph
            .set_max_reexport_depth(self.config.max_reexport_depth);

        let transform = transform(stats, &mut graph, &self.config.transform_options());

        let packages = PackageGraphBuilder::new(runtime.as_ref(), graph.root.clone())
            .build(&graph.module_graph, &graph.chunk_graph)
            .instrument(tracing::info_span!("package_graph"))
            .await;
        graph.package_graph = packages;

        let options = AttributionOptions {
            namespace: self.config.source_namespace.clone(),
            parallel: self.config.parallel_attribution,
        };
        let attribution = match &self.source_maps {
            Some(provider) => attribute(&mut graph, provider.as_ref(), &options).await,
            None => {
                let dir = self
                    .output_dir
                    .clone()
                    .or_else(|| stats.output_path.as_deref().map(PathBuf::from))
                    .unwrap_or_else(|| graph.root.clone());
                let provider = OutputDirProvider::new(Arc::clone(&runtime), dir);
                attribute(&mut graph, &provider, &options).await
            }
        };

        let analysis = Analysis {
            graph,
            transform,
            attribution,
            code_level: self.config.code_level,
        };
        let statistics = analysis.statistics();
        tracing::info!(
            modules = statistics.modules,
            chunks = statistics.chunks,
            assets = statistics.assets,
            packages = statistics.packages,
            "analysis finished"
        );
        Ok(analysis)
    }

    /// Compare two live graphs with the configured filters and template.
    pub fn diff(&self, baseline: &BuildGraph, current: &BuildGraph) -> Result<DiffSummary> {
        let normalizer = self.normalizer()?;
        Ok(tally_diff::diff(baseline, current, &self.diff_options(), &normalizer))
    }

    /// Compare two serialized graphs.
    pub fn diff_data(
        &self,
        baseline: &BuildGraphData,
        current: &BuildGraphData,
    ) -> Result<DiffSummary> {
        let normalizer = self.normalizer()?;
        Ok(tally_diff::diff_data(
            baseline,
            current,
            &self.diff_options(),
            &normalizer,
        ))
    }

    fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            initial_only: self.config.initial_only,
            ..DiffOptions::default()
        }
    }

    fn normalizer(&self) -> Result<DefaultNormalizer> {
        Ok(match &self.config.output_filename {
            Some(template) => DefaultNormalizer::with_template(template)?,
            None => DefaultNormalizer::new(),
        })
    }

    fn get_runtime(&self) -> Result<Arc<dyn Runtime>> {
        if let Some(runtime) = &self.runtime {
            return Ok(Arc::clone(runtime));
        }
        #[cfg(not(target_family = "wasm"))]
        {
            Ok(Arc::new(tally_graph::NativeRuntime::new()))
        }
        #[cfg(target_family = "wasm")]
        {
            Err(crate::Error::MissingRuntime)
        }
    }
}

/// Analyze a statistics document with `config` and the native filesystem.
pub async fn analyze(json: &str, config: AnalyzerConfig) -> Result<Analysis> {
    Analyzer::new(config).analyze_str(json).await
}
