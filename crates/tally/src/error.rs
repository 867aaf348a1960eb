use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that stop an analysis. Problems with individual modules, maps
/// or manifests are logged and counted instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] tally_config::ConfigError),

    #[error(transparent)]
    Transform(#[from] tally_transform::TransformError),

    #[error(transparent)]
    Graph(#[from] tally_graph::Error),

    #[error(transparent)]
    SourceMap(#[from] tally_sourcemap::SourceMapError),

    #[error(transparent)]
    Diff(#[from] tally_diff::DiffError),

    #[error("a runtime is required on this target")]
    MissingRuntime,
}
