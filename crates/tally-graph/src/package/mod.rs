//! Packages, package edges and the builder that derives them from modules.

mod builder;
mod graph;
mod manifest;
mod types;

pub use builder::PackageGraphBuilder;
pub use graph::PackageGraph;
pub use manifest::Manifest;
pub use types::{
    DuplicateModule, DuplicatePackages, Package, PackageDependency, PackageDuplicate,
};
