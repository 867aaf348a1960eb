use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ids::{DependencyId, ModuleId, PackageDependencyId, PackageId};

/// A package instance, identified by name, version and root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub name: String,
    pub version: String,
    pub root: PathBuf,
    pub modules: Vec<ModuleId>,
    pub dependencies: Vec<PackageDependencyId>,
    /// Packages depending on this one.
    pub imported: Vec<PackageId>,
    pub duplicates: Vec<PackageDuplicate>,
}

impl Package {
    pub fn new(
        id: PackageId,
        name: impl Into<String>,
        version: impl Into<String>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            version: version.into(),
            root: root.into(),
            modules: Vec::new(),
            dependencies: Vec::new(),
            imported: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    pub fn is_duplicated(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

/// A package whose modules were emitted into more than one chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDuplicate {
    /// Every module of the package that sits in one of `chunks`.
    pub modules: Vec<DuplicateModule>,
    /// Chunk names (render id when unnamed), first seen first.
    pub chunks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateModule {
    pub module: ModuleId,
    pub path: PathBuf,
}

/// Package-level projection of a module [`Dependency`](crate::Dependency).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDependency {
    pub id: PackageDependencyId,
    pub package: PackageId,
    pub dependency: PackageId,
    /// The module edge this was derived from.
    pub ref_dependency: DependencyId,
}

/// All installed versions of one package name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePackages {
    pub name: String,
    /// One package per distinct version, sorted by version string.
    pub packages: Vec<PackageId>,
    pub versions: Vec<String>,
}
