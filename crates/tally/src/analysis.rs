use tally_graph::{BuildGraph, BuildGraphData, CodeLevel, DuplicatePackages, GraphStatistics};
use tally_sourcemap::AttributionReport;
use tally_transform::{GraphPatch, TransformReport};

use crate::Result;

/// A built graph and what each phase did to it.
#[derive(Debug)]
pub struct Analysis {
    pub graph: BuildGraph,
    pub transform: TransformReport,
    pub attribution: AttributionReport,
    /// Code retained when the graph is serialized.
    pub code_level: CodeLevel,
}

impl Analysis {
    pub fn statistics(&self) -> GraphStatistics {
        self.graph.statistics()
    }

    /// Packages present in more than one version.
    pub fn duplicate_packages(&self) -> Vec<DuplicatePackages> {
        self.graph.package_graph.duplicate_packages()
    }

    /// Apply a later update; returns the number of fields changed.
    pub fn apply_patch(&mut self, patch: &GraphPatch) -> usize {
        patch.apply(&mut self.graph)
    }

    pub fn to_data(&self) -> BuildGraphData {
        self.graph.to_data(self.code_level)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(self.graph.to_json(self.code_level)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.graph.to_bytes(self.code_level)?)
    }
}
