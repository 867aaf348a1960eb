//! Build comparison.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tally_graph::collections::FxIndexMap;
use tally_graph::{Asset, BuildGraph, BuildGraphData, path_extension};

use crate::category::AssetCategory;
use crate::normalize::AssetNameNormalizer;
use crate::summary::{CategoryDiff, Direction, SizeSummary, percent};

/// An emitted file as seen by the diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub path: String,
    pub size: u64,
    /// Belongs to an initial chunk.
    pub initial: bool,
}

impl AssetRecord {
    pub fn new(path: impl Into<String>, size: u64, initial: bool) -> Self {
        Self {
            path: path.into(),
            size,
            initial,
        }
    }

    fn from_asset(asset: &Asset, initial: bool) -> Self {
        Self::new(asset.path.clone(), asset.size, initial)
    }

    pub fn extension(&self) -> Option<String> {
        path_extension(&self.path)
    }

    pub fn category(&self) -> AssetCategory {
        AssetCategory::from_extension(self.extension().as_deref())
    }
}

/// Asset records of a live graph.
pub fn records(graph: &BuildGraph) -> Vec<AssetRecord> {
    graph
        .chunk_graph
        .assets()
        .map(|asset| AssetRecord::from_asset(asset, graph.chunk_graph.is_initial_asset(asset)))
        .collect()
}

/// Asset records of a serialized graph.
pub fn records_from_data(data: &BuildGraphData) -> Vec<AssetRecord> {
    let initial: FxHashSet<_> = data
        .chunks
        .iter()
        .filter(|chunk| chunk.initial)
        .map(|chunk| chunk.id)
        .collect();
    data.assets
        .iter()
        .map(|asset| {
            let is_initial = asset.chunks.iter().any(|chunk| initial.contains(chunk));
            AssetRecord::from_asset(asset, is_initial)
        })
        .collect()
}

/// Which assets take part in a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffOptions {
    /// Only assets of initial chunks.
    pub initial_only: bool,
    /// Lowercase extensions without the dot. Empty keeps every asset.
    pub extensions: Vec<String>,
}

impl DiffOptions {
    pub fn accepts(&self, record: &AssetRecord) -> bool {
        if self.initial_only && !record.initial {
            return false;
        }
        if self.extensions.is_empty() {
            return true;
        }
        record
            .extension()
            .is_some_and(|ext| self.extensions.iter().any(|allowed| *allowed == ext))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetStatus {
    New,
    Changed,
    Deleted,
    NotChanged,
}

/// One side of an asset pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSide {
    /// First emitted path with this normalized name.
    pub path: String,
    /// Sum over every asset with this normalized name.
    pub size: u64,
}

/// An asset matched across builds by normalized name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDiff {
    pub name: String,
    pub category: AssetCategory,
    pub baseline: Option<AssetSide>,
    pub current: Option<AssetSide>,
    pub status: AssetStatus,
    pub percent: f64,
    pub direction: Direction,
}

impl AssetDiff {
    fn new(name: String, baseline: Option<AssetSide>, current: Option<AssetSide>) -> Self {
        let before = baseline.as_ref().map_or(0, |side| side.size);
        let after = current.as_ref().map_or(0, |side| side.size);
        let status = match (&baseline, &current) {
            (None, _) => AssetStatus::New,
            (Some(_), None) => AssetStatus::Deleted,
            (Some(_), Some(_)) if before == after => AssetStatus::NotChanged,
            (Some(_), Some(_)) => AssetStatus::Changed,
        };
        let category = current
            .as_ref()
            .or(baseline.as_ref())
            .map(|side| AssetCategory::from_extension(path_extension(&side.path).as_deref()))
            .unwrap_or(AssetCategory::Other);
        Self {
            name,
            category,
            baseline,
            current,
            status,
            percent: percent(before, after),
            direction: Direction::between(before, after),
        }
    }
}

/// Result of comparing two builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// One entry per [`AssetCategory`], in [`AssetCategory::ALL`] order.
    pub categories: Vec<CategoryDiff>,
    /// Baseline assets in emit order, then assets only in the current build.
    pub assets: Vec<AssetDiff>,
}

impl DiffSummary {
    pub fn category(&self, category: AssetCategory) -> Option<&CategoryDiff> {
        self.categories.iter().find(|diff| diff.category == category)
    }

    pub fn total(&self) -> Option<&CategoryDiff> {
        self.category(AssetCategory::All)
    }

    pub fn assets_with_status(&self, status: AssetStatus) -> impl Iterator<Item = &AssetDiff> {
        self.assets.iter().filter(move |asset| asset.status == status)
    }

    pub fn asset(&self, name: &str) -> Option<&AssetDiff> {
        self.assets.iter().find(|asset| asset.name == name)
    }
}

/// Compare two live graphs.
pub fn diff(
    baseline: &BuildGraph,
    current: &BuildGraph,
    options: &DiffOptions,
    normalizer: &dyn AssetNameNormalizer,
) -> DiffSummary {
    diff_records(&records(baseline), &records(current), options, normalizer)
}

/// Compare two serialized graphs.
pub fn diff_data(
    baseline: &BuildGraphData,
    current: &BuildGraphData,
    options: &DiffOptions,
    normalizer: &dyn AssetNameNormalizer,
) -> DiffSummary {
    diff_records(
        &records_from_data(baseline),
        &records_from_data(current),
        options,
        normalizer,
    )
}

pub fn diff_records(
    baseline: &[AssetRecord],
    current: &[AssetRecord],
    options: &DiffOptions,
    normalizer: &dyn AssetNameNormalizer,
) -> DiffSummary {
    let span = tracing::debug_span!(
        "diff",
        baseline = baseline.len(),
        current = current.len(),
        initial_only = options.initial_only
    );
    let _guard = span.enter();

    let baseline: Vec<&AssetRecord> = baseline.iter().filter(|r| options.accepts(r)).collect();
    let current: Vec<&AssetRecord> = current.iter().filter(|r| options.accepts(r)).collect();

    let categories = AssetCategory::ALL
        .into_iter()
        .map(|category| {
            CategoryDiff::new(
                category,
                totals(&baseline, category),
                totals(&current, category),
            )
        })
        .collect();

    let before = by_name(&baseline, normalizer);
    let mut after = by_name(&current, normalizer);
    let mut assets = Vec::with_capacity(before.len().max(after.len()));
    for (name, side) in before {
        let matched = after.shift_remove(&name);
        assets.push(AssetDiff::new(name, Some(side), matched));
    }
    for (name, side) in after {
        assets.push(AssetDiff::new(name, None, Some(side)));
    }

    let summary = DiffSummary { categories, assets };
    if let Some(total) = summary.total() {
        tracing::debug!(
            delta = total.delta(),
            percent = total.percent,
            changed = summary.assets_with_status(AssetStatus::Changed).count(),
            "diff computed"
        );
    }
    summary
}

fn totals(records: &[&AssetRecord], category: AssetCategory) -> SizeSummary {
    let mut summary = SizeSummary::default();
    for record in records {
        if category.contains(record.category()) {
            summary.add(record.size);
        }
    }
    summary
}

fn by_name(
    records: &[&AssetRecord],
    normalizer: &dyn AssetNameNormalizer,
) -> FxIndexMap<String, AssetSide> {
    let mut sides: FxIndexMap<String, AssetSide> = FxIndexMap::default();
    for record in records {
        sides
            .entry(normalizer.normalize(&record.path))
            .and_modify(|side| side.size += record.size)
            .or_insert_with(|| AssetSide {
                path: record.path.clone(),
                size: record.size,
            });
    }
    sides
}
