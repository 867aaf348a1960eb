//! Size totals and their deltas.

use serde::{Deserialize, Serialize};

use crate::category::AssetCategory;

/// Total bytes and asset count on one side of a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeSummary {
    pub size: u64,
    pub count: usize,
}

impl SizeSummary {
    pub fn add(&mut self, size: u64) {
        self.size += size;
        self.count += 1;
    }
}

/// How the current build compares to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Equal,
    Up,
    Down,
}

impl Direction {
    pub fn between(baseline: u64, current: u64) -> Self {
        match current.cmp(&baseline) {
            std::cmp::Ordering::Equal => Self::Equal,
            std::cmp::Ordering::Greater => Self::Up,
            std::cmp::Ordering::Less => Self::Down,
        }
    }
}

/// Relative change in percent, always non-negative.
///
/// Equal sizes give 0 and a zero baseline gives 100.
pub fn percent(baseline: u64, current: u64) -> f64 {
    if baseline == current {
        0.0
    } else if baseline == 0 {
        100.0
    } else {
        (baseline.abs_diff(current) as f64 * 100.0) / baseline as f64
    }
}

/// One category's totals on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDiff {
    pub category: AssetCategory,
    pub baseline: SizeSummary,
    pub current: SizeSummary,
    pub percent: f64,
    pub direction: Direction,
}

impl CategoryDiff {
    pub fn new(category: AssetCategory, baseline: SizeSummary, current: SizeSummary) -> Self {
        Self {
            category,
            baseline,
            current,
            percent: percent(baseline.size, current.size),
            direction: Direction::between(baseline.size, current.size),
        }
    }

    /// Signed byte delta.
    pub fn delta(&self) -> i64 {
        self.current.size as i64 - self.baseline.size as i64
    }
}
