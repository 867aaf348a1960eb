//! # tally-diff
//!
//! Compares the emitted assets of two builds: byte totals and counts per
//! asset category, and a per-asset classification after stripping content
//! hashes from file names.
//!
//! ```rust
//! use tally_diff::{AssetCategory, AssetRecord, DefaultNormalizer, DiffOptions, Direction, diff_records};
//!
//! let baseline = [AssetRecord::new("app.1a2b3c4d.js", 1000, true)];
//! let current = [AssetRecord::new("app.5e6f7a8b.js", 1200, true)];
//! let normalizer = DefaultNormalizer::with_template("[name].[contenthash:8].js").unwrap();
//!
//! let summary = diff_records(&baseline, &current, &DiffOptions::default(), &normalizer);
//! let js = summary.category(AssetCategory::Js).unwrap();
//! assert_eq!(js.percent, 20.0);
//! assert_eq!(js.direction, Direction::Up);
//! assert_eq!(summary.assets[0].name, "app.js");
//! ```

pub mod category;
pub mod diff;
pub mod normalize;
pub mod summary;

pub use category::AssetCategory;
pub use diff::{
    AssetDiff, AssetRecord, AssetSide, AssetStatus, DiffOptions, DiffSummary, diff, diff_data,
    diff_records, records, records_from_data,
};
pub use normalize::{AssetNameNormalizer, DefaultNormalizer, HeuristicNormalizer, TemplateNormalizer};
pub use summary::{CategoryDiff, Direction, SizeSummary, percent};

#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("invalid output filename template `{template}`: {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, DiffError>;
