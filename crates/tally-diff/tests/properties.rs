#![cfg(feature = "proptest")]

use proptest::prelude::*;
use tally_diff::{AssetRecord, DiffOptions, Direction, HeuristicNormalizer, diff_records};

fn record() -> impl Strategy<Value = AssetRecord> {
    (
        "[a-z]{1,8}",
        "[0-9a-f]{8}",
        prop::sample::select(vec!["js", "css", "png", "woff2", "map"]),
        0u64..100_000,
        any::<bool>(),
    )
        .prop_map(|(name, hash, ext, size, initial)| {
            AssetRecord::new(format!("{name}.{hash}.{ext}"), size, initial)
        })
}

proptest! {
    #[test]
    fn diff_against_itself_is_equal(records in prop::collection::vec(record(), 0..20), initial_only in any::<bool>()) {
        let options = DiffOptions { initial_only, ..DiffOptions::default() };
        let summary = diff_records(&records, &records, &options, &HeuristicNormalizer);
        for category in &summary.categories {
            prop_assert_eq!(category.direction, Direction::Equal);
            prop_assert_eq!(category.percent, 0.0);
        }
    }

    #[test]
    fn percent_is_never_negative(baseline in 0u64..1_000_000, current in 0u64..1_000_000) {
        let value = tally_diff::percent(baseline, current);
        prop_assert!(value >= 0.0);
        prop_assert_eq!(value == 0.0, baseline == current);
    }
}
