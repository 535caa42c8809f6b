//! Property-based tests for the Sieve engines.
//!
//! These tests use proptest to generate random columns and verify that the
//! engines keep their invariants under all conditions.
//!
//! # Running Property Tests
//!
//! ```bash
//! # Run all property tests
//! cargo test -p sieve --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p sieve --test property_tests
//! ```

use proptest::prelude::*;

use sieve::outliers::{IqrDetector, PercentileDetector, ZScoreDetector};
use sieve::stats::{self, Denominator};
use sieve::{
    Column, Dataset, EncodingEngine, FillMethod, Imputer, OutlierEngine, ScalingEngine,
    ScalingMethod, SimpleImputer,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Numeric cells with roughly one in five missing.
fn numeric_cells() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(
        prop_oneof![
            1 => Just(None),
            4 => (-1.0e6..1.0e6f64).prop_map(Some),
        ],
        1..60,
    )
}

/// Numeric cells with at least one observed value.
fn observed_cells() -> impl Strategy<Value = Vec<Option<f64>>> {
    numeric_cells().prop_filter("needs an observed value", |cells| {
        cells.iter().any(Option::is_some)
    })
}

/// Categorical cells drawn from a small alphabet.
fn category_cells() -> impl Strategy<Value = Vec<Option<String>>> {
    prop::collection::vec(
        prop_oneof![
            1 => Just(None),
            5 => "[a-e]".prop_map(Some),
        ],
        1..40,
    )
}

fn dataset(cells: Vec<Option<f64>>) -> Dataset {
    Dataset::new(vec![Column::numeric("x", cells)]).unwrap()
}

// =============================================================================
// Imputation
// =============================================================================

proptest! {
    /// Mean and median fills leave nothing missing and keep observed values.
    #[test]
    fn fill_completes_and_preserves(cells in observed_cells()) {
        for method in [FillMethod::Mean, FillMethod::Median] {
            let result = SimpleImputer::new(method).impute(&dataset(cells.clone()), &["x"]).unwrap();
            let filled = result.dataset.column("x").unwrap().as_numeric().unwrap();

            prop_assert_eq!(filled.iter().filter(|v| v.is_none()).count(), 0);
            for (before, after) in cells.iter().zip(filled) {
                if let Some(value) = before {
                    prop_assert_eq!(Some(*value), *after);
                }
            }
        }
    }
}

// =============================================================================
// Outliers
// =============================================================================

proptest! {
    /// A wider IQR fence never flags more cells.
    #[test]
    fn iqr_wider_fence_flags_fewer(cells in observed_cells(), extra in 0.0..5.0f64) {
        let data = dataset(cells);
        let engine = OutlierEngine::new();
        let narrow = engine.detect(&data, &["x"], &IqrDetector::new(1.5).unwrap()).unwrap();
        let wide = engine.detect(&data, &["x"], &IqrDetector::new(1.5 + extra).unwrap()).unwrap();

        prop_assert!(wide.outlier_counts["x"] <= narrow.outlier_counts["x"]);
    }

    /// Missing cells are never flagged and trimming keeps them.
    #[test]
    fn missing_never_outlier(cells in observed_cells()) {
        let data = dataset(cells.clone());
        let result = OutlierEngine::new()
            .trim_outliers(&data, &["x"], &ZScoreDetector::new(1.0).unwrap())
            .unwrap();

        let missing_before = cells.iter().filter(|v| v.is_none()).count();
        let missing_after = result.dataset.column("x").unwrap().missing_count();
        prop_assert_eq!(missing_before, missing_after);
    }

    /// Capping keeps every row and puts every observed value inside its boundary.
    #[test]
    fn cap_stays_within_boundary(cells in observed_cells()) {
        let data = dataset(cells);
        let result = OutlierEngine::new()
            .cap_outliers(&data, &["x"], &IqrDetector::default())
            .unwrap();
        let boundary = result.summary.boundaries["x"];

        prop_assert_eq!(result.dataset.row_count(), data.row_count());
        for value in result.dataset.column("x").unwrap().observed_numeric().unwrap() {
            prop_assert!(!boundary.is_outlier(value));
        }
    }

    /// Trimming a sample with injected extremes removes exactly those rows,
    /// and a second pass finds nothing.
    #[test]
    fn trim_removes_injected_extremes(base in prop::collection::vec(0.0..100.0f64, 30..60)) {
        let mut cells: Vec<Option<f64>> = base.iter().copied().map(Some).collect();
        cells.push(Some(10_000.0));
        cells.push(Some(-10_000.0));
        let data = dataset(cells);
        let engine = OutlierEngine::new();
        let detector = IqrDetector::new(3.0).unwrap();

        let trimmed = engine.trim_outliers(&data, &["x"], &detector).unwrap();
        prop_assert_eq!(trimmed.dataset.row_count(), base.len());

        let again = engine.detect(&trimmed.dataset, &["x"], &detector).unwrap();
        prop_assert_eq!(again.total_outliers(), 0);
    }

    /// Z-score trimming removes injected extremes and is idempotent; values
    /// drawn from a bounded range never reach |z| = 3 on their own.
    #[test]
    fn z_score_trim_is_idempotent(base in prop::collection::vec(0.0..100.0f64, 30..60)) {
        let mut cells: Vec<Option<f64>> = base.iter().copied().map(Some).collect();
        cells.push(Some(10_000.0));
        cells.push(Some(-10_000.0));
        let data = dataset(cells);
        let engine = OutlierEngine::new();
        let detector = ZScoreDetector::default();

        let trimmed = engine.trim_outliers(&data, &["x"], &detector).unwrap();
        prop_assert_eq!(trimmed.dataset.row_count(), base.len());

        let again = engine.detect(&trimmed.dataset, &["x"], &detector).unwrap();
        prop_assert_eq!(again.total_outliers(), 0);
    }

    /// Percentile trimming is idempotent once the sample's own extremes are
    /// repeated, so the interpolated bounds land on them.
    #[test]
    fn percentile_trim_is_idempotent(base in prop::collection::vec(0.0..100.0f64, 30..60)) {
        let low = base.iter().copied().fold(f64::INFINITY, f64::min);
        let high = base.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut cells: Vec<Option<f64>> = base.iter().copied().map(Some).collect();
        cells.push(Some(low));
        cells.push(Some(high));
        let kept = cells.len();
        cells.push(Some(10_000.0));
        cells.push(Some(-10_000.0));
        let data = dataset(cells);
        let engine = OutlierEngine::new();
        let detector = PercentileDetector::new(1.0, 99.0).unwrap();

        let trimmed = engine.trim_outliers(&data, &["x"], &detector).unwrap();
        prop_assert_eq!(trimmed.dataset.row_count(), kept);

        let again = engine.detect(&trimmed.dataset, &["x"], &detector).unwrap();
        prop_assert_eq!(again.total_outliers(), 0);
    }
}

// =============================================================================
// Encoding
// =============================================================================

proptest! {
    /// One-hot adds (categories - 1) indicators and each observed row sums
    /// to one with the reference category.
    #[test]
    fn one_hot_counts_and_row_sums(cells in category_cells()) {
        let data = Dataset::new(vec![Column::categorical("c", cells.clone())]).unwrap();
        let result = EncodingEngine::new().one_hot(&data, &["c"]).unwrap();

        let mut distinct: Vec<&String> = cells.iter().flatten().collect();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(result.dataset.column_count(), distinct.len().saturating_sub(1));

        let reference = result.summary.columns["c"].reference.clone();
        for (row, cell) in cells.iter().enumerate() {
            let Some(category) = cell else { continue };
            let hot = result
                .dataset
                .columns()
                .iter()
                .filter(|column| column.as_boolean().unwrap()[row] == Some(true))
                .count();
            let implicit = usize::from(reference.as_ref() == Some(category));
            prop_assert_eq!(hot + implicit, 1);
        }
    }
}

// =============================================================================
// Scaling
// =============================================================================

proptest! {
    /// Standardized columns have mean 0 and variance 1, or are all zero when constant.
    #[test]
    fn standardization_moments(cells in observed_cells()) {
        let data = dataset(cells);
        let result = ScalingEngine::new().scale(&data, &["x"], ScalingMethod::Standard).unwrap();
        let values = result.dataset.column("x").unwrap().observed_numeric().unwrap();

        if result.summary.parameters["x"].degenerate {
            prop_assert!(values.iter().all(|v| *v == 0.0));
        } else {
            let mean = stats::mean(&values).unwrap();
            let variance = stats::variance(&values, Denominator::Population).unwrap();
            prop_assert!(mean.abs() < 1e-9, "mean {}", mean);
            prop_assert!((variance - 1.0).abs() < 1e-9, "variance {}", variance);
        }
    }
}
