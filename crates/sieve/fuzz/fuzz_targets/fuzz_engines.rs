//! Fuzz target for outlier treatment and scaling on arbitrary numbers.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sieve::outliers::{IqrDetector, PercentileDetector, ZScoreDetector};
use sieve::{Column, Dataset, OutlierDetector, OutlierEngine, ScalingEngine, ScalingMethod};

#[derive(Debug, Arbitrary)]
struct Input {
    values: Vec<Option<f64>>,
    threshold: f64,
}

fuzz_target!(|input: Input| {
    if input.values.len() > 2_000 {
        return;
    }
    let values: Vec<Option<f64>> = input
        .values
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    let Ok(dataset) = Dataset::new(vec![Column::numeric("x", values)]) else {
        return;
    };

    let engine = OutlierEngine::new();
    let mut detectors: Vec<Box<dyn OutlierDetector>> = vec![
        Box::new(IqrDetector::default()),
        Box::new(PercentileDetector::default()),
    ];
    if let Ok(detector) = ZScoreDetector::new(input.threshold) {
        detectors.push(Box::new(detector));
    }

    for detector in &detectors {
        if let Ok(capped) = engine.cap_outliers(&dataset, &["x"], detector.as_ref()) {
            assert_eq!(capped.dataset.row_count(), dataset.row_count());
        }
        if let Ok(trimmed) = engine.trim_outliers(&dataset, &["x"], detector.as_ref()) {
            assert!(trimmed.dataset.row_count() <= dataset.row_count());
        }
    }

    for method in [ScalingMethod::Standard, ScalingMethod::MinMax, ScalingMethod::Robust] {
        let _ = ScalingEngine::new().scale(&dataset, &["x"], method);
    }
});
