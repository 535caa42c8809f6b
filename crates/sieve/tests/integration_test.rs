//! Integration tests: CSV in, engines, CSV out.

use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

use sieve::{
    Cell, ColumnKind, DistributionTransform, FillMethod, ImputationStrategy, OutlierMethod,
    ScalingMethod, Sieve, SieveConfig, SieveError, Treatment,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// Twenty ordinary ages followed by one injected extreme value.
fn ages_with_outlier() -> String {
    let mut content = String::from("id,age\n");
    for i in 0..20 {
        content.push_str(&format!("{},{}\n", i, 20 + i));
    }
    content.push_str("20,1000\n");
    content
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_infers_kinds_and_missing() {
    let file = create_test_file(
        "name\tage\tmember\tcity\n\
         Alice\t30\ttrue\tParis\n\
         Bob\tNA\tfalse\t.\n\
         Cara\t41.5\t\tOslo\n",
        ".tsv",
    );
    let (data, source) = Sieve::new().load(file.path()).unwrap();

    assert_eq!(source.delimiter, '\t');
    assert_eq!(source.format, "tsv");
    assert_eq!(source.row_count, 3);
    assert_eq!(source.column_count, 4);
    assert!(source.hash.starts_with("sha256:"));
    assert_eq!(source.size_bytes, std::fs::metadata(file.path()).unwrap().len());

    assert_eq!(data.column("age").unwrap().kind(), ColumnKind::Numeric);
    assert_eq!(data.column("member").unwrap().kind(), ColumnKind::Boolean);
    assert_eq!(data.column("city").unwrap().kind(), ColumnKind::Categorical);
    assert_eq!(data.cell(1, "age").unwrap(), Cell::Missing);
    assert_eq!(data.cell(1, "city").unwrap(), Cell::Missing);
    assert_eq!(data.cell(2, "member").unwrap(), Cell::Missing);
}

#[test]
fn test_load_missing_file() {
    let err = Sieve::new().load("/nonexistent/data.csv").unwrap_err();
    assert!(matches!(err, SieveError::Io { .. }));
}

#[test]
fn test_config_file_drives_engines() {
    let config = create_test_file(r#"{"fill_method": "median", "treatment": "cap"}"#, ".json");
    let sieve = Sieve::with_config(SieveConfig::load(config.path()).unwrap()).unwrap();
    assert_eq!(sieve.config().fill_method, FillMethod::Median);
    assert_eq!(sieve.config().treatment, Treatment::Cap);

    let bad = create_test_file(r#"{"lower_percentile": 90, "upper_percentile": 10}"#, ".json");
    assert!(matches!(
        SieveConfig::load(bad.path()),
        Err(SieveError::InvalidParameter(_))
    ));
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_age_mean_fill_scenario() {
    let file = create_test_file("age\n25\n30\nNA\n40\n1000\n", ".csv");
    let sieve = Sieve::new();
    let (data, _) = sieve.load(file.path()).unwrap();

    // Mean over the four observed values, including the extreme one.
    let result = sieve.impute(&data, &["age"], ImputationStrategy::Simple).unwrap();
    let filled = result.dataset.cell(2, "age").unwrap().as_f64().unwrap();
    assert!((filled - 273.75).abs() < 1e-9);
    assert_eq!(result.affected_rows.iter().copied().collect::<Vec<_>>(), vec![2]);

    // Without the extreme value the fill is (25 + 30 + 40) / 3.
    let file = create_test_file("age\n25\n30\nNA\n40\n", ".csv");
    let (data, _) = sieve.load(file.path()).unwrap();
    let result = sieve.impute(&data, &["age"], ImputationStrategy::Simple).unwrap();
    let filled = result.dataset.cell(2, "age").unwrap().as_f64().unwrap();
    assert!((filled - 95.0 / 3.0).abs() < 1e-9);
    assert_eq!(result.dataset.cell(0, "age").unwrap(), Cell::Number(25.0));
}

#[test]
fn test_age_iqr_trim_scenario() {
    let file = create_test_file("age\n25\n30\nNA\n40\n1000\n", ".csv");
    let sieve = Sieve::new();
    let (data, _) = sieve.load(file.path()).unwrap();

    let detection = sieve.detect_outliers(&data, &["age"], OutlierMethod::Iqr).unwrap();
    assert_eq!(detection.flagged_rows.iter().copied().collect::<Vec<_>>(), vec![4]);

    let result = sieve.treat_outliers(&data, &["age"], OutlierMethod::Iqr).unwrap();
    // The missing row is never an outlier, so it survives the trim.
    assert_eq!(result.dataset.row_ids(), &[0, 1, 2, 3]);
}

#[test]
fn test_z_score_trim_scenario() {
    let file = create_test_file(&ages_with_outlier(), ".csv");
    let sieve = Sieve::new();
    let (data, _) = sieve.load(file.path()).unwrap();

    let result = sieve.treat_outliers(&data, &["age"], OutlierMethod::ZScore).unwrap();
    assert_eq!(result.summary.outlier_counts["age"], 1);
    assert_eq!(result.dataset.row_count(), 20);
    assert!(!result.dataset.row_ids().contains(&20));
}

#[test]
fn test_color_mode_and_label_scenario() {
    let file = create_test_file("color\nred\nblue\nred\nNA\ngreen\n", ".csv");
    let sieve = Sieve::with_config(SieveConfig::new().with_fill_method(FillMethod::Mode)).unwrap();
    let (data, _) = sieve.load(file.path()).unwrap();

    let filled = sieve.impute(&data, &["color"], ImputationStrategy::Simple).unwrap();
    assert_eq!(filled.dataset.cell(3, "color").unwrap(), Cell::Text("red".into()));

    let labels = sieve.encoding().label(&data, &["color"]).unwrap();
    let codes = &labels.summary.columns["color"].codes;
    assert_eq!(codes["red"], Cell::Number(0.0));
    assert_eq!(codes["blue"], Cell::Number(1.0));
    assert_eq!(codes["green"], Cell::Number(2.0));
    assert_eq!(labels.dataset.cell(3, "color").unwrap(), Cell::Missing);
}

// =============================================================================
// Policies
// =============================================================================

#[test]
fn test_trim_drops_row_flagged_in_any_column() {
    let mut content = String::from("a,b\n");
    for i in 0..20 {
        content.push_str(&format!("{},{}\n", i, 100 + i));
    }
    content.push_str("500,110\n");
    content.push_str("10,-900\n");
    let file = create_test_file(&content, ".csv");
    let sieve = Sieve::new();
    let (data, _) = sieve.load(file.path()).unwrap();

    let result = sieve.treat_outliers(&data, &["a", "b"], OutlierMethod::Iqr).unwrap();
    assert_eq!(result.dataset.row_count(), 20);
    assert!(!result.dataset.row_ids().contains(&20));
    assert!(!result.dataset.row_ids().contains(&21));
}

#[test]
fn test_one_hot_drop_first_in_place() {
    let file = create_test_file("id,color,size\n1,red,3\n2,blue,4\n3,green,5\n4,,6\n", ".csv");
    let sieve = Sieve::new();
    let (data, _) = sieve.load(file.path()).unwrap();

    let result = sieve.encoding().one_hot(&data, &["color"]).unwrap();
    assert_eq!(
        result.dataset.column_names(),
        vec!["id", "color_green", "color_red", "size"]
    );
    assert_eq!(result.summary.columns["color"].reference.as_deref(), Some("blue"));
    assert_eq!(result.dataset.cell(1, "color_green").unwrap(), Cell::Bool(false));
    assert_eq!(result.dataset.cell(1, "color_red").unwrap(), Cell::Bool(false));
    assert_eq!(result.dataset.cell(3, "color_red").unwrap(), Cell::Missing);
}

#[test]
fn test_transform_domain_error_names_row() {
    let file = create_test_file("x\n4\n9\n-1\n", ".csv");
    let sieve = Sieve::new();
    let (data, _) = sieve.load(file.path()).unwrap();

    let err = sieve.transform(&data, &["x"], DistributionTransform::Sqrt).unwrap_err();
    assert!(matches!(err, SieveError::DomainError { row: 2, .. }));

    let ok = sieve.transform(&data, &["x"], DistributionTransform::YeoJohnson).unwrap();
    assert!(ok.dataset.has_column("x_yeojohnson"));
    assert!(ok.summary.lambdas.contains_key("x"));
}

// =============================================================================
// Full pipeline
// =============================================================================

#[test]
fn test_pipeline_round_trips_through_csv() {
    let file = create_test_file(
        "age,income,group\n\
         25,40000,a\n\
         NA,52000,b\n\
         40,NA,a\n\
         33,61000,c\n\
         29,48000,b\n",
        ".csv",
    );
    let sieve = Sieve::new();
    let (data, _) = sieve.load(file.path()).unwrap();

    let filled = sieve
        .impute(&data, &["age", "income"], ImputationStrategy::Knn)
        .unwrap();
    assert_eq!(filled.dataset.column("age").unwrap().missing_count(), 0);
    assert_eq!(filled.dataset.column("income").unwrap().missing_count(), 0);

    let scaled = sieve
        .scale(&filled.dataset, &["age", "income"], ScalingMethod::MinMax)
        .unwrap();
    let encoded = sieve.encoding().one_hot(&scaled.dataset, &["group"]).unwrap();

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("clean.csv");
    sieve.save(&encoded.dataset, &out).unwrap();

    let (back, source) = sieve.load(&out).unwrap();
    assert_eq!(source.row_count, 5);
    assert_eq!(back.column_names(), encoded.dataset.column_names());
    assert_eq!(back.column("age").unwrap(), encoded.dataset.column("age").unwrap());
    assert_eq!(back.column("group_b").unwrap().kind(), ColumnKind::Boolean);
}

#[test]
fn test_cleaning_keeps_original_row_ids() {
    let file = create_test_file("a,b\n1,x\nNA,y\n3,\n4,x\n", ".csv");
    let sieve = Sieve::new();
    let (data, _) = sieve.load(file.path()).unwrap();

    let complete = sieve.cleaner().complete_case(&data, &[]).unwrap();
    assert_eq!(complete.dataset.row_ids(), &[0, 3]);
    assert_eq!(complete.summary.removed_rows, vec![1, 2]);

    let dropped = sieve
        .cleaner()
        .drop_rows_by_value(&complete.dataset, "b", "x")
        .unwrap();
    assert_eq!(dropped.dataset.row_count(), 0);
    assert_eq!(dropped.summary.removed_rows, vec![0, 3]);
}
