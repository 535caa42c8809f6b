//! Main Sieve struct and public API.

use std::path::Path;

use tracing::debug;

use crate::cleaning::Cleaner;
use crate::config::{ImputationStrategy, OutlierMethod, SieveConfig};
use crate::dataset::Dataset;
use crate::diagnostics::{DatasetProfile, DiagnosticsReporter};
use crate::encoding::EncodingEngine;
use crate::error::Result;
use crate::imputation::{ImputationResult, Imputer, IterativeImputer, KnnImputer, SimpleImputer};
use crate::io::{self, CsvReader, ReaderConfig, SourceMetadata};
use crate::outliers::{
    Detection, IqrDetector, OutlierDetector, OutlierEngine, OutlierResult, PercentileDetector,
    TrimAndCap, ZScoreDetector,
};
use crate::scaling::{ScalingEngine, ScalingMethod, ScalingResult};
use crate::transform::{DistributionResult, DistributionTransform, TransformEngine};

/// Entry point tying the engines to one validated configuration.
pub struct Sieve {
    config: SieveConfig,
    reader: CsvReader,
    diagnostics: DiagnosticsReporter,
    outliers: OutlierEngine,
    transforms: TransformEngine,
    scaling: ScalingEngine,
    encoding: EncodingEngine,
    cleaner: Cleaner,
}

impl Sieve {
    /// Create a Sieve instance with default configuration.
    pub fn new() -> Self {
        Self {
            config: SieveConfig::default(),
            reader: CsvReader::new(),
            diagnostics: DiagnosticsReporter::new(),
            outliers: OutlierEngine::new(),
            transforms: TransformEngine::new(),
            scaling: ScalingEngine::new(),
            encoding: EncodingEngine::new(),
            cleaner: Cleaner::new(),
        }
    }

    /// Create a Sieve instance with custom configuration.
    pub fn with_config(config: SieveConfig) -> Result<Self> {
        config.validate()?;
        let transforms = TransformEngine::new().with_shift(config.box_cox_shift)?;
        Ok(Self {
            config,
            transforms,
            ..Self::new()
        })
    }

    /// Use a custom CSV reader configuration.
    pub fn with_reader_config(mut self, config: ReaderConfig) -> Self {
        self.reader = CsvReader::with_config(config);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SieveConfig {
        &self.config
    }

    /// Load a delimited file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        self.reader.read_path(path)
    }

    /// Write a dataset as CSV.
    pub fn save(&self, dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
        io::write_csv(dataset, path)
    }

    /// Diagnostics over a dataset or a before/after pair.
    pub fn diagnostics(&self) -> &DiagnosticsReporter {
        &self.diagnostics
    }

    /// Per-column profile of the whole dataset.
    pub fn profile(&self, dataset: &Dataset) -> Result<DatasetProfile> {
        self.diagnostics.profile(dataset)
    }

    /// Columns missing few enough values for listwise deletion.
    pub fn complete_case_candidates(&self, dataset: &Dataset) -> Vec<String> {
        self.diagnostics
            .complete_case_candidates(dataset, self.config.complete_case_max_pct)
    }

    /// Build the imputer a strategy names, parameterized from the configuration.
    pub fn imputer(&self, strategy: ImputationStrategy) -> Result<Box<dyn Imputer>> {
        let imputer: Box<dyn Imputer> = match strategy {
            ImputationStrategy::Simple => Box::new(SimpleImputer::new(self.config.fill_method)),
            ImputationStrategy::Knn => Box::new(
                KnnImputer::new(self.config.neighbor_count)?
                    .with_weighting(self.config.neighbor_weighting)
                    .with_categorical_features(self.config.encode_categorical_distance),
            ),
            ImputationStrategy::Iterative => Box::new(
                IterativeImputer::new(self.config.iteration_count)?
                    .with_alpha(self.config.ridge_alpha)?,
            ),
        };
        debug!(strategy = imputer.strategy(), "Built imputer");
        Ok(imputer)
    }

    /// Fill missing cells in the selected columns.
    pub fn impute(
        &self,
        dataset: &Dataset,
        columns: &[&str],
        strategy: ImputationStrategy,
    ) -> Result<ImputationResult> {
        self.imputer(strategy)?.impute(dataset, columns)
    }

    /// Build the detector a method names, parameterized from the configuration.
    pub fn detector(&self, method: OutlierMethod) -> Result<Box<dyn OutlierDetector>> {
        Ok(match method {
            OutlierMethod::ZScore => Box::new(ZScoreDetector::new(self.config.z_threshold)?),
            OutlierMethod::Iqr => Box::new(IqrDetector::new(self.config.iqr_multiplier)?),
            OutlierMethod::Percentile => Box::new(PercentileDetector::new(
                self.config.lower_percentile,
                self.config.upper_percentile,
            )?),
        })
    }

    /// Flag outliers without changing the dataset.
    pub fn detect_outliers(
        &self,
        dataset: &Dataset,
        columns: &[&str],
        method: OutlierMethod,
    ) -> Result<Detection> {
        self.outliers.detect(dataset, columns, self.detector(method)?.as_ref())
    }

    /// Detect outliers and apply the configured treatment.
    pub fn treat_outliers(
        &self,
        dataset: &Dataset,
        columns: &[&str],
        method: OutlierMethod,
    ) -> Result<OutlierResult> {
        self.outliers.treat(
            dataset,
            columns,
            self.detector(method)?.as_ref(),
            self.config.treatment,
        )
    }

    /// Trimmed and capped variants from one set of boundaries.
    pub fn trim_and_cap(
        &self,
        dataset: &Dataset,
        columns: &[&str],
        method: OutlierMethod,
    ) -> Result<TrimAndCap> {
        self.outliers
            .trim_and_cap(dataset, columns, self.detector(method)?.as_ref())
    }

    /// Per-cell z-scores of the selected columns.
    pub fn z_scores(&self, dataset: &Dataset, columns: &[&str]) -> Result<Dataset> {
        self.outliers.z_scores(dataset, columns)
    }

    /// Append a reshaped copy of each selected column.
    pub fn transform(
        &self,
        dataset: &Dataset,
        columns: &[&str],
        transform: DistributionTransform,
    ) -> Result<DistributionResult> {
        self.transforms.apply(dataset, columns, transform)
    }

    /// Rescale the selected columns.
    pub fn scale(&self, dataset: &Dataset, columns: &[&str], method: ScalingMethod) -> Result<ScalingResult> {
        self.scaling.scale(dataset, columns, method)
    }

    /// Categorical encoders.
    pub fn encoding(&self) -> &EncodingEngine {
        &self.encoding
    }

    /// Row and column maintenance.
    pub fn cleaner(&self) -> &Cleaner {
        &self.cleaner
    }
}

impl Default for Sieve {
    fn default() -> Self {
        Self::new()
    }
}
