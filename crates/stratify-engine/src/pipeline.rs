//! One prediction request, end to end.
//!
//! Fit, align, predict and resolve metadata. Every call refits from the known
//! records it is handed; models and alignment maps are never cached, so the
//! result always reflects the current ground truth.

use crate::alignment::{self, AlignmentMap};
use crate::config::EngineConfig;
use crate::fitter::{self, PartitionModel};
use crate::metadata;
use crate::predictor;
use crate::report::AlignmentReport;
use stratify_core::error::Result;
use stratify_core::metadata::MetadataSource;
use stratify_core::types::{CategoryId, FeatureVector, KnownRecord, PredictionResult, RawLabel};
use tracing::{debug, info};

/// Stateless pipeline runner bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct ClusterEngine {
    config: EngineConfig,
}

impl ClusterEngine {
    /// Create an engine, rejecting invalid configuration up front.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Default configuration with `k` clusters.
    pub fn with_k(k: usize) -> Result<Self> {
        Self::new(EngineConfig::with_k(k))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn k(&self) -> usize {
        self.config.k
    }

    pub fn fit(&self, known: &[KnownRecord]) -> Result<PartitionModel> {
        fitter::fit(known, &self.config)
    }

    pub fn fit_with_assignments(
        &self,
        known: &[KnownRecord],
    ) -> Result<(PartitionModel, Vec<RawLabel>)> {
        fitter::fit_with_assignments(known, &self.config)
    }

    pub fn align(&self, known: &[KnownRecord], raw_labels: &[RawLabel]) -> Result<AlignmentMap> {
        alignment::align(known, raw_labels, self.config.k)
    }

    /// Fit and align in one step.
    pub fn fit_aligned(&self, known: &[KnownRecord]) -> Result<(PartitionModel, AlignmentMap)> {
        let (model, raw_labels) = self.fit_with_assignments(known)?;
        let alignment = self.align(known, &raw_labels)?;
        Ok((model, alignment))
    }

    pub fn predict(
        &self,
        model: &PartitionModel,
        alignment: &AlignmentMap,
        point: &FeatureVector,
    ) -> Result<(RawLabel, CategoryId)> {
        predictor::predict(model, alignment, point)
    }

    /// Classify `point` against a fresh fit over `known` and attach metadata.
    ///
    /// The point is validated first: a non-finite point yields `InvalidInput`
    /// even when `known` is too small to fit, in which case a finite point
    /// would yield `InsufficientData`.
    pub fn handle_predict<S: MetadataSource + ?Sized>(
        &self,
        known: &[KnownRecord],
        point: &FeatureVector,
        source: &S,
    ) -> Result<PredictionResult> {
        // Reject a bad point before paying for the fit.
        point.validate()?;

        let (model, alignment) = self.fit_aligned(known)?;
        let (raw_label, category) = self.predict(&model, &alignment, point)?;
        let meta = metadata::resolve(source, category);

        info!(
            k = self.config.k,
            records = known.len(),
            %raw_label,
            %category,
            "prediction resolved"
        );

        Ok(PredictionResult::from_metadata(raw_label, &meta))
    }

    /// Fit and align over `known` and summarize every raw cluster.
    pub fn describe(&self, known: &[KnownRecord]) -> Result<AlignmentReport> {
        let (model, alignment) = self.fit_aligned(known)?;
        let report = AlignmentReport::build(&model, &alignment, known.len());
        debug!(
            k = report.k,
            agreement = report.agreement(),
            "alignment report built"
        );
        Ok(report)
    }
}

/// [`ClusterEngine::handle_predict`] with the default configuration and `k` clusters.
pub fn handle_predict<S: MetadataSource + ?Sized>(
    known: &[KnownRecord],
    k: usize,
    point: &FeatureVector,
    source: &S,
) -> Result<PredictionResult> {
    ClusterEngine::with_k(k)?.handle_predict(known, point, source)
}
