//! Classification of new points through a fitted model and its alignment.

use crate::alignment::AlignmentMap;
use crate::fitter::PartitionModel;
use stratify_core::error::{Result, StratifyError};
use stratify_core::types::{CategoryId, FeatureVector, RawLabel};

/// Classify `point` into a raw label, then into its aligned category.
///
/// A raw label without an alignment entry is a hard error; no fallback
/// category is guessed.
pub fn predict(
    model: &PartitionModel,
    alignment: &AlignmentMap,
    point: &FeatureVector,
) -> Result<(RawLabel, CategoryId)> {
    point.validate()?;

    let raw_label = model.classify(point);
    let category = alignment
        .get(raw_label)
        .ok_or(StratifyError::AlignmentLookup(raw_label))?;

    Ok((raw_label, category))
}
