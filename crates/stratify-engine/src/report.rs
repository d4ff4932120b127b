//! Alignment summary for operators.
//!
//! Shows, for the current known data, where each raw cluster sits and which
//! category it was aligned to. Raw labels in a report are only meaningful
//! next to the centroids of the same report.

use crate::alignment::AlignmentMap;
use crate::fitter::PartitionModel;
use serde::Serialize;
use stratify_core::types::{CategoryId, FeatureVector, RawLabel};

/// One raw cluster of a fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub raw_label: RawLabel,
    pub centroid: FeatureVector,
    pub members: usize,
    /// Aligned category; `None` when no known record fell in this cluster.
    pub category: Option<CategoryId>,
    pub votes: usize,
}

impl ClusterSummary {
    /// Share of members that voted for the aligned category.
    pub fn purity(&self) -> f64 {
        if self.members == 0 {
            0.0
        } else {
            self.votes as f64 / self.members as f64
        }
    }
}

/// Fit diagnostics plus one summary per raw cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentReport {
    pub k: usize,
    pub records: usize,
    pub inertia: f64,
    pub iterations: usize,
    pub converged: bool,
    pub clusters: Vec<ClusterSummary>,
    /// Raw labels no known record was assigned to. A prediction landing on
    /// one of these fails with `AlignmentLookup`.
    pub unaligned: Vec<RawLabel>,
}

impl AlignmentReport {
    pub fn build(model: &PartitionModel, alignment: &AlignmentMap, records: usize) -> Self {
        let clusters = model
            .centroids()
            .iter()
            .enumerate()
            .map(|(i, centroid)| {
                let raw_label = RawLabel(i);
                let entry = alignment.entry(raw_label);
                ClusterSummary {
                    raw_label,
                    centroid: *centroid,
                    members: entry.map(|e| e.members).unwrap_or(0),
                    category: entry.map(|e| e.category),
                    votes: entry.map(|e| e.votes).unwrap_or(0),
                }
            })
            .collect();

        Self {
            k: model.k(),
            records,
            inertia: model.inertia(),
            iterations: model.iterations(),
            converged: model.converged(),
            clusters,
            unaligned: alignment.unaligned_labels(),
        }
    }

    /// Fraction of known records whose category matches their cluster's.
    pub fn agreement(&self) -> f64 {
        if self.records == 0 {
            return 0.0;
        }
        let agreeing: usize = self.clusters.iter().map(|c| c.votes).sum();
        agreeing as f64 / self.records as f64
    }

    pub fn has_empty_clusters(&self) -> bool {
        !self.unaligned.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::align;
    use stratify_core::types::KnownRecord;

    #[test]
    fn empty_cluster_is_listed_as_unaligned() {
        let model = PartitionModel::from_centroids(vec![
            FeatureVector::new(0.0, 0.0),
            FeatureVector::new(10.0, 10.0),
            FeatureVector::new(-10.0, 5.0),
        ]);
        let known = vec![
            KnownRecord::from_parts(0.0, 0.1, 1),
            KnownRecord::from_parts(9.9, 10.0, 2),
        ];
        let alignment = align(&known, &[RawLabel(0), RawLabel(1)], 3).unwrap();
        let report = AlignmentReport::build(&model, &alignment, known.len());

        assert_eq!(report.unaligned, vec![RawLabel(2)]);
        assert!(report.has_empty_clusters());
        assert_eq!(report.clusters[2].category, None);
        assert_eq!(report.clusters[2].purity(), 0.0);
    }
}
