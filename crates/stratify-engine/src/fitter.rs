//! Partition fitting via seeded k-means.
//!
//! Only the biomarker geometry is used: the category of each known record is
//! invisible here. Initialization is k-means++ driven by [`Lcg`], repeated
//! `n_init` times from seeds derived from the configured base seed, and the
//! run with the lowest inertia is kept. Each run then performs Lloyd
//! iterations until an assignment pass changes no label, the squared centroid
//! shift drops below `tolerance` times the mean feature variance, or the
//! iteration cap is hit.
//!
//! No feature scaling is applied. Callers that need comparable MSI/SV scales
//! must rescale before fitting.

use crate::config::EngineConfig;
use crate::rng::Lcg;
use stratify_core::error::{Result, StratifyError};
use stratify_core::types::{FeatureVector, KnownRecord, RawLabel};
use tracing::{debug, warn};

/// Fitted k-means state.
///
/// Request-scoped: a model is built for one prediction and dropped with it.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionModel {
    centroids: Vec<FeatureVector>,
    inertia: f64,
    iterations: usize,
    converged: bool,
}

impl PartitionModel {
    /// Model with fixed centroids and no fit diagnostics.
    pub fn from_centroids(centroids: Vec<FeatureVector>) -> Self {
        Self {
            centroids,
            inertia: 0.0,
            iterations: 0,
            converged: true,
        }
    }

    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    pub fn centroids(&self) -> &[FeatureVector] {
        &self.centroids
    }

    pub fn centroid(&self, label: RawLabel) -> Option<&FeatureVector> {
        self.centroids.get(label.index())
    }

    /// Sum of squared distances from each known point to its centroid.
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Lloyd iterations run by the winning initialization.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Nearest centroid by Euclidean distance. Exact ties go to the lower label.
    pub fn classify(&self, point: &FeatureVector) -> RawLabel {
        RawLabel(nearest_centroid(&self.centroids, point).0)
    }
}

/// Fit a partition over `known`.
pub fn fit(known: &[KnownRecord], config: &EngineConfig) -> Result<PartitionModel> {
    fit_with_assignments(known, config).map(|(model, _)| model)
}

/// Fit a partition and return the raw label of every known record,
/// positionally aligned with `known`.
pub fn fit_with_assignments(
    known: &[KnownRecord],
    config: &EngineConfig,
) -> Result<(PartitionModel, Vec<RawLabel>)> {
    config.validate()?;
    let k = config.k;

    if known.len() < k {
        return Err(StratifyError::InsufficientData {
            available: known.len(),
            k,
        });
    }

    let mut points = Vec::with_capacity(known.len());
    for (i, record) in known.iter().enumerate() {
        record.features.validate().map_err(|e| {
            StratifyError::invalid_input(format!("known record {}: {}", i, e))
        })?;
        points.push(record.features);
    }

    let mut seeder = Lcg::new(config.seed);
    let mut best: Option<LloydRun> = None;

    for run_idx in 0..config.n_init {
        let mut rng = Lcg::new(seeder.next_u64());
        let initial = kmeans_plus_plus(&points, k, &mut rng);
        let run = lloyd(&points, initial, config.max_iterations, config.tolerance);

        debug!(
            run = run_idx,
            inertia = run.inertia,
            iterations = run.iterations,
            converged = run.converged,
            "k-means initialization finished"
        );

        // Strict comparison keeps the earliest run on exact ties.
        let better = match &best {
            Some(current) => run.inertia < current.inertia,
            None => true,
        };
        if better {
            best = Some(run);
        }
    }

    // n_init >= 1 is enforced by validate().
    let run = best.ok_or_else(|| StratifyError::invalid_config("n_init", "must be at least 1"))?;

    let mut members = vec![0usize; k];
    for label in &run.labels {
        members[*label] += 1;
    }
    for (label, count) in members.iter().enumerate() {
        if *count == 0 {
            warn!(raw_label = label, k, "cluster has no known records assigned");
        }
    }

    debug!(
        k,
        records = points.len(),
        inertia = run.inertia,
        iterations = run.iterations,
        "partition fitted"
    );

    let labels = run.labels.into_iter().map(RawLabel).collect();
    let model = PartitionModel {
        centroids: run.centroids,
        inertia: run.inertia,
        iterations: run.iterations,
        converged: run.converged,
    };

    Ok((model, labels))
}

struct LloydRun {
    centroids: Vec<FeatureVector>,
    labels: Vec<usize>,
    inertia: f64,
    iterations: usize,
    converged: bool,
}

/// Index and squared distance of the nearest centroid.
fn nearest_centroid(centroids: &[FeatureVector], point: &FeatureVector) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, c) in centroids.iter().enumerate() {
        let d = point.squared_distance_to(c);
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}

/// k-means++ seeding: each new centroid is drawn with probability
/// proportional to its squared distance from the closest centroid so far.
fn kmeans_plus_plus(points: &[FeatureVector], k: usize, rng: &mut Lcg) -> Vec<FeatureVector> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.next_index(n)]);

    let mut closest: Vec<f64> = points
        .iter()
        .map(|p| p.squared_distance_to(&centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = closest.iter().sum();

        let chosen = if total > 0.0 {
            let target = rng.next_f64() * total;
            // Rounding can leave target past the running sum; fall back to the
            // last point that still has weight.
            let mut chosen = closest.iter().rposition(|&d| d > 0.0).unwrap_or(n - 1);
            let mut acc = 0.0;
            for (i, &d) in closest.iter().enumerate() {
                acc += d;
                if d > 0.0 && acc > target {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            // Every point coincides with a centroid already.
            rng.next_index(n)
        };

        let centroid = points[chosen];
        for (slot, p) in closest.iter_mut().zip(points) {
            let d = p.squared_distance_to(&centroid);
            if d < *slot {
                *slot = d;
            }
        }
        centroids.push(centroid);
    }

    centroids
}

fn assign(points: &[FeatureVector], centroids: &[FeatureVector], labels: &mut [usize]) -> f64 {
    let mut inertia = 0.0;
    for (label, p) in labels.iter_mut().zip(points) {
        let (idx, d) = nearest_centroid(centroids, p);
        *label = idx;
        inertia += d;
    }
    inertia
}

/// Mean of the per-feature variances, used to put the tolerance in data units.
fn mean_variance(points: &[FeatureVector]) -> f64 {
    let n = points.len() as f64;
    let (sum_msi, sum_sv) = points
        .iter()
        .fold((0.0, 0.0), |(a, b), p| (a + p.msi, b + p.sv));
    let (mean_msi, mean_sv) = (sum_msi / n, sum_sv / n);
    let (var_msi, var_sv) = points.iter().fold((0.0, 0.0), |(a, b), p| {
        (a + (p.msi - mean_msi).powi(2), b + (p.sv - mean_sv).powi(2))
    });
    (var_msi / n + var_sv / n) / 2.0
}

fn lloyd(
    points: &[FeatureVector],
    mut centroids: Vec<FeatureVector>,
    max_iterations: usize,
    tolerance: f64,
) -> LloydRun {
    let k = centroids.len();
    let threshold = tolerance * mean_variance(points);
    let mut labels = vec![0usize; points.len()];
    let mut previous: Option<Vec<usize>> = None;
    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..max_iterations {
        iterations += 1;
        assign(points, &centroids, &mut labels);

        // Stable assignments: the centroids are already the member means.
        if previous.as_deref() == Some(labels.as_slice()) {
            converged = true;
            break;
        }

        let mut sums = vec![(0.0f64, 0.0f64); k];
        let mut counts = vec![0usize; k];
        for (&label, p) in labels.iter().zip(points) {
            sums[label].0 += p.msi;
            sums[label].1 += p.sv;
            counts[label] += 1;
        }

        let mut shift = 0.0;
        for c in 0..k {
            // An empty cluster keeps its previous centroid.
            if counts[c] == 0 {
                continue;
            }
            let n = counts[c] as f64;
            let updated = FeatureVector::new(sums[c].0 / n, sums[c].1 / n);
            shift += centroids[c].squared_distance_to(&updated);
            centroids[c] = updated;
        }

        if shift <= threshold {
            converged = true;
            break;
        }
        previous = Some(labels.clone());
    }

    // Final pass so every label agrees with the returned centroids.
    let inertia = assign(points, &centroids, &mut labels);

    LloydRun {
        centroids,
        labels,
        inertia,
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<KnownRecord> {
        vec![
            KnownRecord::from_parts(0.1, 0.1, 1),
            KnownRecord::from_parts(0.1, 0.2, 1),
            KnownRecord::from_parts(0.2, 0.1, 1),
            KnownRecord::from_parts(5.0, 5.0, 2),
            KnownRecord::from_parts(5.1, 5.1, 2),
            KnownRecord::from_parts(5.2, 4.9, 2),
        ]
    }

    #[test]
    fn separates_distant_blobs() {
        let known = two_blobs();
        let (model, labels) = fit_with_assignments(&known, &EngineConfig::with_k(2)).unwrap();

        assert_eq!(model.k(), 2);
        assert_eq!(labels.len(), known.len());
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
        assert!(model.converged());
    }

    #[test]
    fn repeated_fits_are_bit_identical() {
        let known = two_blobs();
        let config = EngineConfig::with_k(2);
        let (a, la) = fit_with_assignments(&known, &config).unwrap();
        let (b, lb) = fit_with_assignments(&known, &config).unwrap();

        assert_eq!(la, lb);
        for (ca, cb) in a.centroids().iter().zip(b.centroids()) {
            assert_eq!(ca.msi.to_bits(), cb.msi.to_bits());
            assert_eq!(ca.sv.to_bits(), cb.sv.to_bits());
        }
        assert_eq!(a.inertia().to_bits(), b.inertia().to_bits());
    }

    #[test]
    fn assignments_match_classify() {
        let known = two_blobs();
        let (model, labels) = fit_with_assignments(&known, &EngineConfig::with_k(3)).unwrap();
        for (record, label) in known.iter().zip(&labels) {
            assert_eq!(model.classify(&record.features), *label);
            assert!(label.index() < 3);
        }
    }

    #[test]
    fn centroids_are_member_means() {
        let known = two_blobs();
        let (model, labels) = fit_with_assignments(&known, &EngineConfig::with_k(2)).unwrap();
        let low = model.centroid(labels[0]).unwrap();
        assert!((low.msi - 0.4 / 3.0).abs() < 1e-12);
        assert!((low.sv - 0.4 / 3.0).abs() < 1e-12);
    }

    fn seeded_blobs(scale: f64) -> Vec<KnownRecord> {
        let centers = [(0.0, 0.0), (6.0, 1.0), (2.0, 7.0)];
        let mut rng = Lcg::new(11);
        (0..60)
            .map(|i| {
                let (cx, cy) = centers[i % 3];
                let dx = rng.next_f64() * 2.0 - 1.0;
                let dy = rng.next_f64() * 2.0 - 1.0;
                KnownRecord::from_parts((cx + dx) * scale, (cy + dy) * scale, i as u32 % 3 + 1)
            })
            .collect()
    }

    fn assert_centroids_are_means(known: &[KnownRecord], model: &PartitionModel, labels: &[RawLabel]) {
        for (c, centroid) in model.centroids().iter().enumerate() {
            let members: Vec<&FeatureVector> = known
                .iter()
                .zip(labels)
                .filter(|(_, l)| l.index() == c)
                .map(|(r, _)| &r.features)
                .collect();
            assert!(!members.is_empty());
            let n = members.len() as f64;
            let mean_msi = members.iter().map(|p| p.msi).sum::<f64>() / n;
            let mean_sv = members.iter().map(|p| p.sv).sum::<f64>() / n;
            assert!((centroid.msi - mean_msi).abs() <= 1e-9 * mean_msi.abs().max(1e-12));
            assert!((centroid.sv - mean_sv).abs() <= 1e-9 * mean_sv.abs().max(1e-12));
        }
    }

    #[test]
    fn fit_does_not_depend_on_feature_scale() {
        let config = EngineConfig::with_k(3).n_init(1);
        let unit = seeded_blobs(1.0);
        let tiny = seeded_blobs(1e-3);

        let (unit_model, unit_labels) = fit_with_assignments(&unit, &config).unwrap();
        let (tiny_model, tiny_labels) = fit_with_assignments(&tiny, &config).unwrap();

        assert_eq!(unit_labels, tiny_labels);
        assert!(unit_model.converged());
        assert!(tiny_model.converged());
        assert!(unit_model.iterations() >= 2);
        assert_eq!(unit_model.iterations(), tiny_model.iterations());

        assert_centroids_are_means(&unit, &unit_model, &unit_labels);
        assert_centroids_are_means(&tiny, &tiny_model, &tiny_labels);
    }

    #[test]
    fn iteration_cap_reports_not_converged() {
        let config = EngineConfig {
            max_iterations: 1,
            ..EngineConfig::with_k(3).n_init(1)
        };
        let model = fit(&seeded_blobs(1.0), &config).unwrap();

        assert_eq!(model.iterations(), 1);
        assert!(!model.converged());
    }

    #[test]
    fn fewer_records_than_k_is_insufficient() {
        let known = vec![KnownRecord::from_parts(1.0, 1.0, 1)];
        let err = fit(&known, &EngineConfig::with_k(2)).unwrap_err();
        assert_eq!(err, StratifyError::InsufficientData { available: 1, k: 2 });
    }

    #[test]
    fn non_finite_record_is_invalid_input() {
        let known = vec![
            KnownRecord::from_parts(1.0, 1.0, 1),
            KnownRecord::from_parts(f64::NAN, 1.0, 2),
        ];
        let err = fit(&known, &EngineConfig::with_k(1)).unwrap_err();
        assert!(matches!(err, StratifyError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_points_leave_a_cluster_empty() {
        let known = vec![
            KnownRecord::from_parts(1.0, 1.0, 1),
            KnownRecord::from_parts(1.0, 1.0, 1),
            KnownRecord::from_parts(1.0, 1.0, 2),
        ];
        let (model, labels) = fit_with_assignments(&known, &EngineConfig::with_k(2)).unwrap();
        assert_eq!(model.k(), 2);
        // All points coincide, so they share the lowest-index nearest centroid.
        assert!(labels.iter().all(|l| *l == labels[0]));
        assert_eq!(model.inertia(), 0.0);
    }

    #[test]
    fn single_cluster_centroid_is_global_mean() {
        let known = two_blobs();
        let model = fit(&known, &EngineConfig::with_k(1)).unwrap();
        let mean_msi = known.iter().map(|r| r.features.msi).sum::<f64>() / known.len() as f64;
        assert!((model.centroids()[0].msi - mean_msi).abs() < 1e-12);
    }
}
