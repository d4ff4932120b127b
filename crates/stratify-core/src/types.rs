//! Shared types used across the alignment pipeline.

use crate::error::{Result, StratifyError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a patient record in the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::str::FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(RecordId)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A clinically defined category (ground truth).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u32);

impl CategoryId {
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cluster index produced by one k-means fit, in `[0, k)`.
///
/// Raw labels are scoped to the fit that produced them. Two fits over the same
/// data may hand out different labels for the same group, so a raw label must
/// never be compared across fits or stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RawLabel(pub usize);

impl RawLabel {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for RawLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!("raw-{}", self.0))
    }
}

/// A two-dimensional biomarker point.
///
/// Both fields are required when deserialized. Finiteness is checked by
/// [`FeatureVector::validate`], which every pipeline entry point calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Microsatellite-instability count.
    pub msi: f64,
    /// Structural-variation count.
    pub sv: f64,
}

impl FeatureVector {
    /// Build a vector without checking finiteness.
    pub fn new(msi: f64, sv: f64) -> Self {
        Self { msi, sv }
    }

    /// Build a vector, rejecting NaN and infinite values.
    pub fn try_new(msi: f64, sv: f64) -> Result<Self> {
        let v = Self { msi, sv };
        v.validate()?;
        Ok(v)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.msi.is_finite() {
            return Err(StratifyError::invalid_input(format!(
                "msi must be finite, got {}",
                self.msi
            )));
        }
        if !self.sv.is_finite() {
            return Err(StratifyError::invalid_input(format!(
                "sv must be finite, got {}",
                self.sv
            )));
        }
        Ok(())
    }

    pub fn squared_distance_to(&self, other: &FeatureVector) -> f64 {
        (self.msi - other.msi).powi(2) + (self.sv - other.sv).powi(2)
    }
}

/// A patient whose category is already known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnownRecord {
    pub features: FeatureVector,
    pub category: CategoryId,
}

impl KnownRecord {
    pub fn new(features: FeatureVector, category: CategoryId) -> Self {
        Self { features, category }
    }

    /// Shorthand used heavily by tests and fixtures.
    pub fn from_parts(msi: f64, sv: f64, category: u32) -> Self {
        Self::new(FeatureVector::new(msi, sv), CategoryId(category))
    }
}

/// Display metadata for a category.
///
/// The external table stores the treatment text in a column named
/// `resolution`; it is exposed here as `treatment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMetadata {
    pub category: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "resolution", skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
}

/// Name rendered for a category with no metadata row.
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown";

/// Treatment rendered when no treatment text is available.
pub const NO_TREATMENT: &str = "N/A";

impl CategoryMetadata {
    pub fn new(category: CategoryId, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            description: None,
            treatment: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_treatment(mut self, treatment: impl Into<String>) -> Self {
        self.treatment = Some(treatment.into());
        self
    }

    /// Placeholder for a category that has no metadata row.
    pub fn unknown(category: CategoryId) -> Self {
        Self {
            category,
            name: UNKNOWN_CATEGORY_NAME.to_string(),
            description: None,
            treatment: Some(NO_TREATMENT.to_string()),
        }
    }

    pub fn treatment_or_default(&self) -> &str {
        self.treatment.as_deref().unwrap_or(NO_TREATMENT)
    }
}

/// Outcome of one prediction request.
///
/// The raw label is kept for logging and diagnostics but is not part of the
/// serialized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    #[serde(skip)]
    pub raw_label: RawLabel,
    #[serde(rename = "predicted_cluster")]
    pub category: CategoryId,
    #[serde(rename = "predicted_cluster_name")]
    pub category_name: String,
    #[serde(rename = "treatment_option")]
    pub treatment: String,
}

impl PredictionResult {
    pub fn from_metadata(raw_label: RawLabel, metadata: &CategoryMetadata) -> Self {
        Self {
            raw_label,
            category: metadata.category,
            category_name: metadata.name.clone(),
            treatment: metadata.treatment_or_default().to_string(),
        }
    }
}
