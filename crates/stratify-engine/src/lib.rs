//! # Stratify Engine
//!
//! Cluster alignment and prediction.
//!
//! The engine turns patients with known categories into a classifier for new
//! patients without ever training on the categories directly:
//!
//! 1. **Fit** - seeded k-means over the `(msi, sv)` points ([`fitter`])
//! 2. **Align** - each raw cluster label takes the majority category of its
//!    members, smallest id on ties ([`alignment`])
//! 3. **Predict** - nearest centroid, then the aligned category ([`predictor`])
//! 4. **Resolve** - category name and treatment text ([`metadata`])
//!
//! [`ClusterEngine`] runs all four per request. Nothing is cached between
//! requests, so concurrent callers need no coordination.
//!
//! ## Quick Start
//!
//! ```rust
//! use stratify_core::prelude::*;
//! use stratify_engine::ClusterEngine;
//!
//! let known = vec![
//!     KnownRecord::from_parts(0.1, 0.1, 1),
//!     KnownRecord::from_parts(0.1, 0.2, 1),
//!     KnownRecord::from_parts(5.0, 5.0, 2),
//!     KnownRecord::from_parts(5.1, 5.1, 2),
//! ];
//! let metadata = MetadataTable::new()
//!     .with(CategoryMetadata::new(CategoryId(1), "MSI-Low").with_treatment("Chemotherapy"));
//!
//! let engine = ClusterEngine::with_k(2).unwrap();
//! let result = engine
//!     .handle_predict(&known, &FeatureVector::new(0.15, 0.15), &metadata)
//!     .unwrap();
//!
//! assert_eq!(result.category, CategoryId(1));
//! assert_eq!(result.treatment, "Chemotherapy");
//! ```

pub mod alignment;
pub mod config;
pub mod fitter;
pub mod metadata;
pub mod pipeline;
pub mod predictor;
pub mod prelude;
pub mod report;
pub mod rng;

pub use alignment::{align, AlignmentEntry, AlignmentMap};
pub use config::EngineConfig;
pub use fitter::{fit, fit_with_assignments, PartitionModel};
pub use metadata::resolve;
pub use pipeline::{handle_predict, ClusterEngine};
pub use predictor::predict;
pub use report::{AlignmentReport, ClusterSummary};
