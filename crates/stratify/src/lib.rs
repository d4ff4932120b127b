//! # Stratify
//!
//! Predict the clinical category of a patient from two biomarker counts.
//!
//! Every request fits k-means over the known patients, aligns each raw
//! cluster to the category most of its members belong to, classifies the new
//! point, and attaches the category's display name and treatment.
//!
//! ## Quick Start
//!
//! ```rust
//! use stratify::prelude::*;
//!
//! let mut store = SqliteStore::new_in_memory().unwrap();
//! store
//!     .insert_records(&[
//!         KnownRecord::from_parts(0.1, 0.1, 1),
//!         KnownRecord::from_parts(0.1, 0.2, 1),
//!         KnownRecord::from_parts(5.0, 5.0, 2),
//!         KnownRecord::from_parts(5.1, 5.1, 2),
//!     ])
//!     .unwrap();
//! store
//!     .upsert_category(&CategoryMetadata::new(CategoryId(1), "Stable").with_treatment("Surgery"))
//!     .unwrap();
//!
//! let engine = ClusterEngine::with_k(2).unwrap();
//! let result = engine
//!     .handle_predict(
//!         &store.known_records().unwrap(),
//!         &FeatureVector::new(0.15, 0.15),
//!         &store.metadata_table().unwrap(),
//!     )
//!     .unwrap();
//!
//! assert_eq!(result.category, CategoryId(1));
//! assert_eq!(result.treatment, "Surgery");
//! ```
//!
//! ## Architecture
//!
//! - [`stratify_core`] - Shared types, errors, the metadata lookup trait
//! - [`stratify_engine`] - Fitting, alignment, prediction, orchestration
//! - [`stratify_store`] - SQLite store of known records and category metadata
//!
//! The HTTP API (`stratify-web`) and the `stratify` binary (`stratify-cli`)
//! are built on these three crates.

// Re-export all subcrates
pub use stratify_core as core;
pub use stratify_engine as engine;
pub use stratify_store as store;

/// Prelude module for convenient imports.
///
/// ```rust
/// use stratify::prelude::*;
/// ```
pub mod prelude {
    pub use stratify_core::prelude::*;
    pub use stratify_engine::prelude::*;
    pub use stratify_store::{CategoryCount, SqliteStore, StoreError, StoreStats, StoredRecord};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
