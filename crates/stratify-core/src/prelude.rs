//! Stratify Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use stratify_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    CategoryId, CategoryMetadata, FeatureVector, KnownRecord, PredictionResult, RawLabel,
    RecordId, NO_TREATMENT, UNKNOWN_CATEGORY_NAME,
};

// Re-export the metadata lookup trait
pub use crate::metadata::{MetadataSource, MetadataTable};

// Re-export error types
pub use crate::error::{Result, StratifyError};
