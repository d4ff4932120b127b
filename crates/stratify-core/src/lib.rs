//! # Stratify Core
//!
//! Core types and traits shared by every Stratify crate.
//!
//! Stratify assigns patients to clinically defined categories from two
//! biomarker measurements. A k-means partition is fitted over patients whose
//! category is already known, every raw cluster label is aligned to the
//! dominant known category among its members, and new patients are classified
//! through that alignment.
//!
//! This crate holds the vocabulary of that pipeline:
//!
//! - **FeatureVector** - an `(msi, sv)` biomarker point
//! - **KnownRecord** - a feature vector with its ground-truth category
//! - **RawLabel** - a cluster index that only means something inside one fit
//! - **CategoryMetadata** - display name and treatment for a category
//! - **PredictionResult** - what a prediction request returns
//!
//! ## Quick Start
//!
//! ```rust
//! use stratify_core::prelude::*;
//!
//! let point = FeatureVector::try_new(0.15, 0.15).unwrap();
//! let record = KnownRecord::new(point, CategoryId(1));
//! assert_eq!(record.category, CategoryId(1));
//!
//! assert!(FeatureVector::try_new(f64::NAN, 1.0).is_err());
//! ```

pub mod error;
pub mod metadata;
pub mod prelude;
pub mod types;
