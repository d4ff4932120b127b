//! Stratify Engine Prelude.

pub use crate::alignment::{align, AlignmentEntry, AlignmentMap};
pub use crate::config::EngineConfig;
pub use crate::fitter::{fit, fit_with_assignments, PartitionModel};
pub use crate::metadata::resolve;
pub use crate::pipeline::{handle_predict, ClusterEngine};
pub use crate::predictor::predict;
pub use crate::report::{AlignmentReport, ClusterSummary};
