//! Error types for the alignment pipeline.
//!
//! Every variant is fatal to the request that raised it. Nothing in the
//! pipeline retries; that decision belongs to the caller.

use crate::types::RawLabel;
use thiserror::Error;

/// Result type for Stratify operations.
pub type Result<T> = std::result::Result<T, StratifyError>;

/// Errors raised while fitting, aligning or predicting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StratifyError {
    /// Fewer known records than target groups.
    #[error("Insufficient data: {available} known records for k = {k}")]
    InsufficientData { available: usize, k: usize },

    /// Non-finite feature value or malformed pipeline input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The model produced a raw label that no known record was assigned to.
    #[error("No category aligned to {0}; the fit is degenerate for this data")]
    AlignmentLookup(RawLabel),

    /// Engine configuration rejected before fitting.
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}

// Convenience constructors
impl StratifyError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        StratifyError::InvalidInput(msg.into())
    }

    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        StratifyError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the request payload rather than the data set.
    pub fn is_client_error(&self) -> bool {
        matches!(self, StratifyError::InvalidInput(_))
    }
}
