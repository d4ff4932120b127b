//! Store error types.

use stratify_core::error::StratifyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A row was rejected before it reached the database.
    #[error(transparent)]
    Invalid(#[from] StratifyError),

    /// A stored row cannot be turned back into a domain value.
    #[error("Corrupt row in {table}: {reason}")]
    Corrupt { table: &'static str, reason: String },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
