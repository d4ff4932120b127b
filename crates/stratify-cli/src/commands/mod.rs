//! CLI command implementations.

pub mod align;
pub mod category;
pub mod init;
pub mod predict;
pub mod record;
pub mod stats;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use stratify_engine::{ClusterEngine, EngineConfig};
use stratify_store::SqliteStore;

use crate::config::Project;

/// Open the project's database. The file must already exist.
pub(crate) fn open_store(project: &Project) -> Result<SqliteStore> {
    let path = project.database_path();
    if !path.exists() {
        bail!(
            "No database at {}. Run {} first.",
            path.display(),
            "stratify init".cyan()
        );
    }
    SqliteStore::open(&path).with_context(|| format!("Failed to open database: {}", path.display()))
}

/// Engine for the project config, with an optional `k` override.
pub(crate) fn engine(config: &EngineConfig, k: Option<usize>) -> Result<ClusterEngine> {
    let mut config = config.clone();
    if let Some(k) = k {
        config.k = k;
    }
    ClusterEngine::new(config).context("Invalid engine configuration")
}
