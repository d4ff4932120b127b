//! Predict the category of a new patient.

use anyhow::Result;
use colored::Colorize;
use stratify_core::types::FeatureVector;

use super::{engine, open_store};
use crate::config::Project;

pub fn run(msi: f64, sv: f64, k: Option<usize>, json: bool) -> Result<()> {
    let project = Project::load()?;
    let engine = engine(&project.config.engine, k)?;
    let point = FeatureVector::try_new(msi, sv)?;

    let store = open_store(&project)?;
    let known = store.known_records()?;
    let metadata = store.metadata_table()?;

    let result = engine.handle_predict(&known, &point, &metadata)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} msi {}, sv {} ({} known records, k = {})",
        "→".blue(),
        msi,
        sv,
        known.len(),
        engine.k()
    );
    println!();
    println!(
        "  Category:   {} {}",
        result.category.to_string().cyan().bold(),
        result.category_name.bold()
    );
    println!("  Treatment:  {}", result.treatment.green());

    Ok(())
}
