//! Manage category metadata.

use anyhow::Result;
use colored::Colorize;
use stratify_core::types::{CategoryId, CategoryMetadata};

use super::open_store;
use crate::config::Project;

pub fn add(
    id: u32,
    name: String,
    description: Option<String>,
    treatment: Option<String>,
) -> Result<()> {
    let project = Project::load()?;
    let store = open_store(&project)?;

    let meta = CategoryMetadata {
        category: CategoryId(id),
        name,
        description,
        treatment,
    };
    store.upsert_category(&meta)?;

    println!(
        "{} Category {} = {} ({})",
        "✓".green(),
        meta.category.to_string().cyan(),
        meta.name.bold(),
        meta.treatment_or_default()
    );
    Ok(())
}

pub fn list() -> Result<()> {
    let project = Project::load()?;
    let store = open_store(&project)?;
    let categories = store.categories()?;

    if categories.is_empty() {
        println!("{}", "No category metadata.".yellow());
        return Ok(());
    }

    for meta in &categories {
        println!(
            "{} {}",
            format!("[{}]", meta.category).cyan(),
            meta.name.bold()
        );
        if let Some(description) = &meta.description {
            println!("    {}", description.dimmed());
        }
        println!("    Treatment: {}", meta.treatment_or_default());
    }
    Ok(())
}
