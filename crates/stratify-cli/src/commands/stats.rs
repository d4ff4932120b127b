//! Show store statistics.

use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeMap;

use super::open_store;
use crate::config::Project;

pub fn run() -> Result<()> {
    let project = Project::load()?;
    let store = open_store(&project)?;
    let stats = store.stats()?;
    let names: BTreeMap<_, _> = store
        .categories()?
        .into_iter()
        .map(|m| (m.category, m.name))
        .collect();

    println!("{}", "Stratify Store Statistics".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();
    println!("  Database:          {}", project.database_path().display());
    println!("  Known records:     {}", stats.records.to_string().cyan());
    println!("  Categories:        {}", stats.categories.to_string().cyan());
    println!();

    if !stats.per_category.is_empty() {
        println!("{}", "Records per Category".blue().bold());
        for count in &stats.per_category {
            let name = names
                .get(&count.category)
                .map(String::as_str)
                .unwrap_or("(no metadata)");
            println!(
                "  {:>4}  {:<28} {}",
                count.category,
                name,
                count.records.to_string().cyan()
            );
        }
        println!();
    }

    let k = project.config.engine.k;
    if stats.records < k {
        println!(
            "  {} {} records cannot support k = {}",
            "!".yellow().bold(),
            stats.records,
            k
        );
    }

    println!("{}", "═".repeat(40).dimmed());
    Ok(())
}
