//! Manage known patient records.

use anyhow::{Context, Result};
use colored::Colorize;
use stratify_core::types::{KnownRecord, RecordId};

use super::open_store;
use crate::config::Project;

pub fn add(msi: f64, sv: f64, category: u32) -> Result<()> {
    let project = Project::load()?;
    let store = open_store(&project)?;

    let id = store.insert_record(&KnownRecord::from_parts(msi, sv, category))?;
    println!(
        "{} Added record {} (msi {}, sv {}, category {})",
        "✓".green(),
        id.to_string().cyan(),
        msi,
        sv,
        category
    );
    Ok(())
}

pub fn list() -> Result<()> {
    let project = Project::load()?;
    let store = open_store(&project)?;
    let records = store.stored_records()?;

    if records.is_empty() {
        println!("{}", "No known records.".yellow());
        return Ok(());
    }

    println!(
        "{:<38} {:>10} {:>10} {:>9}",
        "ID".bold(),
        "MSI".bold(),
        "SV".bold(),
        "CATEGORY".bold()
    );
    for record in &records {
        println!(
            "{:<38} {:>10.4} {:>10.4} {:>9}",
            record.id, record.msi, record.sv, record.category
        );
    }
    println!();
    println!("{} records", records.len().to_string().cyan());
    Ok(())
}

pub fn remove(raw_id: &str) -> Result<()> {
    let id: RecordId = raw_id
        .parse()
        .with_context(|| format!("Invalid record id: {}", raw_id))?;

    let project = Project::load()?;
    let store = open_store(&project)?;

    if store.delete_record(&id)? {
        println!("{} Removed record {}", "✓".green(), id.to_string().cyan());
    } else {
        println!("{} No record {}", "•".yellow(), id);
    }
    Ok(())
}
