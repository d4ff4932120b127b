//! Initialize a new Stratify project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use stratify_store::SqliteStore;

use crate::config::{Config, Project, CONFIG_FILE};

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing Stratify project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    // Create default config, or keep the existing one
    let config_path = base_path.join(CONFIG_FILE);
    let config = if !config_path.exists() {
        let config = Config::default();
        config.save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
        config
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
        Config::read(&config_path)?
    };

    let project = Project {
        root: base_path,
        config,
    };

    let db_path = project.database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;

        let gitignore_path = parent.join(".gitignore");
        if parent != project.root && !gitignore_path.exists() {
            std::fs::write(&gitignore_path, "*.db\n*.db-wal\n*.db-shm\n")?;
            println!("  {} Created {}", "✓".green(), gitignore_path.display());
        }
    }

    SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to create database: {}", db_path.display()))?;
    println!("  {} Database ready at {}", "✓".green(), db_path.display());

    println!();
    println!("{} Stratify project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  {} stratify category add --id 1 --name \"...\" --treatment \"...\"",
        "1.".blue()
    );
    println!(
        "  {} stratify record add --msi <n> --sv <n> --category 1",
        "2.".blue()
    );
    println!("  {} stratify predict --msi <n> --sv <n>", "3.".blue());

    Ok(())
}
