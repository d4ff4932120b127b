//! Show how raw clusters align to categories.

use anyhow::Result;
use colored::Colorize;

use super::{engine, open_store};
use crate::config::Project;

pub fn run(k: Option<usize>) -> Result<()> {
    let project = Project::load()?;
    let engine = engine(&project.config.engine, k)?;
    let store = open_store(&project)?;
    let known = store.known_records()?;

    let report = engine.describe(&known)?;

    println!("{}", "Cluster Alignment".white().bold());
    println!("{}", "═".repeat(60).dimmed());
    println!(
        "  k = {}, {} records, inertia {:.4}, {} iterations{}",
        report.k,
        report.records,
        report.inertia,
        report.iterations,
        if report.converged { "" } else { " (not converged)" }
    );
    println!();

    println!(
        "  {:<8} {:>20} {:>8} {:>9} {:>7}",
        "CLUSTER".bold(),
        "CENTROID".bold(),
        "MEMBERS".bold(),
        "CATEGORY".bold(),
        "PURITY".bold()
    );
    for cluster in &report.clusters {
        let centroid = format!("({:.3}, {:.3})", cluster.centroid.msi, cluster.centroid.sv);
        let category = match cluster.category {
            Some(c) => c.to_string().cyan(),
            None => "-".red(),
        };
        println!(
            "  {:<8} {:>20} {:>8} {:>9} {:>6.1}%",
            cluster.raw_label,
            centroid,
            cluster.members,
            category,
            cluster.purity() * 100.0
        );
    }

    println!();
    println!("  Agreement: {:.1}%", report.agreement() * 100.0);
    if report.has_empty_clusters() {
        let labels: Vec<String> = report.unaligned.iter().map(|l| l.to_string()).collect();
        println!(
            "  {} no known records in {}; predictions landing there will fail",
            "!".yellow().bold(),
            labels.join(", ")
        );
    }
    println!("{}", "═".repeat(60).dimmed());

    Ok(())
}
