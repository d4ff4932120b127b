//! Stratify CLI - biomarker category prediction from the command line.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "stratify")]
#[command(author, version, about = "Stratify - predict patient categories from biomarkers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new Stratify project
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Manage known patient records
    Record {
        #[command(subcommand)]
        command: RecordCommands,
    },

    /// Manage category metadata
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Predict the category of a new patient
    Predict {
        /// Microsatellite-instability count
        #[arg(long, allow_negative_numbers = true)]
        msi: f64,

        /// Structural-variation count
        #[arg(long, allow_negative_numbers = true)]
        sv: f64,

        /// Number of clusters (overrides stratify.toml)
        #[arg(short, long)]
        k: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how raw clusters align to categories
    Align {
        /// Number of clusters (overrides stratify.toml)
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Show store statistics
    Stats,
}

#[derive(Subcommand)]
enum RecordCommands {
    /// Add a known record
    Add {
        #[arg(long, allow_negative_numbers = true)]
        msi: f64,

        #[arg(long, allow_negative_numbers = true)]
        sv: f64,

        /// Known category id
        #[arg(short, long)]
        category: u32,
    },

    /// List known records
    List,

    /// Remove a known record
    Remove {
        /// Record id
        id: String,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Insert or replace category metadata
    Add {
        /// Category id
        #[arg(long)]
        id: u32,

        /// Display name
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Recommended treatment
        #[arg(short, long)]
        treatment: Option<String>,
    },

    /// List category metadata
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Record { command } => match command {
            RecordCommands::Add { msi, sv, category } => commands::record::add(msi, sv, category),
            RecordCommands::List => commands::record::list(),
            RecordCommands::Remove { id } => commands::record::remove(&id),
        },
        Commands::Category { command } => match command {
            CategoryCommands::Add {
                id,
                name,
                description,
                treatment,
            } => commands::category::add(id, name, description, treatment),
            CategoryCommands::List => commands::category::list(),
        },
        Commands::Predict { msi, sv, k, json } => commands::predict::run(msi, sv, k, json),
        Commands::Align { k } => commands::align::run(k),
        Commands::Stats => commands::stats::run(),
    }
}
