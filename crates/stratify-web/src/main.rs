//! Stratify Web - biomarker category prediction API.

use anyhow::Result;
use clap::Parser;
use stratify_engine::EngineConfig;
use stratify_web::{routes, AppState};

#[derive(Parser, Debug)]
#[command(name = "stratify-web")]
#[command(about = "Stratify Web - biomarker category prediction API")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Path to SQLite database (in-memory when omitted)
    #[arg(short, long)]
    db: Option<String>,

    /// Number of clusters fitted per request
    #[arg(short, long, default_value = "2")]
    k: usize,

    /// Seed for centroid initialization
    #[arg(long, default_value = "42")]
    seed: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let addr = format!("{}:{}", cli.host, cli.port);

    let config = EngineConfig::with_k(cli.k).seed(cli.seed);
    let state = AppState::new(cli.db.as_deref(), config)?;

    let app = routes::create_router(state);

    tracing::info!(%addr, k = cli.k, "starting Stratify API");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
