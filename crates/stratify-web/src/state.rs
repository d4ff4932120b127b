//! Application state for the web server.
//!
//! The SQLite connection lives on a dedicated thread. Handlers send commands
//! over a channel and get fully materialized snapshots back. The k-means fit
//! over a snapshot runs on tokio's blocking pool, never on an executor thread.

use crate::error::ApiError;
use anyhow::{Context, Result};
use std::sync::mpsc;
use std::thread;
use stratify_core::metadata::MetadataTable;
use stratify_core::error::StratifyError;
use stratify_core::types::{
    CategoryMetadata, FeatureVector, KnownRecord, PredictionResult, RecordId,
};
use stratify_engine::{AlignmentReport, ClusterEngine, EngineConfig};
use stratify_store::{SqliteStore, StoreResult, StoreStats, StoredRecord};
use tokio::sync::oneshot;

/// Known records and metadata read in one go for a single request.
pub struct Snapshot {
    pub known: Vec<KnownRecord>,
    pub metadata: MetadataTable,
}

/// Commands sent to the store worker thread.
enum StoreCommand {
    Snapshot(oneshot::Sender<StoreResult<Snapshot>>),
    ListRecords(oneshot::Sender<StoreResult<Vec<StoredRecord>>>),
    AddRecord(KnownRecord, oneshot::Sender<StoreResult<RecordId>>),
    DeleteRecord(RecordId, oneshot::Sender<StoreResult<bool>>),
    ListCategories(oneshot::Sender<StoreResult<Vec<CategoryMetadata>>>),
    UpsertCategory(CategoryMetadata, oneshot::Sender<StoreResult<()>>),
    Stats(oneshot::Sender<StoreResult<StoreStats>>),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Channel to send commands to the store worker.
    cmd_tx: mpsc::Sender<StoreCommand>,
    engine: ClusterEngine,
}

impl AppState {
    /// Open the store (in-memory when `db_path` is `None`) and start its worker.
    pub fn new(db_path: Option<&str>, config: EngineConfig) -> Result<Self> {
        let engine = ClusterEngine::new(config).context("Invalid engine configuration")?;
        let store = match db_path {
            Some(path) => SqliteStore::open(path)
                .with_context(|| format!("Failed to open database: {}", path))?,
            None => SqliteStore::new_in_memory().context("Failed to create in-memory database")?,
        };

        let (cmd_tx, cmd_rx) = mpsc::channel();

        // Spawn dedicated thread for store operations
        thread::Builder::new()
            .name("stratify-store".into())
            .spawn(move || run_worker(store, cmd_rx))
            .context("Failed to spawn store worker")?;

        Ok(Self { cmd_tx, engine })
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<StoreResult<T>>) -> StoreCommand,
    ) -> Result<T, ApiError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx.send(make(tx)).map_err(|_| ApiError::WorkerGone)?;
        let reply = rx.await.map_err(|_| ApiError::WorkerGone)?;
        Ok(reply?)
    }

    /// Fit over the current snapshot and classify `point`.
    pub async fn predict(&self, point: FeatureVector) -> Result<PredictionResult, ApiError> {
        let snapshot = self.snapshot().await?;
        self.run_engine(move |engine| {
            engine.handle_predict(&snapshot.known, &point, &snapshot.metadata)
        })
        .await
    }

    /// Alignment report for the current known records.
    pub async fn alignment(&self) -> Result<AlignmentReport, ApiError> {
        let snapshot = self.snapshot().await?;
        self.run_engine(move |engine| engine.describe(&snapshot.known))
            .await
    }

    async fn run_engine<T, F>(&self, job: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&ClusterEngine) -> Result<T, StratifyError> + Send + 'static,
    {
        let engine = self.engine.clone();
        let result = tokio::task::spawn_blocking(move || job(&engine)).await?;
        Ok(result?)
    }

    /// Current known records and metadata.
    pub async fn snapshot(&self) -> Result<Snapshot, ApiError> {
        self.request(StoreCommand::Snapshot).await
    }

    pub async fn records(&self) -> Result<Vec<StoredRecord>, ApiError> {
        self.request(StoreCommand::ListRecords).await
    }

    pub async fn add_record(&self, record: KnownRecord) -> Result<RecordId, ApiError> {
        self.request(|tx| StoreCommand::AddRecord(record, tx)).await
    }

    pub async fn delete_record(&self, id: RecordId) -> Result<bool, ApiError> {
        self.request(|tx| StoreCommand::DeleteRecord(id, tx)).await
    }

    pub async fn categories(&self) -> Result<Vec<CategoryMetadata>, ApiError> {
        self.request(StoreCommand::ListCategories).await
    }

    pub async fn upsert_category(&self, meta: CategoryMetadata) -> Result<(), ApiError> {
        self.request(|tx| StoreCommand::UpsertCategory(meta, tx)).await
    }

    pub async fn stats(&self) -> Result<StoreStats, ApiError> {
        self.request(StoreCommand::Stats).await
    }
}

fn run_worker(store: SqliteStore, cmd_rx: mpsc::Receiver<StoreCommand>) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            StoreCommand::Snapshot(response) => {
                let snapshot = store.known_records().and_then(|known| {
                    Ok(Snapshot {
                        known,
                        metadata: store.metadata_table()?,
                    })
                });
                let _ = response.send(snapshot);
            }
            StoreCommand::ListRecords(response) => {
                let _ = response.send(store.stored_records());
            }
            StoreCommand::AddRecord(record, response) => {
                let _ = response.send(store.insert_record(&record));
            }
            StoreCommand::DeleteRecord(id, response) => {
                let _ = response.send(store.delete_record(&id));
            }
            StoreCommand::ListCategories(response) => {
                let _ = response.send(store.categories());
            }
            StoreCommand::UpsertCategory(meta, response) => {
                let _ = response.send(store.upsert_category(&meta));
            }
            StoreCommand::Stats(response) => {
                let _ = response.send(store.stats());
            }
        }
    }
    tracing::debug!("store worker stopped");
}
