//! SQLite-backed record and metadata store.
//!
//! Supports both in-memory and file-backed databases. Records are returned in
//! insertion order so that repeated fits over an unchanged table see the same
//! input sequence.

use crate::error::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;
use stratify_core::error::StratifyError;
use stratify_core::metadata::MetadataTable;
use stratify_core::types::{CategoryId, CategoryMetadata, FeatureVector, KnownRecord, RecordId};
use tracing::{debug, info};
use uuid::Uuid;

/// A known record together with its store identifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: RecordId,
    pub msi: f64,
    pub sv: f64,
    pub category: CategoryId,
}

impl StoredRecord {
    pub fn known(&self) -> KnownRecord {
        KnownRecord::new(FeatureVector::new(self.msi, self.sv), self.category)
    }
}

/// Record count for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: CategoryId,
    pub records: usize,
}

/// Table sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub records: usize,
    pub categories: usize,
    pub per_category: Vec<CategoryCount>,
}

/// SQLite store of patients and category metadata.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new in-memory store.
    pub fn new_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_with_connection(conn)
    }

    /// Create or open a file-backed store.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "opened record store");
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> StoreResult<Self> {
        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS patients (
                id TEXT PRIMARY KEY,
                msi REAL NOT NULL,
                sv REAL NOT NULL,
                category INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS categories (
                category INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                resolution TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_patients_category ON patients(category);
            "#,
        )?;

        Ok(Self { conn })
    }

    /// Store one known record.
    pub fn insert_record(&self, record: &KnownRecord) -> StoreResult<RecordId> {
        validate_record(record)?;
        let id = RecordId::new();
        self.conn.execute(
            "INSERT INTO patients (id, msi, sv, category) VALUES (?1, ?2, ?3, ?4)",
            params![
                id.0.to_string(),
                record.features.msi,
                record.features.sv,
                record.category.as_u32(),
            ],
        )?;
        debug!(%id, category = %record.category, "record inserted");
        Ok(id)
    }

    /// Store several records in one transaction. Nothing is written if any
    /// record is rejected.
    pub fn insert_records(&mut self, records: &[KnownRecord]) -> StoreResult<Vec<RecordId>> {
        for record in records {
            validate_record(record)?;
        }

        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(records.len());
        {
            let mut stmt =
                tx.prepare("INSERT INTO patients (id, msi, sv, category) VALUES (?1, ?2, ?3, ?4)")?;
            for record in records {
                let id = RecordId::new();
                stmt.execute(params![
                    id.0.to_string(),
                    record.features.msi,
                    record.features.sv,
                    record.category.as_u32(),
                ])?;
                ids.push(id);
            }
        }
        tx.commit()?;

        info!(count = ids.len(), "records inserted");
        Ok(ids)
    }

    /// Remove a record. Returns whether it existed.
    pub fn delete_record(&self, id: &RecordId) -> StoreResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?1", params![id.0.to_string()])?;
        Ok(removed > 0)
    }

    /// All records with their identifiers, in insertion order.
    pub fn stored_records(&self) -> StoreResult<Vec<StoredRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, msi, sv, category FROM patients ORDER BY rowid")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, msi, sv, category)| {
                let id = Uuid::parse_str(&id).map_err(|e| StoreError::Corrupt {
                    table: "patients",
                    reason: format!("bad id {:?}: {}", id, e),
                })?;
                Ok(StoredRecord {
                    id: RecordId(id),
                    msi,
                    sv,
                    category: category_from_sql("patients", category)?,
                })
            })
            .collect()
    }

    /// Snapshot of every known record, in insertion order.
    pub fn known_records(&self) -> StoreResult<Vec<KnownRecord>> {
        Ok(self
            .stored_records()?
            .iter()
            .map(StoredRecord::known)
            .collect())
    }

    /// Insert or replace the metadata row of `meta.category`.
    pub fn upsert_category(&self, meta: &CategoryMetadata) -> StoreResult<()> {
        validate_category(meta.category)?;
        if meta.name.trim().is_empty() {
            return Err(StratifyError::invalid_input("category name must not be empty").into());
        }
        self.conn.execute(
            "INSERT OR REPLACE INTO categories (category, name, description, resolution)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                meta.category.as_u32(),
                meta.name,
                meta.description,
                meta.treatment,
            ],
        )?;
        debug!(category = %meta.category, name = %meta.name, "category stored");
        Ok(())
    }

    /// Metadata row for one category.
    pub fn category(&self, category: CategoryId) -> StoreResult<Option<CategoryMetadata>> {
        let row = self
            .conn
            .query_row(
                "SELECT category, name, description, resolution FROM categories WHERE category = ?1",
                params![category.as_u32()],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(metadata_from_row).transpose()
    }

    /// Every metadata row, ordered by category id.
    pub fn categories(&self) -> StoreResult<Vec<CategoryMetadata>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, name, description, resolution FROM categories ORDER BY category",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(metadata_from_row).collect()
    }

    /// Snapshot of the metadata table for the prediction pipeline.
    pub fn metadata_table(&self) -> StoreResult<MetadataTable> {
        Ok(self.categories()?.into_iter().collect())
    }

    /// Get database statistics.
    pub fn stats(&self) -> StoreResult<StoreStats> {
        let records: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        let categories: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;

        let mut stmt = self.conn.prepare(
            "SELECT category, COUNT(*) FROM patients GROUP BY category ORDER BY category",
        )?;
        let counts = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let per_category = counts
            .into_iter()
            .map(|(category, n)| {
                Ok(CategoryCount {
                    category: category_from_sql("patients", category)?,
                    records: n as usize,
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(StoreStats {
            records: records as usize,
            categories: categories as usize,
            per_category,
        })
    }
}

fn validate_category(category: CategoryId) -> StoreResult<()> {
    if category.as_u32() == 0 {
        return Err(StratifyError::invalid_input("category id must be positive").into());
    }
    Ok(())
}

fn validate_record(record: &KnownRecord) -> StoreResult<()> {
    record.features.validate()?;
    validate_category(record.category)
}

fn category_from_sql(table: &'static str, value: i64) -> StoreResult<CategoryId> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .map(CategoryId)
        .ok_or_else(|| StoreError::Corrupt {
            table,
            reason: format!("category {} is not a positive 32-bit id", value),
        })
}

fn metadata_from_row(
    (category, name, description, resolution): (i64, String, Option<String>, Option<String>),
) -> StoreResult<CategoryMetadata> {
    Ok(CategoryMetadata {
        category: category_from_sql("categories", category)?,
        name,
        description,
        treatment: resolution,
    })
}
