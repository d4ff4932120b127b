//! # Stratify Store
//!
//! SQLite storage for the data the alignment pipeline reads:
//!
//! | Table | Columns | Role |
//! |-------|---------|------|
//! | `patients` | `id`, `msi`, `sv`, `category` | known records (ground truth) |
//! | `categories` | `category`, `name`, `description`, `resolution` | display metadata |
//!
//! The store only hands out fully materialized snapshots
//! (`Vec<KnownRecord>`, [`MetadataTable`](stratify_core::metadata::MetadataTable)).
//! The engine never touches the database.
//!
//! ```rust
//! use stratify_core::prelude::*;
//! use stratify_store::SqliteStore;
//!
//! let store = SqliteStore::new_in_memory().unwrap();
//! store.insert_record(&KnownRecord::from_parts(0.1, 0.2, 1)).unwrap();
//! store
//!     .upsert_category(&CategoryMetadata::new(CategoryId(1), "Stable"))
//!     .unwrap();
//!
//! assert_eq!(store.known_records().unwrap().len(), 1);
//! assert_eq!(store.metadata_table().unwrap().len(), 1);
//! ```

pub mod error;
pub mod sqlite;

pub use error::{StoreError, StoreResult};
pub use sqlite::{CategoryCount, SqliteStore, StoreStats, StoredRecord};
