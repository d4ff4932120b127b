//! Category metadata lookup.
//!
//! Metadata is reference data owned by an external store. The pipeline only
//! needs a key to record lookup over a snapshot that was fully loaded before
//! the request started, so the trait is synchronous and infallible.

use crate::types::{CategoryId, CategoryMetadata};
use std::collections::BTreeMap;

/// Read-only lookup of category metadata.
pub trait MetadataSource {
    /// Metadata row for `category`, if one exists.
    fn category_metadata(&self, category: CategoryId) -> Option<CategoryMetadata>;
}

impl<S: MetadataSource + ?Sized> MetadataSource for &S {
    fn category_metadata(&self, category: CategoryId) -> Option<CategoryMetadata> {
        (**self).category_metadata(category)
    }
}

/// In-memory snapshot of a metadata table.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    rows: BTreeMap<CategoryId, CategoryMetadata>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the row for `meta.category`.
    pub fn insert(&mut self, meta: CategoryMetadata) {
        self.rows.insert(meta.category, meta);
    }

    pub fn with(mut self, meta: CategoryMetadata) -> Self {
        self.insert(meta);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows ordered by category id.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryMetadata> {
        self.rows.values()
    }
}

impl FromIterator<CategoryMetadata> for MetadataTable {
    fn from_iter<I: IntoIterator<Item = CategoryMetadata>>(iter: I) -> Self {
        let mut table = MetadataTable::new();
        for meta in iter {
            table.insert(meta);
        }
        table
    }
}

impl MetadataSource for MetadataTable {
    fn category_metadata(&self, category: CategoryId) -> Option<CategoryMetadata> {
        self.rows.get(&category).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_rows_replace_earlier_ones() {
        let table: MetadataTable = vec![
            CategoryMetadata::new(CategoryId(1), "old"),
            CategoryMetadata::new(CategoryId(1), "new"),
            CategoryMetadata::new(CategoryId(2), "other"),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.len(), 2);
        assert_eq!(table.category_metadata(CategoryId(1)).unwrap().name, "new");
        assert!(table.category_metadata(CategoryId(9)).is_none());
    }
}
