//! Display metadata resolution for aligned categories.

use stratify_core::metadata::MetadataSource;
use stratify_core::types::{CategoryId, CategoryMetadata};
use tracing::debug;

/// Look up metadata for `category`.
///
/// A missing row is a display concern, not a classification failure: it
/// resolves to the "Unknown" / "N/A" placeholder.
pub fn resolve<S: MetadataSource + ?Sized>(source: &S, category: CategoryId) -> CategoryMetadata {
    match source.category_metadata(category) {
        Some(meta) => meta,
        None => {
            debug!(%category, "no metadata row, using placeholder");
            CategoryMetadata::unknown(category)
        }
    }
}
