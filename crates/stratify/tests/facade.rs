//! The facade prelude is enough to run the whole pipeline.

use stratify::prelude::*;

#[test]
fn store_to_prediction_through_prelude() {
    let mut store = SqliteStore::new_in_memory().unwrap();
    store
        .insert_records(&[
            KnownRecord::from_parts(1.0, 1.0, 3),
            KnownRecord::from_parts(1.2, 0.9, 3),
            KnownRecord::from_parts(1.1, 1.1, 4),
            KnownRecord::from_parts(8.0, 9.0, 5),
            KnownRecord::from_parts(8.2, 9.1, 5),
        ])
        .unwrap();
    store
        .upsert_category(&CategoryMetadata::new(CategoryId(5), "High SV").with_treatment("PARP inhibitor"))
        .unwrap();

    let engine = ClusterEngine::with_k(2).unwrap();
    let known = store.known_records().unwrap();
    let metadata = store.metadata_table().unwrap();

    let high = engine
        .handle_predict(&known, &FeatureVector::new(7.9, 8.8), &metadata)
        .unwrap();
    assert_eq!(high.category, CategoryId(5));
    assert_eq!(high.treatment, "PARP inhibitor");

    // Majority of the low cluster is category 3; it has no metadata row.
    let low = engine
        .handle_predict(&known, &FeatureVector::new(1.0, 1.0), &metadata)
        .unwrap();
    assert_eq!(low.category, CategoryId(3));
    assert_eq!(low.category_name, UNKNOWN_CATEGORY_NAME);

    let json = serde_json::to_value(&low).unwrap();
    assert_eq!(json["treatment_option"], NO_TREATMENT);
}

#[test]
fn version_matches_workspace() {
    assert_eq!(stratify::VERSION, "1.0.0");
}
