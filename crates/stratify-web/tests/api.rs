//! Handler-level tests against an in-memory store.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stratify_core::error::StratifyError;
use stratify_core::types::{CategoryId, FeatureVector, RawLabel};
use stratify_engine::EngineConfig;
use stratify_web::routes::api::{self, CategoryRequest, RecordRequest};
use stratify_web::{ApiError, AppState};

fn state() -> AppState {
    AppState::new(None, EngineConfig::with_k(2)).unwrap()
}

async fn seed(state: &AppState) {
    for (msi, sv, category) in [(0.1, 0.1, 1), (0.1, 0.2, 1), (5.0, 5.0, 2), (5.1, 5.1, 2)] {
        let (status, _) = api::add_record(
            State(state.clone()),
            Json(RecordRequest { msi, sv, category }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }
    for (category, name, treatment) in [
        (1, "Microsatellite stable", "Standard chemotherapy"),
        (2, "Microsatellite unstable", "Checkpoint inhibitor"),
    ] {
        api::upsert_category(
            State(state.clone()),
            Json(CategoryRequest {
                category,
                name: name.to_string(),
                description: None,
                treatment: Some(treatment.to_string()),
            }),
        )
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn predict_returns_presentation_fields() {
    let state = state();
    seed(&state).await;

    let Json(result) = api::predict(State(state.clone()), Json(FeatureVector::new(0.15, 0.15)))
        .await
        .unwrap();
    assert_eq!(result.category, CategoryId(1));

    let json = serde_json::to_value(&result).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert_eq!(json["predicted_cluster"], 1);
    assert_eq!(json["predicted_cluster_name"], "Microsatellite stable");
    assert_eq!(json["treatment_option"], "Standard chemotherapy");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_predictions_agree() {
    let state = state();
    seed(&state).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let state = state.clone();
            tokio::spawn(async move { state.predict(FeatureVector::new(5.0, 5.05)).await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.category, CategoryId(2));
        assert_eq!(result.treatment, "Checkpoint inhibitor");
    }
}

#[tokio::test]
async fn predict_on_empty_store_is_unprocessable() {
    let state = state();
    let err = api::predict(State(state), Json(FeatureVector::new(1.0, 1.0)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::Pipeline(StratifyError::InsufficientData { available: 0, k: 2 })
    ));
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn predict_rejects_non_finite_point() {
    let state = state();
    seed(&state).await;

    let err = api::predict(State(state), Json(FeatureVector::new(f64::NAN, 1.0)))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn missing_field_is_rejected_by_extractor() {
    assert!(Json::<FeatureVector>::from_bytes(br#"{"msi": 1.0}"#).is_err());
    assert!(Json::<FeatureVector>::from_bytes(br#"{"msi": 1.0, "sv": 2.0}"#).is_ok());
}

#[tokio::test]
async fn missing_metadata_falls_back_to_unknown() {
    let state = state();
    for (msi, sv, category) in [(0.0, 0.0, 7), (0.1, 0.0, 7), (9.0, 9.0, 8), (9.1, 9.0, 8)] {
        api::add_record(State(state.clone()), Json(RecordRequest { msi, sv, category }))
            .await
            .unwrap();
    }

    let Json(result) = api::predict(State(state), Json(FeatureVector::new(9.0, 9.1)))
        .await
        .unwrap();
    assert_eq!(result.category, CategoryId(8));
    assert_eq!(result.category_name, "Unknown");
    assert_eq!(result.treatment, "N/A");
}

#[tokio::test]
async fn add_record_rejects_invalid_features() {
    let state = state();
    let err = api::add_record(
        State(state),
        Json(RecordRequest {
            msi: f64::INFINITY,
            sv: 0.0,
            category: 1,
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_record_round_trip() {
    let state = state();
    let (_, Json(created)) = api::add_record(
        State(state.clone()),
        Json(RecordRequest {
            msi: 1.0,
            sv: 1.0,
            category: 1,
        }),
    )
    .await
    .unwrap();

    let status = api::delete_record(State(state.clone()), Path(created.id.to_string()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let err = api::delete_record(State(state.clone()), Path(created.id.to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let err = api::delete_record(State(state), Path("not-a-uuid".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn alignment_and_stats_reflect_store() {
    let state = state();
    seed(&state).await;

    let Json(report) = api::alignment(State(state.clone())).await.unwrap();
    assert_eq!(report.k, 2);
    assert_eq!(report.records, 4);
    assert!((report.agreement() - 1.0).abs() < 1e-12);

    let Json(stats) = api::stats(State(state.clone())).await.unwrap();
    assert_eq!(stats.records, 4);
    assert_eq!(stats.categories, 2);

    let Json(records) = api::list_records(State(state.clone())).await.unwrap();
    assert_eq!(records.len(), 4);

    let Json(categories) = api::list_categories(State(state)).await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].category, CategoryId(1));
}

#[test]
fn error_status_mapping() {
    let cases = [
        (
            ApiError::from(StratifyError::invalid_input("bad")),
            StatusCode::BAD_REQUEST,
        ),
        (
            ApiError::from(StratifyError::InsufficientData { available: 1, k: 2 }),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            ApiError::from(StratifyError::AlignmentLookup(RawLabel(1))),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            ApiError::from(StratifyError::invalid_config("k", "must be at least 1")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
        (ApiError::WorkerGone, StatusCode::SERVICE_UNAVAILABLE),
    ];
    for (err, status) in cases {
        assert_eq!(err.status(), status, "{}", err);
    }
}

#[tokio::test]
async fn failed_pipeline_task_is_a_server_error() {
    let join_err = tokio::task::spawn_blocking(|| panic!("fit aborted"))
        .await
        .unwrap_err();
    let err = ApiError::from(join_err);
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
