//! REST API endpoints.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use stratify_core::error::StratifyError;
use stratify_core::types::{
    CategoryId, CategoryMetadata, FeatureVector, KnownRecord, PredictionResult, RecordId,
};
use stratify_engine::AlignmentReport;
use stratify_store::{StoreStats, StoredRecord};

/// Classify a point against a fit over the current known records.
///
/// Body: `{"msi": <number>, "sv": <number>}`; both fields are required.
pub async fn predict(
    State(state): State<AppState>,
    Json(point): Json<FeatureVector>,
) -> Result<Json<PredictionResult>, ApiError> {
    // Reject the point before touching the store.
    point.validate()?;
    Ok(Json(state.predict(point).await?))
}

/// List all known records.
pub async fn list_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    Ok(Json(state.records().await?))
}

/// New record body.
#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub msi: f64,
    pub sv: f64,
    pub category: u32,
}

/// Created record response.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: RecordId,
}

/// Add a known record.
pub async fn add_record(
    State(state): State<AppState>,
    Json(req): Json<RecordRequest>,
) -> Result<(StatusCode, Json<RecordResponse>), ApiError> {
    let record = KnownRecord::from_parts(req.msi, req.sv, req.category);
    let id = state.add_record(record).await?;
    Ok((StatusCode::CREATED, Json(RecordResponse { id })))
}

/// Remove a known record.
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_record_id(&id)?;
    if state.delete_record(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("record {}", id)))
    }
}

/// List category metadata.
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryMetadata>>, ApiError> {
    Ok(Json(state.categories().await?))
}

/// Category metadata body. Accepts `treatment` or the table's `resolution`.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub category: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "resolution")]
    pub treatment: Option<String>,
}

/// Insert or replace category metadata.
pub async fn upsert_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<CategoryMetadata>, ApiError> {
    let meta = CategoryMetadata {
        category: CategoryId(req.category),
        name: req.name,
        description: req.description,
        treatment: req.treatment,
    };
    state.upsert_category(meta.clone()).await?;
    Ok(Json(meta))
}

/// Alignment of raw clusters to categories for the current data.
pub async fn alignment(State(state): State<AppState>) -> Result<Json<AlignmentReport>, ApiError> {
    Ok(Json(state.alignment().await?))
}

/// Store statistics.
pub async fn stats(State(state): State<AppState>) -> Result<Json<StoreStats>, ApiError> {
    Ok(Json(state.stats().await?))
}

fn parse_record_id(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse::<RecordId>().map_err(|e| {
        StratifyError::invalid_input(format!("bad record id {:?}: {}", raw, e)).into()
    })
}
