//! Handlers for medical records.
//!
//! Provides endpoints for creating records, listing them by status,
//! fetching one record or its plain-language summary, and free-text search.
//! Every endpoint passes the throttling gate and then the bearer-token gate.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use medrec_core::error::CoreError;
use medrec_core::record_status::{STATUS_ACTIVE, STATUS_RESOLVED};
use medrec_core::record_validation::{
    parse_record_id, require_non_blank, validate_record_payload, validate_search_term,
    RecordPayload,
};
use medrec_core::types::DbId;
use medrec_db::models::record::{CreateRecord, Record};
use medrec_db::repositories::RecordRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::BearerAuth;
use crate::middleware::throttle::Throttled;
use crate::response::{DataResponse, ProblemListResponse, SearchResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter and response structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /records`.
#[derive(Debug, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
}

/// Query parameters for `GET /records/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Payload returned after a successful create.
#[derive(Debug, Serialize)]
pub struct CreatedRecord {
    pub id: DbId,
}

/// Payload returned by the summary endpoint.
#[derive(Debug, Serialize)]
pub struct RecordSummary {
    pub id: DbId,
    pub original_note: String,
    pub ai_summary: String,
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/v1/records
///
/// Validate and store a new record. Returns the assigned id.
pub async fn create_record(
    _throttle: Throttled,
    _auth: BearerAuth,
    State(state): State<AppState>,
    payload: Result<Json<RecordPayload>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload?;

    let fields = validate_record_payload(&payload).inspect_err(|err| {
        tracing::info!(reason = %err, "Record rejected");
    })?;

    let input = CreateRecord::from(fields);
    let id = RecordRepo::create(&state.pool, &input).await?;

    tracing::info!(record_id = id, status = %input.status, "Record created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(CreatedRecord { id })),
    ))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/v1/records/active
pub async fn list_active(
    _throttle: Throttled,
    _auth: BearerAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    list_with_status(&state, STATUS_ACTIVE).await
}

/// GET /api/v1/records/resolved
pub async fn list_resolved(
    _throttle: Throttled,
    _auth: BearerAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    list_with_status(&state, STATUS_RESOLVED).await
}

/// GET /api/v1/records?status=
///
/// List records with an arbitrary status, compared case-insensitively.
pub async fn list_records(
    _throttle: Throttled,
    _auth: BearerAuth,
    State(state): State<AppState>,
    params: Result<Query<StatusFilterParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let status = require_non_blank("status", params.status.as_deref())?;
    list_with_status(&state, &status).await
}

async fn list_with_status(state: &AppState, status: &str) -> AppResult<impl IntoResponse> {
    let problems = RecordRepo::list_by_status(&state.pool, status).await?;

    tracing::debug!(status, count = problems.len(), "Listed records by status");

    Ok(Json(ProblemListResponse::new(problems)))
}

// ---------------------------------------------------------------------------
// Single record
// ---------------------------------------------------------------------------

/// GET /api/v1/records/{id}
pub async fn get_record(
    _throttle: Throttled,
    _auth: BearerAuth,
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(raw_id) = raw_id?;
    let record = find_record(&state, &raw_id).await?;

    Ok(Json(DataResponse::new(record)))
}

/// GET /api/v1/records/{id}/summary
///
/// Return the record's note alongside its plain-language rewrite.
pub async fn get_summary(
    _throttle: Throttled,
    _auth: BearerAuth,
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(raw_id) = raw_id?;
    let record = find_record(&state, &raw_id).await?;
    let ai_summary = state.phrases.summarize(&record.note);

    Ok(Json(DataResponse::new(RecordSummary {
        id: record.id,
        original_note: record.note,
        ai_summary,
    })))
}

async fn find_record(state: &AppState, raw_id: &str) -> AppResult<Record> {
    let id = parse_record_id(raw_id)?;

    RecordRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Record",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// GET /api/v1/records/search?q=
///
/// Case-insensitive substring search over diagnosis and note.
pub async fn search_records(
    _throttle: Throttled,
    _auth: BearerAuth,
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let query = validate_search_term(params.q.as_deref())?;
    let results = RecordRepo::search(&state.pool, &query).await?;

    tracing::debug!(%query, count = results.len(), "Searched records");

    Ok(Json(SearchResponse::new(query, results)))
}
