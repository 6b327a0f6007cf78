//! Medical record rows, projections and the create DTO.

use medrec_core::record_validation::RecordFields;
use medrec_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A full row from the `records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Record {
    pub id: DbId,
    pub diagnosis: String,
    pub status: String,
    pub note: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Listing projection returned by status filters.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecordListItem {
    pub id: DbId,
    pub diagnosis: String,
}

/// Search projection: everything except the audit columns.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecordMatch {
    pub id: DbId,
    pub diagnosis: String,
    pub status: String,
    pub note: String,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Validated input for inserting a record. Values are stored verbatim, so
/// callers must trim them first (see [`RecordFields`]).
#[derive(Debug, Clone)]
pub struct CreateRecord {
    pub diagnosis: String,
    pub status: String,
    pub note: String,
}

impl From<RecordFields> for CreateRecord {
    fn from(fields: RecordFields) -> Self {
        Self {
            diagnosis: fields.diagnosis,
            status: fields.status,
            note: fields.note,
        }
    }
}
