//! Repository for the `records` table.
//!
//! Every method is a single statement against the pool; records are
//! inserted and read, never updated or deleted.

use medrec_core::search::contains_pattern;
use medrec_core::types::DbId;
use sqlx::PgPool;

use crate::models::record::{CreateRecord, Record, RecordListItem, RecordMatch};

/// Column list for full `records` rows.
const COLUMNS: &str = "id, diagnosis, status, note, created_at, updated_at";

/// Provides insert and query operations for medical records.
pub struct RecordRepo;

impl RecordRepo {
    /// Insert a record and return its new id.
    ///
    /// `created_at` and `updated_at` both take the statement's `NOW()`, so
    /// they are always equal.
    pub async fn create(pool: &PgPool, input: &CreateRecord) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO records (diagnosis, status, note, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) \
             RETURNING id",
        )
        .bind(&input.diagnosis)
        .bind(&input.status)
        .bind(&input.note)
        .fetch_one(pool)
        .await
    }

    /// List records whose status equals `status`, ignoring case, oldest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: &str,
    ) -> Result<Vec<RecordListItem>, sqlx::Error> {
        sqlx::query_as::<_, RecordListItem>(
            "SELECT id, diagnosis FROM records \
             WHERE LOWER(status) = LOWER($1) \
             ORDER BY id ASC",
        )
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// Find a record by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Record>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM records WHERE id = $1");
        sqlx::query_as::<_, Record>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive substring search across `diagnosis` and `note`.
    ///
    /// The term is matched literally: LIKE wildcards in it are escaped.
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<RecordMatch>, sqlx::Error> {
        let pattern = contains_pattern(term);
        sqlx::query_as::<_, RecordMatch>(
            "SELECT id, diagnosis, status, note FROM records \
             WHERE diagnosis ILIKE $1 ESCAPE '\\' OR note ILIKE $1 ESCAPE '\\' \
             ORDER BY id ASC",
        )
        .bind(&pattern)
        .fetch_all(pool)
        .await
    }

    /// Total number of stored records.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM records")
            .fetch_one(pool)
            .await
    }
}
