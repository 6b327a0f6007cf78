//! Route definitions for medical records.

use axum::routing::get;
use axum::Router;

use crate::handlers::records;
use crate::state::AppState;

/// Record routes mounted at `/records`.
///
/// ```text
/// GET    /                  -> list_records (?status=)
/// POST   /                  -> create_record
/// GET    /active            -> list_active
/// GET    /resolved          -> list_resolved
/// GET    /search            -> search_records (?q=)
/// GET    /{id}              -> get_record
/// GET    /{id}/summary      -> get_summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(records::list_records).post(records::create_record),
        )
        .route("/active", get(records::list_active))
        .route("/resolved", get(records::list_resolved))
        .route("/search", get(records::search_records))
        .route("/{id}", get(records::get_record))
        .route("/{id}/summary", get(records::get_summary))
}
