pub mod health;
pub mod records;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /records                       list by ?status=, create
/// /records/active                list active
/// /records/resolved              list resolved
/// /records/search                search by ?q=
/// /records/{id}                  get
/// /records/{id}/summary          plain-language summary
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/records", records::router())
}
