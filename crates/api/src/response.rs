//! Shared response envelope types for API handlers.
//!
//! Every response carries a boolean `success` flag. Successful responses
//! wrap their payload in one of the envelopes below; failures are produced
//! by [`AppError`](crate::error::AppError) as
//! `{ "success": false, "code": ..., "error": ... }`.

use serde::Serialize;

/// Standard `{ "success": true, "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse::new(record)))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{ "success": true, "count": n, "problems": [...] }` -- status listings.
#[derive(Debug, Serialize)]
pub struct ProblemListResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    pub problems: Vec<T>,
}

impl<T: Serialize> ProblemListResponse<T> {
    pub fn new(problems: Vec<T>) -> Self {
        Self {
            success: true,
            count: problems.len(),
            problems,
        }
    }
}

/// `{ "success": true, "count": n, "query": q, "results": [...] }` -- search.
#[derive(Debug, Serialize)]
pub struct SearchResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    pub query: String,
    pub results: Vec<T>,
}

impl<T: Serialize> SearchResponse<T> {
    pub fn new(query: String, results: Vec<T>) -> Self {
        Self {
            success: true,
            count: results.len(),
            query,
            results,
        }
    }
}
