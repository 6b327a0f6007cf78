//! Well-known record statuses.
//!
//! Status is free text; these are the two values the service exposes
//! dedicated listings for. Comparisons against stored statuses ignore case.

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_RESOLVED: &str = "resolved";
