//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` structs matching the rows (or projections) a
//!   repository returns
//! - A create DTO holding already-validated input for inserts

pub mod record;
