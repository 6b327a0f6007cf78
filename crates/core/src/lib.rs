//! Domain logic for the medical record service.
//!
//! Nothing here touches the network or the database. The `db`
//! crate persists what this crate validates, and the `api` crate wires both
//! together behind HTTP handlers.

pub mod error;
pub mod record_status;
pub mod record_validation;
pub mod search;
pub mod summary;
pub mod types;
