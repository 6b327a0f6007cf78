//! Request gates applied before records handlers run.
//!
//! - [`throttle::Throttled`] -- Rejects callers over the sliding-window limit.
//! - [`auth::BearerAuth`] -- Requires the configured bearer token.

pub mod auth;
pub mod throttle;
