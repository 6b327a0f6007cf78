use std::sync::Arc;

use medrec_core::summary::PhraseTable;

use crate::config::ServerConfig;
use crate::middleware::throttle::RateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: medrec_db::DbPool,
    /// Server configuration (read by the auth gate and the router).
    pub config: Arc<ServerConfig>,
    /// Per-caller request windows for the throttling gate.
    pub rate_limiter: Arc<RateLimiter>,
    /// Phrase table used to build note summaries. Read-only after startup.
    pub phrases: Arc<PhraseTable>,
}

impl AppState {
    /// Assemble state from a pool and configuration, with a fresh rate
    /// limiter and the given phrase table.
    pub fn new(pool: medrec_db::DbPool, config: ServerConfig, phrases: PhraseTable) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit));
        Self {
            pool,
            config: Arc::new(config),
            rate_limiter,
            phrases: Arc::new(phrases),
        }
    }
}
