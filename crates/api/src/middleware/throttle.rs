//! Per-caller sliding-window rate limiting.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::state::AppState;

/// Interval between sweeps of idle callers (in seconds).
const SWEEP_INTERVAL_SECS: u64 = 60;

/// Caller key used when neither a forwarded address nor a peer address is
/// available.
pub const UNKNOWN_CALLER: &str = "unknown";

/// Sliding-window limits.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Requests allowed per caller within one window. `0` disables limiting.
    pub max_requests: u32,
    /// Window length in seconds.
    pub window_secs: u64,
    /// Key callers by `X-Forwarded-For`. Only safe behind a proxy that
    /// overwrites the header.
    pub trust_forwarded_for: bool,
}

/// Tracks recent request instants per caller.
///
/// Thread-safe via interior `Mutex`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests as usize,
            window: Duration::from_secs(config.window_secs),
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_requests > 0
    }

    /// Record a request from `caller`.
    ///
    /// Returns `Err(wait)` without recording anything when the caller already
    /// used its quota; `wait` is the time until the oldest hit leaves the
    /// window.
    pub async fn check(&self, caller: &str) -> Result<(), Duration> {
        self.check_at(caller, Instant::now()).await
    }

    async fn check_at(&self, caller: &str, now: Instant) -> Result<(), Duration> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut hits = self.hits.lock().await;
        let window = hits.entry(caller.to_string()).or_default();
        evict_expired(window, now, self.window);

        if window.len() >= self.max_requests {
            let wait = window
                .front()
                .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(self.window);
            return Err(wait);
        }

        window.push_back(now);
        Ok(())
    }

    /// Drop callers with no hits inside the window. Returns how many callers
    /// are still tracked.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(Instant::now()).await
    }

    async fn sweep_at(&self, now: Instant) -> usize {
        let mut hits = self.hits.lock().await;
        hits.retain(|_, window| {
            evict_expired(window, now, self.window);
            !window.is_empty()
        });
        hits.len()
    }
}

fn evict_expired(window: &mut VecDeque<Instant>, now: Instant, length: Duration) {
    while let Some(oldest) = window.front() {
        if now.duration_since(*oldest) >= length {
            window.pop_front();
        } else {
            break;
        }
    }
}

/// Spawn a background task that periodically drops idle callers from the
/// limiter.
///
/// The returned `JoinHandle` can be used to abort the task during shutdown.
pub fn start_sweeper(limiter: Arc<RateLimiter>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let tracked = limiter.sweep().await;
            tracing::debug!(tracked, "Rate limiter sweep");
        }
    })
}

/// Identify the caller: the first `X-Forwarded-For` entry when
/// `trust_forwarded_for` is set, else the peer address, else
/// [`UNKNOWN_CALLER`].
pub fn caller_key(parts: &Parts, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(addr) = forwarded {
            return addr.to_string();
        }
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CALLER.to_string())
}

/// Extractor that admits the request only if its caller is under the rate
/// limit. Place it before [`BearerAuth`](crate::middleware::auth::BearerAuth)
/// so throttling applies to unauthenticated traffic too.
#[derive(Debug, Clone, Copy)]
pub struct Throttled;

impl FromRequestParts<AppState> for Throttled {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let caller = caller_key(parts, state.config.rate_limit.trust_forwarded_for);

        state.rate_limiter.check(&caller).await.map_err(|wait| {
            tracing::warn!(
                %caller,
                retry_after_ms = wait.as_millis() as u64,
                "Rate limit exceeded"
            );
            AppError::RateLimited {
                retry_after_secs: ceil_secs(wait),
            }
        })?;

        Ok(Throttled)
    }
}

/// Whole seconds, rounded up, never below one.
fn ceil_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests,
            window_secs,
            trust_forwarded_for: false,
        })
    }

    fn parts_for(request: Request<()>) -> Parts {
        request.into_parts().0
    }

    #[tokio::test]
    async fn allows_up_to_limit_then_rejects() {
        let limiter = limiter(2, 60);
        let now = Instant::now();

        assert!(limiter.check_at("a", now).await.is_ok());
        assert!(limiter.check_at("a", now + Duration::from_secs(1)).await.is_ok());

        let wait = limiter
            .check_at("a", now + Duration::from_secs(10))
            .await
            .unwrap_err();
        assert_eq!(wait, Duration::from_secs(50));
    }

    #[tokio::test]
    async fn callers_are_tracked_independently() {
        let limiter = limiter(1, 60);
        let now = Instant::now();

        assert!(limiter.check_at("a", now).await.is_ok());
        assert!(limiter.check_at("b", now).await.is_ok());
        assert!(limiter.check_at("a", now).await.is_err());
    }

    #[tokio::test]
    async fn window_slides() {
        let limiter = limiter(1, 60);
        let now = Instant::now();

        assert!(limiter.check_at("a", now).await.is_ok());
        assert!(limiter.check_at("a", now + Duration::from_secs(59)).await.is_err());
        assert!(limiter.check_at("a", now + Duration::from_secs(60)).await.is_ok());
    }

    #[tokio::test]
    async fn rejected_requests_do_not_extend_the_window() {
        let limiter = limiter(1, 10);
        let now = Instant::now();

        assert!(limiter.check_at("a", now).await.is_ok());
        for s in 1..10 {
            assert!(limiter.check_at("a", now + Duration::from_secs(s)).await.is_err());
        }
        assert!(limiter.check_at("a", now + Duration::from_secs(10)).await.is_ok());
    }

    #[tokio::test]
    async fn zero_max_disables_limiting() {
        let limiter = limiter(0, 60);
        let now = Instant::now();

        assert!(!limiter.is_enabled());
        for _ in 0..1000 {
            assert!(limiter.check_at("a", now).await.is_ok());
        }
    }

    #[tokio::test]
    async fn sweep_drops_idle_callers() {
        let limiter = limiter(5, 60);
        let now = Instant::now();

        limiter.check_at("old", now).await.unwrap();
        limiter
            .check_at("recent", now + Duration::from_secs(30))
            .await
            .unwrap();

        assert_eq!(limiter.sweep_at(now + Duration::from_secs(61)).await, 1);
        assert_eq!(limiter.sweep_at(now + Duration::from_secs(91)).await, 0);
    }

    fn forwarded_request() -> Request<()> {
        let mut request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();
        let addr: SocketAddr = "192.0.2.1:5555".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        request
    }

    #[test]
    fn caller_key_prefers_forwarded_for_when_trusted() {
        let parts = parts_for(forwarded_request());
        assert_eq!(caller_key(&parts, true), "203.0.113.7");
    }

    #[test]
    fn caller_key_ignores_forwarded_for_by_default() {
        let parts = parts_for(forwarded_request());
        assert_eq!(caller_key(&parts, false), "192.0.2.1");
    }

    #[test]
    fn caller_key_uses_peer_address() {
        let mut request = Request::builder().body(()).unwrap();
        let addr: SocketAddr = "192.0.2.1:5555".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(caller_key(&parts_for(request), true), "192.0.2.1");
    }

    #[test]
    fn caller_key_falls_back_to_unknown() {
        let parts = parts_for(Request::builder().body(()).unwrap());
        assert_eq!(caller_key(&parts, true), UNKNOWN_CALLER);
        assert_eq!(caller_key(&parts, false), UNKNOWN_CALLER);
    }

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(ceil_secs(Duration::from_millis(1)), 1);
        assert_eq!(ceil_secs(Duration::from_millis(1500)), 2);
        assert_eq!(ceil_secs(Duration::from_secs(3)), 3);
        assert_eq!(ceil_secs(Duration::ZERO), 1);
    }
}
