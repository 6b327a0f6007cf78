use std::path::PathBuf;
use std::str::FromStr;

use crate::middleware::auth::DEFAULT_API_TOKEN;
use crate::middleware::throttle::RateLimitConfig;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-field lines (default).
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Maximum pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// Bearer token every records request must present.
    pub api_token: String,
    /// Per-caller sliding-window limits.
    pub rate_limit: RateLimitConfig,
    /// Optional JSON phrase table replacing the built-in summary phrases.
    pub summary_phrases_path: Option<PathBuf>,
    /// Tracing output format (default: pretty).
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `DB_MAX_CONNECTIONS`      | `20`                       |
    /// | `API_TOKEN`               | development fallback       |
    /// | `RATE_LIMIT_MAX_REQUESTS` | `100`                      |
    /// | `RATE_LIMIT_WINDOW_SECS`  | `900`                      |
    /// | `TRUST_FORWARDED_FOR`     | `false`                    |
    /// | `SUMMARY_PHRASES_PATH`    | unset                      |
    /// | `LOG_FORMAT`              | `pretty`                   |
    ///
    /// # Panics
    ///
    /// Panics if any variable is set to a value that does not parse.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port = parse_or(&lookup, "PORT", 3000u16);

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30u64);

        let db_max_connections = parse_or(
            &lookup,
            "DB_MAX_CONNECTIONS",
            medrec_db::DEFAULT_MAX_CONNECTIONS,
        );

        let api_token = lookup("API_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_API_TOKEN.to_string());

        let rate_limit = RateLimitConfig {
            max_requests: parse_or(&lookup, "RATE_LIMIT_MAX_REQUESTS", 100u32),
            window_secs: parse_or(&lookup, "RATE_LIMIT_WINDOW_SECS", 900u64),
            trust_forwarded_for: parse_or(&lookup, "TRUST_FORWARDED_FOR", false),
        };

        let summary_phrases_path = lookup("SUMMARY_PHRASES_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let log_format = parse_or(&lookup, "LOG_FORMAT", LogFormat::default());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            db_max_connections,
            api_token,
            rate_limit,
            summary_phrases_path,
            log_format,
        }
    }

    /// Whether the bearer token is the built-in development fallback.
    pub fn uses_default_token(&self) -> bool {
        self.api_token == DEFAULT_API_TOKEN
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} is invalid ('{raw}'): {e}")),
        None => default,
    }
}
