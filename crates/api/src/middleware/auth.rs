//! Static bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::state::AppState;

/// Token accepted when `API_TOKEN` is not configured. Only suitable for
/// local development; the server warns at startup when it is in use.
pub const DEFAULT_API_TOKEN: &str = "medrec-dev-token";

/// Proof that the request carried the configured bearer token.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(_auth: BearerAuth) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BearerAuth;

impl FromRequestParts<AppState> for BearerAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;

        if !tokens_match(token, &state.config.api_token) {
            tracing::warn!(uri = %parts.uri, "Rejected request with invalid bearer token");
            return Err(AppError::InvalidCredential);
        }

        Ok(BearerAuth)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::MissingCredential("Missing Authorization header".into()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::MissingCredential(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        )
    })?;

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::MissingCredential("Bearer token is empty".into()));
    }

    Ok(token)
}

/// Compares SHA-256 digests of both tokens.
fn tokens_match(presented: &str, expected: &str) -> bool {
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}
