//! Auth and rate-limit middleware layered in front of `/api/v1/*` (§6).

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::state::AppState;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
struct Claims {
    #[allow(dead_code)]
    sub: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Accept either a `Bearer <jwt>` validated against the configured HS256
/// secret, or an `X-API-Key` present in the configured key table. No-op
/// when the server was started with `--no-auth`.
pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, ApiError> {
    if !state.auth.enabled {
        return Ok(next.run(request).await);
    }

    if let Some(api_key) = request.headers().get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        return if state.auth.api_keys.contains_key(api_key) {
            Ok(next.run(request).await)
        } else {
            Err(ApiError::unauthorized("unrecognized API key"))
        };
    }

    if let Some(header) = request.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = header.strip_prefix("Bearer ") {
            let secret = state
                .auth
                .jwt_secret
                .as_ref()
                .ok_or_else(|| ApiError::unauthorized("server has no JWT secret configured"))?;
            return match decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::new(Algorithm::HS256)) {
                Ok(_) => Ok(next.run(request).await),
                Err(e) => Err(ApiError::unauthorized(format!("invalid bearer token: {e}"))),
            };
        }
    }

    Err(ApiError::unauthorized("missing Authorization or X-API-Key header"))
}

/// Reject with `429` once a client's token bucket is exhausted (§6 "Rate
/// limiting"). The client key is the peer's socket address; a reverse
/// proxy deployment would instead key on a forwarded-for header.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(limiter) = &state.rate_limiter {
        if !limiter.try_acquire(&addr.ip().to_string()) {
            return Err(ApiError::rate_limited());
        }
    }
    Ok(next.run(request).await)
}
