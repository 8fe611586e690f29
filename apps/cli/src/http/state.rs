//! Shared axum application state (§6 "HTTP control plane").

use std::collections::HashMap;
use std::sync::Arc;

use crate::collaborators::DefaultCollaborators;
use crate::rate_limit::RateLimiter;

pub struct AuthConfig {
    pub enabled: bool,
    pub jwt_secret: Option<String>,
    pub api_keys: HashMap<String, String>,
}

#[derive(Clone)]
pub struct AppState {
    pub collaborators: Arc<DefaultCollaborators>,
    pub auth: Arc<AuthConfig>,
    pub rate_limiter: Option<Arc<RateLimiter>>,
}
