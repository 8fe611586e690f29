//! Uniform JSON error responses for the HTTP control plane (§6).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use flowmind_error::{FlowmindError, FlowmindErrorKind};
use serde_json::json;

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self { status: StatusCode::UNAUTHORIZED, message: message.into() }
    }

    #[must_use]
    pub fn rate_limited() -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "rate limit exceeded".to_string(),
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }
}

impl From<FlowmindError> for ApiError {
    fn from(error: FlowmindError) -> Self {
        let status = match error.kind() {
            FlowmindErrorKind::Validation => StatusCode::BAD_REQUEST,
            FlowmindErrorKind::NotFound => StatusCode::NOT_FOUND,
            FlowmindErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
            FlowmindErrorKind::RejectedByHuman | FlowmindErrorKind::NoMatchingRule => StatusCode::UNPROCESSABLE_ENTITY,
            FlowmindErrorKind::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            FlowmindErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            FlowmindErrorKind::Integration => StatusCode::BAD_GATEWAY,
        };
        Self { status, message: error.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
